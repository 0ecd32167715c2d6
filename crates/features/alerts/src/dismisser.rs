use crate::error::{AlertsError, AlertsErrorExt};
use folio_dom::{Document, Element, NodeId, ObserverId, Selector};
use folio_kernel::domain::config::AlertsConfig;
use folio_runtime::{EventLoop, TimerId};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace};

/// Where an alert is in its dismissal.
///
/// `Scheduled --delay--> Fading --fade--> Removed`. `Cancelled` is reached through
/// [`AlertDismisser::dismiss`] or [`AlertDismisser::dispose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissPhase {
    /// Waiting for the display delay.
    Scheduled,
    /// Transparent, waiting for the fade to finish.
    Fading,
    /// Gone from the document.
    Removed,
    /// Auto-dismissal stopped before it finished.
    Cancelled,
}

impl DismissPhase {
    /// Whether a timer step is still outstanding.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Scheduled | Self::Fading)
    }
}

#[derive(Debug)]
struct Tracked {
    phase: DismissPhase,
    timer: Option<TimerId>,
}

#[derive(Default)]
struct Registry {
    alerts: FxHashMap<NodeId, Tracked>,
    order: Vec<NodeId>,
    observer: Option<ObserverId>,
    disposed: bool,
}

struct Inner {
    document: Document,
    event_loop: EventLoop,
    settings: AlertsConfig,
    transition: String,
    registry: Mutex<Registry>,
}

/// Fades out and removes alert banners on the page event loop.
///
/// Each alert gets its own pair of timers. Clones share state.
#[derive(Clone)]
pub struct AlertDismisser {
    inner: Arc<Inner>,
}

impl fmt::Debug for AlertDismisser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.lock();
        f.debug_struct("AlertDismisser")
            .field("selector", &self.inner.settings.selector)
            .field("tracked", &registry.order.len())
            .field("disposed", &registry.disposed)
            .finish_non_exhaustive()
    }
}

/// Schedules every alert currently in `document` for dismissal.
///
/// Matching happens once, now. With [`AlertsConfig::observe`] set, alerts connected later
/// are scheduled as they appear. A page without alerts yields an empty dismisser.
///
/// # Errors
/// Returns [`AlertsError::Selector`] if [`AlertsConfig::selector`] does not parse.
pub fn attach(
    document: &Document,
    event_loop: &EventLoop,
    config: &AlertsConfig,
) -> Result<AlertDismisser, AlertsError> {
    let selector = Selector::parse(&config.selector).context("alerts.selector")?;

    let inner = Arc::new(Inner {
        document: document.clone(),
        event_loop: event_loop.clone(),
        settings: config.clone(),
        transition: config.transition(),
        registry: Mutex::new(Registry::default()),
    });

    let found = document.select(&selector);
    let scheduled = found.iter().filter(|alert| inner.schedule(alert)).count();

    if config.observe {
        let weak = Arc::downgrade(&inner);
        let observer = document.observe(selector, move |alert| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.schedule(&alert);
            }
        });
        inner.registry.lock().observer = Some(observer);
    }

    info!(
        alerts = scheduled,
        delay_ms = config.delay_ms,
        fade_ms = config.fade_ms,
        observe = config.observe,
        "Alert dismisser attached"
    );

    Ok(AlertDismisser { inner })
}

impl AlertDismisser {
    /// Current phase of `alert`, or `None` if it was never scheduled.
    #[must_use]
    pub fn phase(&self, alert: &Element) -> Option<DismissPhase> {
        self.phase_of(alert.id())
    }

    /// [`AlertDismisser::phase`] by node id.
    #[must_use]
    pub fn phase_of(&self, id: NodeId) -> Option<DismissPhase> {
        self.inner.registry.lock().alerts.get(&id).map(|t| t.phase)
    }

    /// Every alert ever scheduled, in scheduling order.
    #[must_use]
    pub fn tracked(&self) -> Vec<Element> {
        let order = self.inner.registry.lock().order.clone();
        order.into_iter().filter_map(|id| self.inner.document.element(id)).collect()
    }

    /// Number of alerts with a timer step still outstanding.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.registry.lock().alerts.values().filter(|t| t.phase.is_pending()).count()
    }

    /// Removes `alert` right away and cancels its outstanding timer.
    ///
    /// Returns `false` if the alert is not tracked or its dismissal already ended.
    pub fn dismiss(&self, alert: &Element) -> bool {
        {
            let mut registry = self.inner.registry.lock();
            let Some(tracked) = registry.alerts.get_mut(&alert.id()) else {
                return false;
            };
            if !tracked.phase.is_pending() {
                return false;
            }
            if let Some(timer) = tracked.timer.take() {
                self.inner.event_loop.clear_timeout(timer);
            }
            tracked.phase = DismissPhase::Cancelled;
        }

        alert.remove();
        debug!(node = alert.id().index(), "Alert dismissed manually");
        true
    }

    /// Stops all outstanding dismissals and the observer, if any.
    ///
    /// Alerts that already faded keep their style. Calling it twice is harmless.
    pub fn dispose(&self) {
        let observer = {
            let mut registry = self.inner.registry.lock();
            if registry.disposed {
                return;
            }
            registry.disposed = true;

            let mut cancelled = 0usize;
            for tracked in registry.alerts.values_mut() {
                if let Some(timer) = tracked.timer.take() {
                    self.inner.event_loop.clear_timeout(timer);
                }
                if tracked.phase.is_pending() {
                    tracked.phase = DismissPhase::Cancelled;
                    cancelled += 1;
                }
            }
            debug!(cancelled, "Alert dismisser disposed");
            registry.observer.take()
        };

        if let Some(observer) = observer {
            self.inner.document.disconnect(observer);
        }
    }

    /// Whether [`AlertDismisser::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.registry.lock().disposed
    }
}

impl Inner {
    /// Starts the delay timer for `alert`. Returns `false` for alerts already known.
    fn schedule(self: &Arc<Self>, alert: &Element) -> bool {
        let id = alert.id();
        let mut registry = self.registry.lock();
        if registry.disposed || registry.alerts.contains_key(&id) {
            return false;
        }

        let this = Arc::clone(self);
        let timer = self.event_loop.set_timeout(self.settings.delay(), move || this.fade(id));
        registry.alerts.insert(id, Tracked { phase: DismissPhase::Scheduled, timer: Some(timer) });
        registry.order.push(id);
        trace!(node = id.index(), "Alert scheduled");
        true
    }

    fn fade(self: &Arc<Self>, id: NodeId) {
        if !self.take_step(id, DismissPhase::Scheduled) {
            return;
        }

        let Some(alert) = self.document.element(id).filter(Element::is_connected) else {
            self.settle(id, DismissPhase::Removed, None);
            debug!(node = id.index(), "Alert left the page before fading");
            return;
        };

        alert.set_style("transition", &self.transition);
        alert.set_style("opacity", "0");

        let this = Arc::clone(self);
        let timer = self.event_loop.set_timeout(self.settings.fade(), move || this.remove(id));
        self.settle(id, DismissPhase::Fading, Some(timer));
        trace!(node = id.index(), "Alert fading");
    }

    fn remove(&self, id: NodeId) {
        if !self.take_step(id, DismissPhase::Fading) {
            return;
        }

        let removed = self.document.remove(id);
        self.settle(id, DismissPhase::Removed, None);
        trace!(node = id.index(), removed, "Alert removed");
    }

    /// Clears the fired timer if `id` is still in `expected`.
    fn take_step(&self, id: NodeId, expected: DismissPhase) -> bool {
        let mut registry = self.registry.lock();
        match registry.alerts.get_mut(&id) {
            Some(tracked) if tracked.phase == expected => {
                tracked.timer = None;
                true
            }
            _ => false,
        }
    }

    fn settle(&self, id: NodeId, phase: DismissPhase, timer: Option<TimerId>) {
        if let Some(tracked) = self.registry.lock().alerts.get_mut(&id) {
            tracked.phase = phase;
            tracked.timer = timer;
        }
    }
}
