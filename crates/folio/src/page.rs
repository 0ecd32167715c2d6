use crate::error::{FolioError, FolioErrorExt};
use folio_alerts::AlertDismisser;
use folio_dom::Document;
use folio_domain::config::UiConfig;
use folio_forms::{FormGuard, Notifier};
use folio_runtime::EventLoop;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

/// Both behaviors as installed on one document.
#[derive(Debug, Clone)]
pub struct PageBehaviors {
    alerts: AlertDismisser,
    forms: FormGuard,
}

impl PageBehaviors {
    #[must_use]
    pub const fn alerts(&self) -> &AlertDismisser {
        &self.alerts
    }

    #[must_use]
    pub const fn forms(&self) -> &FormGuard {
        &self.forms
    }

    /// Cancels pending alert timers and detaches every form listener and observer.
    pub fn dispose(&self) {
        self.alerts.dispose();
        self.forms.dispose();
    }
}

/// An event loop honoring `runtime.max_steps`.
#[must_use]
pub fn event_loop(config: &UiConfig) -> EventLoop {
    EventLoop::new().with_max_steps(config.runtime.max_steps)
}

/// Installs the alert dismisser and the form guard on `document` right away.
///
/// # Errors
/// Returns [`FolioError`] if a configured selector does not parse. Nothing stays
/// installed in that case.
pub fn init(
    document: &Document,
    event_loop: &EventLoop,
    config: &UiConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<PageBehaviors, FolioError> {
    let alerts =
        folio_alerts::attach(document, event_loop, &config.alerts).context("installing alerts")?;
    let forms = match folio_forms::attach(document, &config.forms, notifier) {
        Ok(forms) => forms,
        Err(e) => {
            alerts.dispose();
            return Err(e).context("installing form guard");
        }
    };

    info!(
        alerts = alerts.tracked().len(),
        forms = forms.forms().len(),
        "Page behaviors installed"
    );
    Ok(PageBehaviors { alerts, forms })
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Waiting,
    Installed(PageBehaviors),
    Failed(String),
    Disposed,
}

/// Handle to behaviors that install themselves once the document is ready.
#[derive(Debug, Clone)]
pub struct ReadyHandle {
    slot: Arc<Mutex<Slot>>,
}

/// Installs the behaviors when `document` signals that its content is loaded.
///
/// Logs `Blog page loaded` when the signal fires. If the document is already ready the
/// installation happens before this returns. Installation errors are logged and
/// reported by [`ReadyHandle::failure`].
pub fn on_ready(
    document: &Document,
    event_loop: &EventLoop,
    config: &UiConfig,
    notifier: Arc<dyn Notifier>,
) -> ReadyHandle {
    let handle = ReadyHandle { slot: Arc::new(Mutex::new(Slot::Waiting)) };

    let slot = Arc::clone(&handle.slot);
    let event_loop = event_loop.clone();
    let config = config.clone();
    document.on_content_loaded(move |document| {
        info!("Blog page loaded");
        if matches!(*slot.lock(), Slot::Disposed) {
            return;
        }

        let installed = match init(document, &event_loop, &config, notifier) {
            Ok(behaviors) => Slot::Installed(behaviors),
            Err(e) => {
                error!(error = %e, "Failed to install page behaviors");
                Slot::Failed(e.to_string())
            }
        };
        *slot.lock() = installed;
    });

    handle
}

impl ReadyHandle {
    /// The installed behaviors, once the document is ready.
    #[must_use]
    pub fn behaviors(&self) -> Option<PageBehaviors> {
        match &*self.slot.lock() {
            Slot::Installed(behaviors) => Some(behaviors.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Installed(_))
    }

    /// Why installation failed, if it did.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        match &*self.slot.lock() {
            Slot::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Tears down installed behaviors, or keeps them from installing if the document is
    /// not ready yet.
    pub fn dispose(&self) {
        let previous = std::mem::replace(&mut *self.slot.lock(), Slot::Disposed);
        if let Slot::Installed(behaviors) = previous {
            behaviors.dispose();
        }
    }
}
