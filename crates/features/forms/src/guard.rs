use crate::error::{FormsError, FormsErrorExt};
use crate::notifier::Notifier;
use crate::validation::Validator;
use folio_dom::{Document, Element, EventKind, ListenerId, NodeId, ObserverId, Selector};
use folio_kernel::domain::config::FormsConfig;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

#[derive(Default)]
struct Registry {
    forms: Vec<(NodeId, ListenerId)>,
    observer: Option<ObserverId>,
    disposed: bool,
}

struct Inner {
    document: Document,
    validator: Arc<Validator>,
    notice: Arc<str>,
    notifier: Arc<dyn Notifier>,
    registry: Mutex<Registry>,
}

/// Submit listeners installed on every guarded form.
///
/// A submission with any blank required input is cancelled and the notice is shown once.
#[derive(Clone)]
pub struct FormGuard {
    inner: Arc<Inner>,
}

impl fmt::Debug for FormGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.lock();
        f.debug_struct("FormGuard")
            .field("forms", &registry.forms.len())
            .field("notifier", &self.inner.notifier)
            .field("disposed", &registry.disposed)
            .finish_non_exhaustive()
    }
}

/// Guards every form in `document` matching [`FormsConfig::selector`].
///
/// # Errors
/// Returns [`FormsError::Selector`] if either configured selector does not parse.
pub fn attach(
    document: &Document,
    config: &FormsConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<FormGuard, FormsError> {
    let selector = Selector::parse(&config.selector).context("forms.selector")?;
    let validator = Arc::new(Validator::new(config)?);

    let inner = Arc::new(Inner {
        document: document.clone(),
        validator,
        notice: Arc::from(config.notice.as_str()),
        notifier,
        registry: Mutex::new(Registry::default()),
    });

    let guarded = document.select(&selector).iter().filter(|form| inner.guard(form)).count();

    if config.observe {
        let weak = Arc::downgrade(&inner);
        let observer = document.observe(selector, move |form| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.guard(&form);
            }
        });
        inner.registry.lock().observer = Some(observer);
    }

    info!(forms = guarded, observe = config.observe, "Form guard attached");
    Ok(FormGuard { inner })
}

impl FormGuard {
    /// Guarded forms, in the order they were picked up.
    #[must_use]
    pub fn forms(&self) -> Vec<Element> {
        let ids: Vec<NodeId> = self.inner.registry.lock().forms.iter().map(|(id, _)| *id).collect();
        ids.into_iter().filter_map(|id| self.inner.document.element(id)).collect()
    }

    /// Whether `form` has this guard's submit listener.
    #[must_use]
    pub fn is_guarded(&self, form: &Element) -> bool {
        self.inner.registry.lock().forms.iter().any(|(id, _)| *id == form.id())
    }

    /// Removes every submit listener and the observer. Flags already set stay.
    pub fn dispose(&self) {
        let (listeners, observer) = {
            let mut registry = self.inner.registry.lock();
            if registry.disposed {
                return;
            }
            registry.disposed = true;
            (std::mem::take(&mut registry.forms), registry.observer.take())
        };

        for (_, listener) in &listeners {
            self.inner.document.remove_event_listener(*listener);
        }
        if let Some(observer) = observer {
            self.inner.document.disconnect(observer);
        }
        debug!(forms = listeners.len(), "Form guard disposed");
    }

    /// Whether [`FormGuard::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.registry.lock().disposed
    }
}

impl Inner {
    /// Installs the submit listener once per form.
    fn guard(&self, form: &Element) -> bool {
        let mut registry = self.registry.lock();
        if registry.disposed || registry.forms.iter().any(|(id, _)| *id == form.id()) {
            return false;
        }

        let validator = Arc::clone(&self.validator);
        let notifier = Arc::clone(&self.notifier);
        let notice = Arc::clone(&self.notice);
        let listener = form.add_event_listener(EventKind::Submit, move |document, event| {
            let Some(form) = document.element(event.current_target()) else {
                return;
            };
            let validation = validator.validate(&form);
            if validation.is_valid() {
                debug!(form = form.id().index(), checked = validation.checked, "Submission allowed");
                return;
            }

            event.prevent_default();
            debug!(
                form = form.id().index(),
                invalid = ?validation.invalid_names(),
                "Submission blocked"
            );
            notifier.notify(&notice);
        });

        registry.forms.push((form.id(), listener));
        true
    }
}
