//! Presence validation for guarded forms.
//!
//! [`attach`] installs a submit listener on every form matching
//! [`FormsConfig::selector`]. On submit, each required input is trimmed and checked; blank
//! ones get the invalid class, filled ones lose it, and if anything was blank the
//! submission is cancelled and the [`Notifier`] shows the notice once.
//!
//! ```rust
//! use folio_dom::Document;
//! use folio_forms::{FormsConfig, MemoryNotifier, attach};
//! use std::sync::Arc;
//!
//! let doc = Document::parse_html(r#"<form class="auth-form"><input name="user" required></form>"#);
//! let notifier = Arc::new(MemoryNotifier::new());
//! let guard = attach(&doc, &FormsConfig::default(), notifier.clone()).unwrap();
//!
//! let form = guard.forms().remove(0);
//! assert!(doc.submit(&form).unwrap().is_prevented());
//! assert_eq!(notifier.messages(), ["Please fill in all required fields."]);
//! ```

mod error;
mod guard;
mod notifier;
mod validation;

pub use crate::error::{FormsError, FormsErrorExt};
pub use crate::guard::{FormGuard, attach};
pub use crate::notifier::{LogNotifier, MemoryNotifier, Notifier};
pub use crate::validation::{Validation, is_blank, validate_form};

pub use folio_kernel::domain::config::FormsConfig;
