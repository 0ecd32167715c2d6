//! # Document Model
//!
//! A headless, arena-backed DOM for running page behaviors outside a browser.
//!
//! ## Overview
//!
//! * **Tree**: elements, text, comments and a doctype under a single document node.
//!   Removed nodes are detached, never freed, so stale handles stay harmless.
//! * **Selectors**: CSS selector lists (`form.auth-form input[required]`, `#id`), matched
//!   against the arena by the `selectors` crate. See [`Selector`].
//! * **Events**: bubbling dispatch with cancelable defaults; submitting a form records a
//!   [`Submission`] when nobody prevents it.
//! * **Observers**: callbacks for elements that become connected after the fact.
//! * **Ready signal**: [`Document::on_content_loaded`] / [`Document::finish_parsing`].
//! * **Markup**: [`Document::parse_html`] (via `scraper`) and [`Document::to_html`].
//!
//! # Example
//!
//! ```rust
//! use folio_dom::{Document, DispatchOutcome, EventKind};
//!
//! let doc = Document::parse_html(r#"<form class="auth-form"><input name="q"></form>"#);
//! let form = doc.query_selector(".auth-form").unwrap().unwrap();
//! form.add_event_listener(EventKind::Submit, |_, event| event.prevent_default());
//!
//! assert_eq!(doc.submit(&form).unwrap(), DispatchOutcome::Prevented);
//! assert!(doc.take_submissions().is_empty());
//! ```

mod document;
mod element;
mod error;
mod event;
mod html;
mod selector;
mod tree;

pub use document::{Document, MutationCallback, ObserverId, ReadyCallback, ReadyState};
pub use element::{ClassList, Element};
pub use error::{DomError, DomErrorExt};
pub use event::{DispatchOutcome, Event, EventKind, Listener, ListenerId, Submission};
pub use selector::Selector;
pub use tree::NodeId;
