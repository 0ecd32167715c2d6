//! Facade for the blog page behaviors.
//! Re-exports the document model, the event loop and configuration, and installs both
//! behaviors on a page. Keep this crate thin: it composes the feature crates.
//!
//! ## Usage
//! ```rust
//! use folio::dom::Document;
//! use folio::domain::config::UiConfig;
//! use folio::features::forms::LogNotifier;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let doc = Document::parse_html(r#"<body><div class="alert">Welcome back</div></body>"#);
//! let config = UiConfig::default();
//! let event_loop = folio::event_loop(&config);
//! let ready = folio::on_ready(&doc, &event_loop, &config, Arc::new(LogNotifier));
//!
//! doc.finish_parsing();
//! assert!(ready.is_installed());
//! event_loop.advance(Duration::from_millis(5_500)).unwrap();
//! assert!(doc.query_selector(".alert").unwrap().is_none());
//! ```

mod error;
mod page;

pub use crate::error::{FolioError, FolioErrorExt};
pub use crate::page::{PageBehaviors, ReadyHandle, event_loop, init, on_ready};

pub use folio_dom as dom;
pub use folio_domain as domain;
pub use folio_kernel as kernel;
pub use folio_runtime as runtime;

/// The behaviors this facade installs.
pub mod features {
    pub use folio_alerts as alerts;
    pub use folio_forms as forms;
}
