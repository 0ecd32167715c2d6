//! Alert banner auto-dismissal.
//!
//! [`attach`] finds the alert banners on a page and, for each one independently, waits
//! [`AlertsConfig::delay_ms`], fades it to transparent over [`AlertsConfig::fade_ms`] and
//! removes it. Timers run on the page's [`folio_runtime::EventLoop`].
//!
//! ```rust
//! use folio_alerts::{DismissPhase, attach};
//! use folio_dom::Document;
//! use folio_kernel::domain::config::AlertsConfig;
//! use folio_runtime::EventLoop;
//! use std::time::Duration;
//!
//! let doc = Document::parse_html(r#"<div class="alert">Saved</div>"#);
//! let event_loop = EventLoop::new();
//! let alerts = attach(&doc, &event_loop, &AlertsConfig::default()).unwrap();
//! let banner = alerts.tracked().remove(0);
//!
//! event_loop.advance(Duration::from_millis(5_000)).unwrap();
//! assert_eq!(alerts.phase(&banner), Some(DismissPhase::Fading));
//! event_loop.advance(Duration::from_millis(500)).unwrap();
//! assert!(!banner.is_connected());
//! ```

mod dismisser;
mod error;

pub use crate::dismisser::{AlertDismisser, DismissPhase, attach};
pub use crate::error::{AlertsError, AlertsErrorExt};

pub use folio_kernel::domain::config::AlertsConfig;
