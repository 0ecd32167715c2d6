//! Kernel utilities shared across the page behaviors.
//! Keep this crate lightweight; it re-exports the domain models and hosts config loading
//! and the error-context formatting every crate's error enum uses.
//!
//! ## Config loading
//! ```rust,no_run
//! use folio_kernel::config::load_config;
//! use folio_kernel::domain::config::UiConfig;
//!
//! let cfg: UiConfig = load_config(Some("folio.toml")).unwrap_or_default();
//! ```
pub mod config;
pub mod error;

pub use folio_domain as domain;
