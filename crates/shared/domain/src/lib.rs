//! # Domain Models
//!
//! Pure configuration types for the page behaviors, with a single dependency (`serde`).
//! Keep it lean: no I/O, no DOM access, no timers. Just data and defaults.

pub mod config;
pub mod constants;
