//! Markup contract with the server-side templates.

/// Class carried by every dismissible notice banner.
pub const ALERT_SELECTOR: &str = ".alert";
/// Class marking forms that get client-side presence validation.
pub const GUARDED_FORM_SELECTOR: &str = ".auth-form";
/// Fields inside a guarded form that must not be blank.
pub const REQUIRED_INPUT_SELECTOR: &str = "input[required]";
/// Class toggled on required inputs that failed the last check.
pub const INVALID_CLASS: &str = "is-invalid";
/// Blocking notice shown when a guarded form is submitted with blank fields.
pub const REQUIRED_FIELDS_NOTICE: &str = "Please fill in all required fields.";

pub const ALERT_DELAY_MS: u64 = 5_000;
pub const ALERT_FADE_MS: u64 = 500;

/// Upper bound of timer callbacks a single drain may run.
pub const MAX_TIMER_STEPS: usize = 10_000;
