use crate::constants::{
    ALERT_DELAY_MS, ALERT_FADE_MS, ALERT_SELECTOR, GUARDED_FORM_SELECTOR, INVALID_CLASS,
    MAX_TIMER_STEPS, REQUIRED_FIELDS_NOTICE, REQUIRED_INPUT_SELECTOR,
};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration shared by the page behaviors and the apps.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfigInner {
    pub alerts: AlertsConfig,
    pub forms: FormsConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into behaviors.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(flatten, default)]
    inner: Arc<UiConfigInner>,
}

impl Deref for UiConfig {
    type Target = UiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for UiConfig {
    fn deref_mut(&mut self) -> &mut UiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Auto-dismissal of alert banners.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub selector: String,
    pub delay_ms: u64,
    pub fade_ms: u64,
    /// Also schedule alerts inserted after initialization.
    pub observe: bool,
}

impl AlertsConfig {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub const fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    /// Total time from initialization until an untouched alert is gone.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_add(self.fade_ms))
    }

    /// CSS `transition` value applied when the fade starts, e.g. `opacity 0.5s`.
    #[must_use]
    pub fn transition(&self) -> String {
        let millis = self.fade_ms % 1_000;
        let seconds = self.fade_ms / 1_000;
        if millis == 0 {
            format!("opacity {seconds}s")
        } else {
            let fraction = format!("{millis:03}");
            format!("opacity {seconds}.{}s", fraction.trim_end_matches('0'))
        }
    }
}

/// Presence validation of guarded forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub selector: String,
    pub required_selector: String,
    pub invalid_class: String,
    pub notice: String,
    /// Also guard forms inserted after initialization.
    pub observe: bool,
}

/// Timer loop knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub max_steps: usize,
}

/// Log file rotation cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Logging sinks and filters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    pub console: bool,
    pub path: Option<PathBuf>,
    pub rotation: LogRotation,
    pub max_files: usize,
    pub json: bool,
    pub env_filter: Option<String>,
}

// --- Default ---

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            selector: ALERT_SELECTOR.to_owned(),
            delay_ms: ALERT_DELAY_MS,
            fade_ms: ALERT_FADE_MS,
            observe: false,
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            selector: GUARDED_FORM_SELECTOR.to_owned(),
            required_selector: REQUIRED_INPUT_SELECTOR.to_owned(),
            invalid_class: INVALID_CLASS.to_owned(),
            notice: REQUIRED_FIELDS_NOTICE.to_owned(),
            observe: false,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_steps: MAX_TIMER_STEPS }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "folio".to_owned(),
            level: "info".to_owned(),
            console: true,
            path: None,
            rotation: LogRotation::default(),
            max_files: 10,
            json: false,
            env_filter: None,
        }
    }
}
