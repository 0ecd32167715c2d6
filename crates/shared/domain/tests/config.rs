use folio_domain::config::{
    AlertsConfig, FormsConfig, LogRotation, LoggingConfig, RuntimeConfig, UiConfig,
};
use serde_json::json;
use std::time::Duration;

#[test]
fn config_defaults_are_sane() {
    let alerts = AlertsConfig::default();
    assert_eq!(alerts.selector, ".alert");
    assert_eq!(alerts.delay(), Duration::from_millis(5_000));
    assert_eq!(alerts.fade(), Duration::from_millis(500));
    assert_eq!(alerts.lifetime(), Duration::from_millis(5_500));
    assert!(!alerts.observe);

    let forms = FormsConfig::default();
    assert_eq!(forms.selector, ".auth-form");
    assert_eq!(forms.required_selector, "input[required]");
    assert_eq!(forms.invalid_class, "is-invalid");
    assert_eq!(forms.notice, "Please fill in all required fields.");

    assert_eq!(RuntimeConfig::default().max_steps, 10_000);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.rotation, LogRotation::Daily);
    assert!(logging.path.is_none());
}

#[test]
fn transition_follows_fade_duration() {
    let mut alerts = AlertsConfig::default();
    assert_eq!(alerts.transition(), "opacity 0.5s");

    alerts.fade_ms = 1_000;
    assert_eq!(alerts.transition(), "opacity 1s");

    alerts.fade_ms = 1_250;
    assert_eq!(alerts.transition(), "opacity 1.25s");

    alerts.fade_ms = 5;
    assert_eq!(alerts.transition(), "opacity 0.005s");
}

#[test]
fn ui_config_deserializes_partial_sections() {
    let raw = json!({
        "alerts": { "delay_ms": 1000, "observe": true },
        "forms": { "notice": "Fill everything in." },
        "logging": { "rotation": "hourly", "path": "/tmp/folio" }
    });

    let cfg: UiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.alerts.delay_ms, 1000);
    assert_eq!(cfg.alerts.fade_ms, 500);
    assert!(cfg.alerts.observe);
    assert_eq!(cfg.forms.notice, "Fill everything in.");
    assert_eq!(cfg.forms.selector, ".auth-form");
    assert_eq!(cfg.logging.rotation, LogRotation::Hourly);
    assert_eq!(cfg.logging.path.as_deref(), Some(std::path::Path::new("/tmp/folio")));
}

#[test]
fn ui_config_clones_share_until_mutated() {
    let base = UiConfig::default();
    let mut tuned = base.clone();
    tuned.alerts.delay_ms = 10;

    assert_eq!(base.alerts.delay_ms, 5_000);
    assert_eq!(tuned.alerts.delay_ms, 10);
}
