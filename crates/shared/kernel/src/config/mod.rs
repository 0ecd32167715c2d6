use crate::error::format_context;
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "FOLIO";

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

impl From<config::ConfigError> for ConfigError {
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

pub trait ConfigErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError>;
}

impl<T> ConfigErrorExt<T> for Result<T, config::ConfigError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError> {
        self.map_err(|source| ConfigError::Config { source, context: Some(context.into()) })
    }
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layering:
/// 1. **Defaults**: whatever `T`'s `#[serde(default)]` provides.
/// 2. **File**: when `path` is given, the file must exist; its format follows the extension
///    (`folio.toml`, `folio.json`, ...).
/// 3. **Environment**: variables prefixed with `FOLIO__`, nested with double underscores
///    (`FOLIO__ALERTS__DELAY_MS` maps to `alerts.delay_ms`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or malformed, or if the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use folio_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     delay_ms: u64,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Layers `path` and the environment. `vars` replaces the process environment when set.
fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    vars: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(vars),
    );

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::config::UiConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_reported_with_context() {
        let err = load_config::<UiConfig>(Some("/definitely/not/here/folio.toml"))
            .expect_err("missing file should fail");
        let message = err.to_string();
        assert!(message.contains("Failed to build config"), "unexpected message: {message}");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("folio.toml");
        fs::write(
            &path,
            r#"
[alerts]
delay_ms = 1200
observe = true

[forms]
invalid_class = "has-error"
"#,
        )
        .expect("write config");

        let cfg: UiConfig = load_config(Some(&path)).expect("config should load");
        assert_eq!(cfg.alerts.delay_ms, 1200);
        assert_eq!(cfg.alerts.fade_ms, 500);
        assert!(cfg.alerts.observe);
        assert_eq!(cfg.forms.invalid_class, "has-error");
        assert_eq!(cfg.forms.selector, ".auth-form");
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }

    #[test]
    fn prefixed_variables_override_nested_keys() {
        let cfg: UiConfig = load_layered(
            None::<&Path>,
            vars(&[
                ("FOLIO__ALERTS__DELAY_MS", "1000"),
                ("FOLIO__FORMS__INVALID_CLASS", "has-error"),
                ("FOLIO__FORMS__OBSERVE", "true"),
                ("OTHER__ALERTS__FADE_MS", "1"),
                ("FOLIO_ALERTS_FADE_MS", "2"),
            ]),
        )
        .expect("config should load");

        assert_eq!(cfg.alerts.delay_ms, 1000);
        assert_eq!(cfg.alerts.fade_ms, 500, "unprefixed or single-underscore keys are ignored");
        assert_eq!(cfg.forms.invalid_class, "has-error");
        assert!(cfg.forms.observe);
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("folio.toml");
        fs::write(&path, "[alerts]\ndelay_ms = 1200\nfade_ms = 300\n").expect("write config");

        let cfg: UiConfig =
            load_layered(Some(&path), vars(&[("FOLIO__ALERTS__DELAY_MS", "50")]))
                .expect("config should load");
        assert_eq!(cfg.alerts.delay_ms, 50);
        assert_eq!(cfg.alerts.fade_ms, 300);
    }

    #[test]
    fn unparsable_environment_value_fails() {
        let err = load_layered::<UiConfig>(
            None::<&Path>,
            vars(&[("FOLIO__ALERTS__DELAY_MS", "soon")]),
        )
        .expect_err("bad type should fail");
        assert!(err.to_string().contains("Failed to deserialize config"), "{err}");
    }

    #[test]
    fn wrong_value_type_fails_deserialization() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("folio.json");
        fs::write(&path, r#"{ "alerts": { "delay_ms": "soon" } }"#).expect("write config");

        let err = load_config::<UiConfig>(Some(&path)).expect_err("bad type should fail");
        assert!(err.to_string().contains("Failed to deserialize config"));
    }
}
