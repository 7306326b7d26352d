//! CLI settings: an optional TOML file plus `PRISK__` environment overrides.

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use portfolio_risk_core::validation::ValidationLimits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    /// Validator limits applied by every command that validates holdings
    pub validation: ValidationLimits,
    pub scenarios: ScenarioSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Used when neither the command line nor the input names a portfolio value
    pub default_portfolio_value: Option<Decimal>,
}

/// Load settings. Without a file, defaults plus environment overrides apply.
///
/// `PRISK__VALIDATION__MAX_SINGLE_ALLOCATION_PCT=70` overrides
/// `validation.max_single_allocation_pct`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder
        .add_source(
            Environment::with_prefix("PRISK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("prisk-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_core_limits() {
        let settings = Settings::default();
        assert_eq!(settings.validation, ValidationLimits::default());
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.scenarios.default_portfolio_value.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = write_temp(
            "partial.toml",
            r#"
[logging]
level = "debug"

[validation]
max_single_allocation_pct = "60"
allocation_tolerance = "0.5"

[scenarios]
default_portfolio_value = "250000"
"#,
        );
        let settings = load_settings(Some(&path)).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.json);
        assert_eq!(settings.validation.max_single_allocation_pct, dec!(60));
        assert_eq!(settings.validation.allocation_tolerance, dec!(0.5));
        assert_eq!(settings.validation.max_assets, 50);
        assert_eq!(
            settings.scenarios.default_portfolio_value,
            Some(dec!(250000))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("prisk-definitely-missing.toml");
        assert!(load_settings(Some(&path)).is_err());
    }
}
