use std::env;

use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_TEMPERATURE: f64 = 1.0;
const DEFAULT_TOP_P: f64 = 0.95;
const DEFAULT_TOP_K: u32 = 64;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Sampling parameters forwarded to the model on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Validated application settings.
///
/// Environment variables:
///   GEMINI_API_KEY      API key for Gemini (required)
///   MODEL_NAME          Model to use, e.g. "gemini-1.5-flash" (required)
///   TEMPERATURE         Sampling temperature, 0.0..=1.0 (default 1.0)
///   TOP_P               Nucleus sampling cutoff, 0.0..=1.0 (default 0.95)
///   TOP_K               Top-k sampling cutoff, >= 1 (default 64)
///   MAX_OUTPUT_TOKENS   Response length cap, >= 1 (default 8192)
///   LOG_LEVEL           trace|debug|info|warn|error (default info)
///
/// The API key never appears in Debug output.
#[derive(Debug)]
pub struct Settings {
    pub api_key: SecretString,
    pub model_name: String,
    pub generation: GenerationParams,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(
        mut get_var: impl FnMut(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = require_var(get_var("GEMINI_API_KEY"), "GEMINI_API_KEY")?;
        let model_name = require_var(get_var("MODEL_NAME"), "MODEL_NAME")?;

        let generation = GenerationParams {
            temperature: parse_unit_interval(
                get_var("TEMPERATURE").as_deref(),
                "TEMPERATURE",
                DEFAULT_TEMPERATURE,
            )?,
            top_p: parse_unit_interval(get_var("TOP_P").as_deref(), "TOP_P", DEFAULT_TOP_P)?,
            top_k: parse_positive_u32(get_var("TOP_K").as_deref(), "TOP_K", DEFAULT_TOP_K)?,
            max_output_tokens: parse_positive_u32(
                get_var("MAX_OUTPUT_TOKENS").as_deref(),
                "MAX_OUTPUT_TOKENS",
                DEFAULT_MAX_OUTPUT_TOKENS,
            )?,
        };

        Ok(Self {
            api_key: SecretString::from(api_key),
            model_name,
            generation,
            log_level: parse_log_level(get_var("LOG_LEVEL").as_deref())?,
        })
    }
}

fn require_var(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

fn parse_unit_interval(
    raw: Option<&str>,
    var: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };
    let value = raw.parse::<f64>().map_err(|_| ConfigError::InvalidVar {
        var,
        reason: format!("'{raw}' is not a number"),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidVar {
            var,
            reason: format!("{value} is outside the range 0.0..=1.0"),
        });
    }
    Ok(value)
}

fn parse_positive_u32(
    raw: Option<&str>,
    var: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::InvalidVar {
            var,
            reason: format!("'{raw}' is not a positive integer"),
        })
}

fn parse_log_level(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_LOG_LEVEL.to_string());
    };
    let level = raw.to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
        _ => Err(ConfigError::InvalidVar {
            var: "LOG_LEVEL",
            reason: format!("'{raw}' is not a log level (trace|debug|info|warn|error)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::{
        DEFAULT_LOG_LEVEL, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K,
        DEFAULT_TOP_P, Settings, parse_log_level, parse_positive_u32, parse_unit_interval,
    };
    use crate::error::ConfigError;

    fn settings_from_pairs(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Settings::from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn from_env_uses_defaults_for_optional_vars() {
        let settings = settings_from_pairs(&[
            ("GEMINI_API_KEY", "test-key"),
            ("MODEL_NAME", "test-model"),
        ])
        .expect("settings should load");

        assert_eq!(settings.api_key.expose_secret(), "test-key");
        assert_eq!(settings.model_name, "test-model");
        assert_eq!(settings.generation.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(settings.generation.top_p, DEFAULT_TOP_P);
        assert_eq!(settings.generation.top_k, DEFAULT_TOP_K);
        assert_eq!(
            settings.generation.max_output_tokens,
            DEFAULT_MAX_OUTPUT_TOKENS
        );
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn from_env_round_trips_configured_values() {
        let settings = settings_from_pairs(&[
            ("GEMINI_API_KEY", "test-key"),
            ("MODEL_NAME", "test-model"),
            ("TEMPERATURE", "0.5"),
            ("TOP_P", "0.8"),
            ("TOP_K", "40"),
            ("MAX_OUTPUT_TOKENS", "1000"),
            ("LOG_LEVEL", "DEBUG"),
        ])
        .expect("settings should load");

        assert_eq!(settings.generation.temperature, 0.5);
        assert_eq!(settings.generation.top_p, 0.8);
        assert_eq!(settings.generation.top_k, 40);
        assert_eq!(settings.generation.max_output_tokens, 1000);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn from_env_requires_api_key() {
        let err = settings_from_pairs(&[("MODEL_NAME", "test-model")])
            .expect_err("missing key should fail");
        assert!(matches!(err, ConfigError::MissingVar("GEMINI_API_KEY")));
    }

    #[test]
    fn from_env_requires_model_name() {
        let err = settings_from_pairs(&[("GEMINI_API_KEY", "test-key")])
            .expect_err("missing model should fail");
        assert!(matches!(err, ConfigError::MissingVar("MODEL_NAME")));
    }

    #[test]
    fn from_env_rejects_blank_required_values() {
        let err = settings_from_pairs(&[
            ("GEMINI_API_KEY", "   "),
            ("MODEL_NAME", "test-model"),
        ])
        .expect_err("blank key should fail");
        assert!(matches!(err, ConfigError::MissingVar("GEMINI_API_KEY")));
    }

    #[test]
    fn from_env_rejects_out_of_range_temperature() {
        let err = settings_from_pairs(&[
            ("GEMINI_API_KEY", "test-key"),
            ("MODEL_NAME", "test-model"),
            ("TEMPERATURE", "1.5"),
        ])
        .expect_err("out-of-range temperature should fail");
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                var: "TEMPERATURE",
                ..
            }
        ));
    }

    #[test]
    fn parse_unit_interval_accepts_bounds_and_defaults_when_missing() {
        assert_eq!(parse_unit_interval(None, "TOP_P", 0.95).unwrap(), 0.95);
        assert_eq!(parse_unit_interval(Some("0.0"), "TOP_P", 0.95).unwrap(), 0.0);
        assert_eq!(parse_unit_interval(Some("1.0"), "TOP_P", 0.95).unwrap(), 1.0);
        assert_eq!(
            parse_unit_interval(Some(" 0.25 "), "TOP_P", 0.95).unwrap(),
            0.25
        );
    }

    #[test]
    fn parse_unit_interval_rejects_non_numbers() {
        assert!(parse_unit_interval(Some("warm"), "TEMPERATURE", 1.0).is_err());
        assert!(parse_unit_interval(Some("-0.1"), "TEMPERATURE", 1.0).is_err());
    }

    #[test]
    fn parse_positive_u32_rejects_zero_and_garbage() {
        assert!(parse_positive_u32(Some("0"), "TOP_K", 64).is_err());
        assert!(parse_positive_u32(Some("-1"), "TOP_K", 64).is_err());
        assert!(parse_positive_u32(Some("many"), "TOP_K", 64).is_err());
        assert_eq!(parse_positive_u32(None, "TOP_K", 64).unwrap(), 64);
        assert_eq!(parse_positive_u32(Some("40"), "TOP_K", 64).unwrap(), 40);
    }

    #[test]
    fn parse_log_level_normalizes_case_and_rejects_unknown_levels() {
        assert_eq!(parse_log_level(None).unwrap(), "info");
        assert_eq!(parse_log_level(Some("WARN")).unwrap(), "warn");
        assert!(parse_log_level(Some("verbose")).is_err());
    }
}
