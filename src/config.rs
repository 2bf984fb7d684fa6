use std::net::SocketAddr;

use url::Url;

use crate::error::TutorError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_NAME_VAR: &str = "GEMINI_MODEL_NAME";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const LISTEN_ADDR_VAR: &str = "MATH_TUTOR_ADDR";

pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

// ── Config ───────────────────────────────────────────────────────────────────

/// Process-wide settings, read once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model_name: String,
    pub api_base: Url,
    pub listen_addr: SocketAddr,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("api_base", &self.api_base.as_str())
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, TutorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, TutorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty value counts as unset; whitespace is kept as given.
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(TutorError::ConfigurationMissing(API_KEY_VAR))?;
        let model_name = get(MODEL_NAME_VAR).unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());

        let api_base = get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(api_base.trim_end_matches('/')).map_err(|e| {
            TutorError::ConfigurationInvalid {
                var: API_BASE_VAR,
                reason: e.to_string(),
            }
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(TutorError::ConfigurationInvalid {
                var: API_BASE_VAR,
                reason: format!("unsupported scheme '{}'", api_base.scheme()),
            });
        }

        let listen_addr = get(LISTEN_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| TutorError::ConfigurationInvalid {
                var: LISTEN_ADDR_VAR,
                reason: e.to_string(),
            })?;

        Ok(Config {
            api_key,
            model_name,
            api_base,
            listen_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, TutorError::ConfigurationMissing(API_KEY_VAR)));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "")])).unwrap_err();
        assert!(matches!(err, TutorError::ConfigurationMissing(_)));
    }

    #[test]
    fn whitespace_api_key_is_passed_through() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).unwrap();
        assert_eq!(config.api_key, "  ");
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(config.listen_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (MODEL_NAME_VAR, "gemini-2.0-flash"),
            (API_BASE_VAR, "http://127.0.0.1:9000/v1beta/"),
            (LISTEN_ADDR_VAR, "127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "gemini-2.0-flash");
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.listen_addr.port(), 3000);
    }

    #[test]
    fn bad_api_base_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (API_BASE_VAR, "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            TutorError::ConfigurationInvalid { var: API_BASE_VAR, .. }
        ));
    }

    #[test]
    fn debug_output_hides_key() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
