//! API credentials read from the environment.

use crate::error::{ConfigError, ConfigResult};
use std::fmt;

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const HF_TOKEN_VAR: &str = "HF_TOKEN";

/// Secrets for the hosted services. Never written to the config file.
#[derive(Clone)]
pub struct Credentials {
    pub groq_api_key: String,
    pub hf_token: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential { name })
        };

        Ok(Self {
            groq_api_key: require(GROQ_API_KEY_VAR)?,
            hf_token: require(HF_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("groq_api_key", &"<redacted>")
            .field("hf_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let creds =
            Credentials::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_1"), ("HF_TOKEN", "hf_1")]))
                .unwrap();
        assert_eq!(creds.groq_api_key, "gsk_1");
        assert_eq!(creds.hf_token, "hf_1");
    }

    #[test]
    fn test_missing_groq_key_is_named() {
        let err = Credentials::from_lookup(lookup(&[("HF_TOKEN", "hf_1")])).unwrap_err();
        assert_eq!(err.to_string(), "GROQ_API_KEY not found in environment variables");
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let err = Credentials::from_lookup(lookup(&[("GROQ_API_KEY", "x"), ("HF_TOKEN", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { name: "HF_TOKEN" }));
    }

    #[test]
    fn test_debug_is_redacted() {
        let creds =
            Credentials::from_lookup(lookup(&[("GROQ_API_KEY", "secret"), ("HF_TOKEN", "tok")]))
                .unwrap();
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret"));
    }
}
