use std::fmt;

use super::ApiError;

/// Environment variable holding the completion API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Bearer credential for the completion API
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Pick the first non-blank key, environment before config file.
    pub fn resolve(env_value: Option<&str>, config_value: Option<&str>) -> Result<Self, ApiError> {
        [env_value, config_value]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(|value| ApiKey(value.to_string()))
            .ok_or_else(|| {
                ApiError::MissingCredential(format!(
                    "{} is not set. Export it or add openai.api_key to the config file.",
                    API_KEY_ENV
                ))
            })
    }

    /// Resolve using the process environment
    pub fn from_env_or(config_value: Option<&str>) -> Result<Self, ApiError> {
        let env_value = std::env::var(API_KEY_ENV).ok();
        Self::resolve(env_value.as_deref(), config_value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
