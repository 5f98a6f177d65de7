//! Configuration for the documentation client
//!
//! Values come from the host environment (`DOCGEN_*` variables) or a JSON
//! file. Credential, endpoint and model have no shipped defaults.

use std::path::Path;
use serde::{Deserialize, Serialize};
use log::{debug, error};
use crate::error::Error;
use crate::normalize::LanguageProfile;

pub const ENV_API_KEY: &str = "DOCGEN_API_KEY";
pub const ENV_ENDPOINT: &str = "DOCGEN_ENDPOINT";
pub const ENV_MODEL: &str = "DOCGEN_MODEL";
pub const ENV_TEMPERATURE: &str = "DOCGEN_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "DOCGEN_MAX_TOKENS";
pub const ENV_TIMEOUT_SECS: &str = "DOCGEN_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "DOCGEN_MAX_ATTEMPTS";
pub const ENV_BASE_DELAY_MS: &str = "DOCGEN_BASE_DELAY_MS";
pub const ENV_DOC_STYLE: &str = "DOCGEN_DOC_STYLE";

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig
{   /// Total attempts, including the first
    pub max_attempts: usize
  , /// Base of the exponential delay in milliseconds
    pub base_delay_ms: u64
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_attempts: 5
          , base_delay_ms: 1000
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgenConfig
{   /// Full chat-completions URL
    pub endpoint: String
  , /// Bearer credential
    pub api_key: String
  , /// Model identifier
    pub model: String
  , /// Sampling temperature
    pub temperature: f32
  , /// Output token budget
    pub max_tokens: usize
  , /// Per-attempt timeout in seconds
    pub timeout_secs: u64
  , /// Documentation style named in the system instruction
    pub doc_style: String
  , pub retry: RetryConfig
  , pub language: LanguageProfile
}

impl Default for DocgenConfig
{   fn default() -> Self
    {   DocgenConfig
        {   endpoint: String::new()
          , api_key: String::new()
          , model: String::new()
          , temperature: 0.1
          , max_tokens: 256
          , timeout_secs: 30
          , doc_style: "Google-style".to_string()
          , retry: RetryConfig::default()
          , language: LanguageProfile::default()
        }
    }
}

impl DocgenConfig
{   /// Load from the process environment
    pub fn from_env() -> Result<Self, Error>
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any name -> value lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where F: Fn(&str) -> Option<String>
    {   let mut config = DocgenConfig::default();
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    /// Override fields with any values present in the lookup
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), Error>
    where F: Fn(&str) -> Option<String>
    {   if let Some(v) = lookup(ENV_API_KEY) { self.api_key = v; }
        if let Some(v) = lookup(ENV_ENDPOINT) { self.endpoint = v; }
        if let Some(v) = lookup(ENV_MODEL) { self.model = v; }
        if let Some(v) = lookup(ENV_DOC_STYLE) { self.doc_style = v; }
        if let Some(v) = lookup(ENV_TEMPERATURE)
        {   self.temperature = parse_var(ENV_TEMPERATURE, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_TOKENS)
        {   self.max_tokens = parse_var(ENV_MAX_TOKENS, &v)?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS)
        {   self.timeout_secs = parse_var(ENV_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_ATTEMPTS)
        {   self.retry.max_attempts = parse_var(ENV_MAX_ATTEMPTS, &v)?;
        }
        if let Some(v) = lookup(ENV_BASE_DELAY_MS)
        {   self.retry.base_delay_ms = parse_var(ENV_BASE_DELAY_MS, &v)?;
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P)
      -> Result<Self, Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| {
          error!("Cannot read config {}: {}", path.display(), e);
          Error::Configuration(
            format!("cannot read {}: {}", path.display(), e)
          )
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, Error>
    {   serde_json::from_str(text).map_err(|e| {
          Error::Configuration(format!("invalid config JSON: {}", e))
        })
    }

    /// Check everything a dispatch needs before touching the network
    pub fn validate(&self) -> Result<(), Error>
    {   if self.api_key.trim().is_empty()
        {   return Err(Error::Configuration(
              format!("API key is missing (set {})", ENV_API_KEY)
            ));
        }
        if is_placeholder_key(&self.api_key)
        {   return Err(Error::Configuration(
              "API key is a placeholder value".to_string()
            ));
        }
        if self.endpoint.trim().is_empty()
        {   return Err(Error::Configuration(
              format!("endpoint is missing (set {})", ENV_ENDPOINT)
            ));
        }
        if self.model.trim().is_empty()
        {   return Err(Error::Configuration(
              format!("model is missing (set {})", ENV_MODEL)
            ));
        }
        if self.retry.max_attempts == 0
        {   return Err(Error::Configuration(
              "max_attempts must be at least 1".to_string()
            ));
        }
        if self.timeout_secs == 0
        {   return Err(Error::Configuration(
              format!("timeout must be at least 1 second (set {})", ENV_TIMEOUT_SECS)
            ));
        }
        self.language.validate()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str)
  -> Result<T, Error>
{   value.trim().parse().map_err(|_| {
      Error::Configuration(
        format!("{} has an invalid value: {:?}", name, value)
      )
    })
}

/// True for keys that were obviously never filled in,
/// e.g. `YOUR_API_KEY_HERE` or `<api-key>`
pub fn is_placeholder_key(key: &str) -> bool
{   let key = key.trim();
    let upper = key.to_ascii_uppercase();
    upper.starts_with("YOUR_")
      || upper.starts_with("YOUR-")
      || upper.ends_with("_HERE")
      || (key.starts_with('<') && key.ends_with('>'))
      || matches!(upper.as_str(), "CHANGEME" | "XXX" | "API_KEY" | "TODO")
}

#[cfg(test)]
mod tests
{   use super::*;
    use std::collections::HashMap;

    fn complete() -> HashMap<&'static str, String>
    {   let mut vars = HashMap::new();
        vars.insert(ENV_API_KEY, "csk-live-123".to_string());
        vars.insert(ENV_ENDPOINT,
          "https://api.example.test/v1/chat/completions".to_string());
        vars.insert(ENV_MODEL, "llama-test".to_string());
        vars
    }

    #[test]
    fn lookup_fills_required_fields_and_keeps_defaults()
    {   let vars = complete();
        let config = DocgenConfig::from_lookup(|k| vars.get(k).cloned())
          .unwrap();
        assert_eq!(config.model, "llama-test");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lookup_parses_numbers()
    {   let mut vars = complete();
        vars.insert(ENV_BASE_DELAY_MS, "2000".to_string());
        vars.insert(ENV_TEMPERATURE, "0.5".to_string());
        let config = DocgenConfig::from_lookup(|k| vars.get(k).cloned())
          .unwrap();
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn bad_number_is_configuration_error()
    {   let mut vars = complete();
        vars.insert(ENV_MAX_TOKENS, "lots".to_string());
        let err = DocgenConfig::from_lookup(|k| vars.get(k).cloned())
          .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn missing_or_placeholder_key_fails_validation()
    {   let mut config = DocgenConfig::from_json_str(
          r#"{"endpoint":"http://localhost/v1","model":"m"}"#
        ).unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.api_key = "YOUR_LLAMA_4_SCOUT_API_KEY_HERE".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.api_key = "real-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_fails_validation()
    {   let mut vars = complete();
        vars.insert(ENV_TIMEOUT_SECS, "0".to_string());
        let config = DocgenConfig::from_lookup(|k| vars.get(k).cloned())
          .unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn empty_language_markers_fail_validation()
    {   let base = r#""api_key":"k","endpoint":"http://localhost/v1","model":"m""#;

        let config = DocgenConfig::from_json_str(
          &format!(r#"{{{},"language":{{"doc_delimiter":""}}}}"#, base)
        ).unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = DocgenConfig::from_json_str(
          &format!(r#"{{{},"language":{{"def_keywords":["def ",""]}}}}"#, base)
        ).unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = DocgenConfig::from_json_str(
          &format!(r#"{{{},"language":{{"fence_tag":"py"}}}}"#, base)
        ).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn placeholder_detection()
    {   assert!(is_placeholder_key("YOUR_API_KEY_HERE"));
        assert!(is_placeholder_key("<api-key>"));
        assert!(is_placeholder_key("changeme"));
        assert!(!is_placeholder_key("csk-ehev12345"));
    }

    #[test]
    fn json_overrides_nested_retry()
    {   let config = DocgenConfig::from_json_str(
          r#"{"api_key":"k","retry":{"base_delay_ms":2000}}"#
        ).unwrap();
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.language, LanguageProfile::default());
    }
}
