//! Runtime configuration loaded from the environment
//!
//! Read once at startup and handed to the provider and router as a plain value.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Origins allowed to call the API from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`, fine for local development only
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model_name: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub cors_origins: CorsOrigins,
}

impl Config {
    /// Load from the process environment (call `dotenvy::dotenv()` first to pick up `.env`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY").ok_or_else(|| {
            Error::Config("GEMINI_API_KEY environment variable is required".to_string())
        })?;

        let model_name =
            var("GEMINI_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());

        let api_base = var("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = match var("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| Error::Config(format!("Invalid GEMINI_TIMEOUT_SECS: {raw}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid HOST: {host}")))?;

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("Invalid PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = var("CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(CorsOrigins::Any);

        Ok(Self {
            api_key,
            model_name,
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            bind_addr: SocketAddr::new(host, port),
            cors_origins,
        })
    }
}

fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        // whitespace doesn't count as a key
        assert!(load(&[("GEMINI_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("GEMINI_API_KEY", "secret")]).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.cors_origins, CorsOrigins::Any);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL_NAME", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://127.0.0.1:9999/v1beta/"),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("CORS_ALLOW_ORIGINS", "chrome-extension://abc, https://example.com"),
        ])
        .unwrap();

        assert_eq!(config.model_name, "gemini-2.0-flash");
        assert_eq!(config.api_base, "http://127.0.0.1:9999/v1beta");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "chrome-extension://abc".to_string(),
                "https://example.com".to_string()
            ])
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(load(&[("GEMINI_API_KEY", "k"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "k"), ("GEMINI_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "k"), ("HOST", "not-an-ip")]).is_err());
    }

    #[test]
    fn test_wildcard_origin_wins() {
        assert_eq!(parse_origins("https://a.com, *"), CorsOrigins::Any);
        assert_eq!(parse_origins(" , "), CorsOrigins::Any);
    }
}
