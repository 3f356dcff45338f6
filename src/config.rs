//! Process settings read from the environment
//!
//! `.env` is loaded into the environment by `main` before `Settings::from_env`
//! runs. Only the network address is a hard requirement. Model settings are
//! kept raw and checked when the chat session starts, so a missing
//! `GEMINI_API_KEY` or a bad `GEMINI_TEMPERATURE` leaves just the chat route
//! degraded.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::llm::{gemini::DEFAULT_BASE_URL, SessionSettings};

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub knowledge_file: PathBuf,
    pub leads_file: PathBuf,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub session: SessionSettings,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let path = |key: &str, default: &str| PathBuf::from(get(key).unwrap_or_else(|| default.to_string()));

        let host = parse_or("BYTEZINHO_HOST", get("BYTEZINHO_HOST"), IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_or("BYTEZINHO_PORT", get("BYTEZINHO_PORT"), 5000)?;

        Ok(Self {
            host,
            port,
            knowledge_file: path("BYTEZINHO_KNOWLEDGE_FILE", "dados.txt"),
            leads_file: path("BYTEZINHO_LEADS_FILE", "leads.txt"),
            templates_dir: path("BYTEZINHO_TEMPLATES_DIR", "templates"),
            static_dir: path("BYTEZINHO_STATIC_DIR", "static"),
            session: SessionSettings {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
                base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                max_output_tokens: get("GEMINI_MAX_OUTPUT_TOKENS"),
                temperature: get("GEMINI_TEMPERATURE"),
            },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
