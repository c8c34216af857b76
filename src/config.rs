use std::env;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::application::services::answer_generator::DEFAULT_TEMPERATURE;
use crate::application::services::conversation_store::DEFAULT_PREVIEW_CHARS;
use crate::application::services::embedding_service::DEFAULT_TOP_K;
use crate::application::services::text_splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::application::use_cases::ingest_document::DEFAULT_MAX_UPLOAD_BYTES;
use crate::infrastructure::external_services::groq_chat_client::{
    DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
};
use crate::infrastructure::external_services::huggingface_embeddings::{
    DEFAULT_EMBEDDINGS_BASE_URL, DEFAULT_EMBEDDINGS_MODEL,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Largest accepted MAX_UPLOAD_BYTES (1 GiB).
const MAX_UPLOAD_CEILING: usize = 1024 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Without a database URL documents live in memory for the life of the process.
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub max_upload_bytes: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    pub source_preview_chars: usize,
    pub embeddings: EmbeddingsConfig,
    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_pool_size: 10,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            retrieval_top_k: DEFAULT_TOP_K,
            source_preview_chars: DEFAULT_PREVIEW_CHARS,
            embeddings: EmbeddingsConfig {
                api_key: None,
                base_url: DEFAULT_EMBEDDINGS_BASE_URL.to_string(),
                model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
                batch_size: 512,
                timeout_secs: 30,
                max_retries: 2,
            },
            chat: ChatConfig {
                api_key: String::new(),
                base_url: DEFAULT_CHAT_BASE_URL.to_string(),
                model: DEFAULT_CHAT_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
                timeout_secs: 60,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            port: parse_or(&get, "PORT", defaults.port)?,
            database_url: get("DATABASE_URL"),
            database_pool_size: parse_or(&get, "DATABASE_POOL_SIZE", defaults.database_pool_size)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            chunk_size: parse_or(&get, "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", defaults.chunk_overlap)?,
            retrieval_top_k: parse_or(&get, "RETRIEVAL_TOP_K", defaults.retrieval_top_k)?,
            source_preview_chars: parse_or(
                &get,
                "SOURCE_PREVIEW_CHARS",
                defaults.source_preview_chars,
            )?,
            embeddings: EmbeddingsConfig {
                api_key: get("HUGGINGFACE_API_KEY"),
                base_url: url_or(&get, "EMBEDDINGS_BASE_URL", defaults.embeddings.base_url)?,
                model: get("EMBEDDINGS_MODEL").unwrap_or(defaults.embeddings.model),
                batch_size: parse_or(&get, "EMBEDDINGS_BATCH_SIZE", defaults.embeddings.batch_size)?,
                timeout_secs: parse_or(
                    &get,
                    "EMBEDDINGS_TIMEOUT_SECS",
                    defaults.embeddings.timeout_secs,
                )?,
                max_retries: parse_or(&get, "EMBEDDINGS_MAX_RETRIES", defaults.embeddings.max_retries)?,
            },
            chat: ChatConfig {
                api_key: get("GROQ_API_KEY").unwrap_or_default(),
                base_url: url_or(&get, "CHAT_BASE_URL", defaults.chat.base_url)?,
                model: get("CHAT_MODEL").unwrap_or(defaults.chat.model),
                temperature: parse_or(&get, "CHAT_TEMPERATURE", defaults.chat.temperature)?,
                timeout_secs: parse_or(&get, "CHAT_TIMEOUT_SECS", defaults.chat.timeout_secs)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidValue {
                name: "CHUNK_OVERLAP",
                value: self.chunk_overlap.to_string(),
                reason: format!("must be smaller than CHUNK_SIZE ({})", self.chunk_size),
            });
        }
        if self.max_upload_bytes == 0 || self.max_upload_bytes > MAX_UPLOAD_CEILING {
            return Err(ConfigError::InvalidValue {
                name: "MAX_UPLOAD_BYTES",
                value: self.max_upload_bytes.to_string(),
                reason: format!("must be between 1 and {}", MAX_UPLOAD_CEILING),
            });
        }
        if self.retrieval_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RETRIEVAL_TOP_K",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::InvalidValue {
                name: "CHAT_TEMPERATURE",
                value: self.chat.temperature.to_string(),
                reason: "must be between 0 and 2".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                name,
                value,
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

fn url_or<G>(get: &G, name: &'static str, default: String) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(name) else {
        return Ok(default);
    };

    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidValue {
        name,
        value: value.clone(),
        reason: e.to_string(),
    })?;
    Ok(value.trim().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.chunk_size, 2000);
        assert_eq!(config.chunk_overlap, 100);
        assert_eq!(config.retrieval_top_k, 3);
        assert_eq!(config.source_preview_chars, 150);
        assert_eq!(config.embeddings.model, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.embeddings.batch_size, 512);
        assert_eq!(config.chat.model, "llama-3.3-70b-versatile");
        assert!((config.chat.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/mentor"),
            ("CHAT_BASE_URL", "http://localhost:11434/v1/"),
            ("GROQ_API_KEY", "gsk_123"),
            ("RETRIEVAL_TOP_K", "5"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/mentor"));
        assert_eq!(config.chat.base_url, "http://localhost:11434/v1");
        assert_eq!(config.chat.api_key, "gsk_123");
        assert_eq!(config.retrieval_top_k, 5);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = config_from(&[("PORT", "  "), ("DATABASE_URL", "")]).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("EMBEDDINGS_BASE_URL", "not a url")]).is_err());
        assert!(config_from(&[("CHUNK_SIZE", "100"), ("CHUNK_OVERLAP", "100")]).is_err());
        assert!(config_from(&[("RETRIEVAL_TOP_K", "0")]).is_err());
    }

    #[test]
    fn test_upload_limit_is_bounded() {
        assert!(config_from(&[("MAX_UPLOAD_BYTES", "0")]).is_err());
        assert!(config_from(&[("MAX_UPLOAD_BYTES", &usize::MAX.to_string())]).is_err());

        let config = config_from(&[("MAX_UPLOAD_BYTES", "1048576")]).unwrap();
        assert_eq!(config.max_upload_bytes, 1024 * 1024);
    }
}
