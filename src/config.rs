// src/config.rs
use crate::errors::StyleSeerError;
use std::env;
use std::str::FromStr;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const AFFILIATE_BASE_URL: &str =
    "https://idx-fitted-affiliategit-93924427-92591340310.us-east1.run.app";

#[derive(Debug, Clone)]
pub struct Config {
    /// Left unset until the first LLM call needs it.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub default_model: String,
    pub affiliate_base_url: String,
    pub redis_url: Option<String>,
    pub bind_addr: String,
    pub max_closet_images: usize,
    pub max_upload_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_base_url: OPENROUTER_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            affiliate_base_url: AFFILIATE_BASE_URL.to_string(),
            redis_url: None,
            bind_addr: "0.0.0.0:8080".to_string(),
            max_closet_images: 5,
            max_upload_mb: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, StyleSeerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StyleSeerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or(defaults.openrouter_base_url),
            default_model: get("STYLESEER_MODEL").unwrap_or(defaults.default_model),
            affiliate_base_url: get("AFFILIATE_BASE_URL").unwrap_or(defaults.affiliate_base_url),
            redis_url: get("REDIS_URL"),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_closet_images: parse_or(get("MAX_CLOSET_IMAGES"), "MAX_CLOSET_IMAGES", 5)?,
            max_upload_mb: parse_or(get("MAX_UPLOAD_MB"), "MAX_UPLOAD_MB", 5)?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn affiliate_search_endpoint(&self) -> String {
        format!("{}/process", self.affiliate_base_url.trim_end_matches('/'))
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, StyleSeerError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StyleSeerError::Config(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}
