//! Runtime configuration from the environment (and `.env`, via [`crate::init`])

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::card::MAX_BATCH_SIZE;
use crate::config_error;
use crate::error::Result;
use crate::resolver::registry::{RemoteEndpoints, BINLIST_BASE_URL, BINTABLE_BASE_URL};
use crate::store::DEFAULT_DATABASE_PATH;
use crate::types::{ResolverConfig, SynthesisConfig};

pub const ENV_DATABASE: &str = "BIN_FORGE_DB";
pub const ENV_OFFLINE: &str = "BIN_FORGE_OFFLINE";
pub const ENV_TIER_TIMEOUT_MS: &str = "BIN_FORGE_TIER_TIMEOUT_MS";
pub const ENV_GEN_COUNT: &str = "BIN_FORGE_GEN_COUNT";
pub const ENV_BINLIST_URL: &str = "BINLIST_BASE_URL";
pub const ENV_BINTABLE_URL: &str = "BINTABLE_BASE_URL";
pub const ENV_BINTABLE_KEY: &str = "BINTABLE_API_KEY";

/// Everything the binary needs to build a store, resolver and synthesizer
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub offline: bool,
    pub resolver: ResolverConfig,
    pub endpoints: RemoteEndpoints,
    pub synthesis: SynthesisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            offline: false,
            resolver: ResolverConfig::default(),
            endpoints: RemoteEndpoints::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DATABASE) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(flag) = get(ENV_OFFLINE) {
            config.offline = parse_flag(ENV_OFFLINE, &flag)?;
        }

        if let Some(ms) = get(ENV_TIER_TIMEOUT_MS) {
            let ms: u64 = ms.parse().map_err(|_| {
                config_error!("{} must be a number of milliseconds, got '{}'", ENV_TIER_TIMEOUT_MS, ms)
            })?;
            if ms == 0 {
                return Err(config_error!("{} must be greater than zero", ENV_TIER_TIMEOUT_MS));
            }
            config.resolver.tier_timeout = Duration::from_millis(ms);
        }

        if let Some(count) = get(ENV_GEN_COUNT) {
            let count: usize = count.parse().map_err(|_| {
                config_error!("{} must be a positive integer, got '{}'", ENV_GEN_COUNT, count)
            })?;
            config.synthesis.batch_size = count.clamp(1, MAX_BATCH_SIZE);
        }

        config.endpoints.binlist_base_url = get(ENV_BINLIST_URL).unwrap_or_else(|| BINLIST_BASE_URL.to_string());
        config.endpoints.bintable_base_url = get(ENV_BINTABLE_URL).unwrap_or_else(|| BINTABLE_BASE_URL.to_string());
        config.endpoints.bintable_api_key = get(ENV_BINTABLE_KEY);

        if config.offline {
            config.resolver.enable_binlist = false;
            config.resolver.enable_bintable = false;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(config_error!("{} must be true or false, got '{}'", key, other)),
    }
}
