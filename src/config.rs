//! Runtime configuration
//!
//! All knobs come from environment variables with sensible defaults, loaded
//! once at startup. Merchant entries arrive as a JSON array in `MERCHANTS`
//! and are the only way merchants get registered; nothing self-configures
//! lazily at call time.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

/// One configured merchant
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantEntry {
    /// Registry key used in API requests
    pub id: String,
    /// Merchant root URL, e.g. `https://shop.example.com`
    pub base_url: String,
    /// Advertised UCP capabilities, informational
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Bearer token for authenticated merchants
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Gemini model name used when an API key is present
    pub model: String,
    /// When absent, the server falls back to the scripted executor
    pub gemini_api_key: Option<String>,
    /// Writers-room iteration cap
    pub max_iterations: u32,
    /// Whole-pipeline timeout for the pitch endpoint
    pub pipeline_timeout_secs: u64,
    /// Directory the file writer saves pitch documents to
    pub output_dir: PathBuf,
    pub merchants: Vec<MerchantEntry>,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let max_iterations = std::env::var("MAX_LOOP_ITERATIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let pipeline_timeout_secs = std::env::var("PIPELINE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));

        let merchants = match std::env::var("MERCHANTS") {
            Ok(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).context("MERCHANTS is not a valid JSON array")?
            }
            _ => Vec::new(),
        };

        Ok(Self {
            host,
            port,
            model,
            gemini_api_key,
            max_iterations,
            pipeline_timeout_secs,
            output_dir,
            merchants,
        })
    }
}
