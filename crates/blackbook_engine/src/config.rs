use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Which backend contract renders the live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewContract {
    /// `POST /api/preview` with the flat form, wrapped in the response envelope.
    #[default]
    Envelope,
    /// Bare `POST /preview` with the flat preview payload.
    Legacy,
}

impl FromStr for PreviewContract {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "envelope" | "api" => Ok(PreviewContract::Envelope),
            "legacy" => Ok(PreviewContract::Legacy),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub api_base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub preview_debounce: Duration,
    pub autosave_debounce: Duration,
    pub preview_contract: PreviewContract,
    pub draft_dir: PathBuf,
    /// Where downloaded documents are written.
    pub download_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            preview_debounce: Duration::from_millis(300),
            autosave_debounce: Duration::from_millis(1000),
            preview_contract: PreviewContract::Envelope,
            draft_dir: PathBuf::from("."),
            download_dir: PathBuf::from("."),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BLACKBOOK_API_BASE_URL") {
            config.api_base_url = normalize_base_url(&raw);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "BLACKBOOK_PREVIEW_DEBOUNCE_MS")? {
            config.preview_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "BLACKBOOK_AUTOSAVE_DEBOUNCE_MS")? {
            config.autosave_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "BLACKBOOK_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(contract) = parse_var::<PreviewContract, _>(&lookup, "BLACKBOOK_PREVIEW_CONTRACT")? {
            config.preview_contract = contract;
        }
        if let Some(dir) = lookup("BLACKBOOK_DRAFT_DIR").filter(|v| !v.trim().is_empty()) {
            config.draft_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("BLACKBOOK_DOWNLOAD_DIR").filter(|v| !v.trim().is_empty()) {
            config.download_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

/// Trailing slashes are stripped; blank input falls back to the default.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
