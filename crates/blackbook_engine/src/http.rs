use std::time::Duration;

use url::Url;

use crate::{BackendError, EngineConfig, FailureKind};

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl From<&EngineConfig> for HttpSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings::from(&EngineConfig::default())
    }
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, BackendError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))
}

/// Resolve `path` against the base url. Absolute `http(s)://` urls are used
/// as they are.
pub fn resolve_url(base_url: &str, path: &str) -> Result<Url, BackendError> {
    let joined = if is_absolute(path) {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    };
    Url::parse(&joined).map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
}

/// Base url with `segments` appended, each percent-encoded as one path segment.
pub fn resolve_segments(base_url: &str, segments: &[&str]) -> Result<Url, BackendError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| BackendError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn is_absolute(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Transport failure, with `fallback` used when the error text is empty.
pub(crate) fn map_reqwest_error(err: reqwest::Error, fallback: &str) -> BackendError {
    let text = err.to_string();
    let message = if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    };
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, message);
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, message);
    }
    BackendError::new(FailureKind::Network, message)
}
