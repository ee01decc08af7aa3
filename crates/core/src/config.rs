use crate::ApiError;
use std::time::Duration;
use url::Url;

pub const BASE_URL_ENV: &str = "PDR_API_BASE_URL";
pub const ORIGIN_ENV: &str = "PDR_ORIGIN";

/// Same-origin path that the dev server proxies to the backend.
pub const DEFAULT_BASE_URL: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5177";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Accepts either an absolute URL or a path relative to `origin`.
    pub fn resolve(base_url: &str, origin: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ApiError::InvalidRequest("base url is empty".to_string()));
        }

        let base_url = match Url::parse(base_url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(origin.trim())?.join(base_url)?,
            Err(error) => return Err(error.into()),
        };

        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(
            std::env::var(BASE_URL_ENV).ok().as_deref(),
            std::env::var(ORIGIN_ENV).ok().as_deref(),
        )
    }

    /// `from_env` with the variable values passed in; `None` means unset.
    pub fn from_vars(base_url: Option<&str>, origin: Option<&str>) -> Result<Self, ApiError> {
        Self::resolve(
            base_url.unwrap_or(DEFAULT_BASE_URL),
            origin.unwrap_or(DEFAULT_ORIGIN),
        )
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base}/{path}` without collapsing a path prefix on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
