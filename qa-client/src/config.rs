use std::{fmt::Display, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Environment variable selecting the API base url.
pub const API_URL_VAR: &str = "QA_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Base url of the inference API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiHost(Url);

impl ApiHost {
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Append `path` to the base url verbatim,
    /// keeping any path prefix the base url carries.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl Default for ApiHost {
    fn default() -> Self {
        let url: Url = DEFAULT_API_URL
            .parse()
            .expect("should be able to parse default URL");
        ApiHost(url)
    }
}

impl FromStr for ApiHost {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse().map(ApiHost).map_err(|source| Error::InvalidUrl {
            url: s.to_string(),
            source,
        })
    }
}

impl Display for ApiHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub host: ApiHost,
    /// Fixed client timeout, never read from a config file.
    #[serde(skip, default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new(ApiHost::default())
    }
}

impl ApiConfig {
    pub fn new(host: ApiHost) -> Self {
        ApiConfig {
            host,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        ApiConfig { timeout, ..self }
    }
}
