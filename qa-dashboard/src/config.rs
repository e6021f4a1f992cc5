use std::path::{Path, PathBuf};

use qa_client::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    fs_ext::read_file_to_string,
};

const APP_NAME: &str = "qa_dashboard";
const CONFIG_PATH_VAR: &str = "QA_DASHBOARD_CONFIG_PATH";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "dashboard.log";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub log_file: LogFile,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => PathBuf::from(path),
            Err(_) => base_dirs()?.get_config_file(CONFIG_FILE_NAME),
        };

        Self::load_from(path)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = read_file_to_string(path)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFile(PathBuf);

impl Default for LogFile {
    fn default() -> Self {
        let path = base_dirs()
            .and_then(|dirs| {
                dirs.place_state_file(LOG_FILE_NAME)
                    .map_err(|source| Error::PlaceFile {
                        source,
                        path: LOG_FILE_NAME.into(),
                    })
            })
            .unwrap_or_else(|_| std::env::temp_dir().join(LOG_FILE_NAME));
        LogFile(path)
    }
}

impl AsRef<Path> for LogFile {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

fn base_dirs() -> Result<xdg::BaseDirectories> {
    Ok(xdg::BaseDirectories::with_prefix(APP_NAME)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn load_api_host_and_log_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_file = "/tmp/qa.log"

[api]
host = "http://inference.lan:8000"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.log_file.as_ref(), Path::new("/tmp/qa.log"));
        assert_eq!(config.api.host.to_string(), "http://inference.lan:8000/");
        assert_eq!(config.api.timeout, qa_client::config::DEFAULT_TIMEOUT);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nhost = ").unwrap();

        let result = Config::load_from(file.path());

        assert!(matches!(result, Err(Error::TomlDe(_))));
    }
}
