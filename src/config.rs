//! Configuration file parser for ~/.config/atomfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! It only shapes the HTTP transport and output formatting of the binary,
//! the library itself takes a ready `reqwest::Client`.
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `User-Agent` header sent when fetching feeds.
    pub user_agent: String,

    /// Whole-request timeout in seconds. 0 disables the timeout.
    pub request_timeout_secs: u64,

    /// Indent generated XML.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: concat!("atomfeed/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
            pretty: true,
        }
    }
}

impl Config {
    /// SEC-014: Config files over 1 MB are refused.
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["user_agent", "request_timeout_secs", "pretty"];

    /// Default location, `$HOME/.config/atomfeed/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("atomfeed")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file gives the defaults. Keys other than the three
    /// known ones are ignored with a warning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = Self::read_file(path)? else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::warn_unknown_keys(&content);
        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            user_agent = %config.user_agent,
            request_timeout_secs = config.request_timeout_secs,
            pretty = config.pretty,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reads the file if it exists, refusing anything over `MAX_FILE_SIZE`.
    fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Size comes from the open handle, so it matches what is read
        let size = file.metadata()?.len();
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes (max {})",
                path.display(),
                size,
                Self::MAX_FILE_SIZE
            )));
        }

        let mut content = String::new();
        file.take(Self::MAX_FILE_SIZE).read_to_string(&mut content)?;
        Ok(Some(content))
    }

    fn warn_unknown_keys(content: &str) {
        let Ok(table) = content.parse::<toml::Table>() else {
            return;
        };
        table
            .keys()
            .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .for_each(|key| tracing::warn!(key = %key, "Ignoring unknown config key"));
    }

    /// Builds the HTTP client used for fetching feeds.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if self.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.request_timeout_secs));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.user_agent.starts_with("atomfeed/"));
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.pretty);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/atomfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("atomfeed_config_test_whitespace", "   \n  \n  ");

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("atomfeed_config_test_partial", "pretty = false\n");

        let config = Config::load(&path).unwrap();
        assert!(!config.pretty);
        assert_eq!(config.request_timeout_secs, 30);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
user_agent = "my-reader/2.0"
request_timeout_secs = 5
pretty = false
"#;
        let (dir, path) = write_config("atomfeed_config_test_full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.user_agent, "my-reader/2.0");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.pretty);
        assert!(config.http_client().is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("atomfeed_config_test_invalid", "this is not [valid toml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config(
            "atomfeed_config_test_unknown",
            "pretty = true\ntotally_fake_key = \"x\"\n",
        );

        assert!(Config::load(&path).unwrap().pretty);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("atomfeed_config_test_wrongtype", "request_timeout_secs = \"soon\"\n");

        assert!(Config::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("atomfeed_config_test_too_large", &"a".repeat(1_048_577));

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        assert!(err.to_string().contains("1048577 bytes"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = std::env::temp_dir().join("atomfeed_config_test_directory");
        std::fs::create_dir_all(&dir).unwrap();

        assert!(matches!(Config::load(&dir), Err(ConfigError::Io(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_builds_client() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.http_client().is_ok());
    }
}
