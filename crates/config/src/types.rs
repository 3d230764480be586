use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::ConfigError;

/// Bind address shared by both servers when `MCP_HOST` is absent.
const DEFAULT_HOST: &str = "localhost";
/// Default listen port for the Brave Search server.
const DEFAULT_SEARCH_PORT: u16 = 8001;
/// Default listen port for the filesystem server.
const DEFAULT_FILESYSTEM_PORT: u16 = 8000;
/// Upstream endpoint used when `BRAVE_SEARCH_API_URL` is absent.
const DEFAULT_BRAVE_SEARCH_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

// Environment keys recognized by the loaders. Anything else in the raw
// mapping is ignored.
pub const KEY_HOST: &str = "MCP_HOST";
pub const KEY_PORT: &str = "MCP_PORT";
pub const KEY_LOG_LEVEL: &str = "MCP_LOG_LEVEL";
pub const KEY_API_KEY: &str = "MCP_API_KEY";
pub const KEY_BASE_PATH: &str = "MCP_BASE_PATH";
pub const KEY_BRAVE_API_KEY: &str = "BRAVE_API_KEY";
pub const KEY_BRAVE_SEARCH_API_URL: &str = "BRAVE_SEARCH_API_URL";

/// Key material loaded from the environment.
///
/// The wrapped value is reachable only through [`Secret::as_str`]; both
/// `Debug` and `Display` render a placeholder so secrets cannot leak through
/// logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value, e.g. to place it in a request header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Logging verbosity accepted by `MCP_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn from_value(key: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidEnum {
                key,
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Directive for a `tracing_subscriber` env filter.
    pub fn as_filter_directive(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by both server roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Listen port (1-65535). The default differs per server role.
    pub port: u16,
    /// Logging verbosity.
    pub log_level: LogLevel,
    /// Inbound API key. When unset, authentication is disabled.
    pub api_key: Option<Secret>,
}

impl ServerConfig {
    /// Build the shared settings from a raw key/value mapping.
    ///
    /// The default port is supplied by the caller since it differs per
    /// server role.
    pub fn load(raw: &HashMap<String, String>, default_port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            host: match non_empty(raw, KEY_HOST) {
                Some(value) => value.to_string(),
                None => DEFAULT_HOST.to_string(),
            },
            port: parse_port(raw, default_port)?,
            log_level: match non_empty(raw, KEY_LOG_LEVEL) {
                Some(value) => LogLevel::from_value(KEY_LOG_LEVEL, value)?,
                None => LogLevel::default(),
            },
            api_key: non_empty(raw, KEY_API_KEY).map(Secret::new),
        })
    }

    fn to_env(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (KEY_HOST.to_string(), self.host.clone()),
            (KEY_PORT.to_string(), self.port.to_string()),
            (KEY_LOG_LEVEL.to_string(), self.log_level.to_string()),
        ];
        if let Some(api_key) = &self.api_key {
            pairs.push((KEY_API_KEY.to_string(), api_key.as_str().to_string()));
        }
        pairs
    }
}

/// Configuration for the Brave Search proxy server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchServerConfig {
    pub server: ServerConfig,
    /// Credential for the upstream Brave Search API. Mandatory.
    pub brave_api_key: Secret,
    /// Upstream search endpoint.
    pub brave_search_api_url: Url,
}

impl SearchServerConfig {
    /// Validate a raw key/value mapping into a search-server configuration.
    ///
    /// Pure transformation: the origin of the mapping (process environment,
    /// env file, test fixture) is irrelevant. The first error encountered is
    /// returned.
    pub fn load(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server = ServerConfig::load(raw, DEFAULT_SEARCH_PORT)?;

        let brave_api_key = non_empty(raw, KEY_BRAVE_API_KEY)
            .map(Secret::new)
            .ok_or(ConfigError::MissingRequired {
                key: KEY_BRAVE_API_KEY,
            })?;

        let brave_search_api_url = match non_empty(raw, KEY_BRAVE_SEARCH_API_URL) {
            Some(value) => Url::parse(value).map_err(|_| ConfigError::InvalidType {
                key: KEY_BRAVE_SEARCH_API_URL,
                value: value.to_string(),
            })?,
            None => Url::parse(DEFAULT_BRAVE_SEARCH_API_URL)
                .expect("default search endpoint is a valid URL"),
        };

        Ok(Self {
            server,
            brave_api_key,
            brave_search_api_url,
        })
    }

    /// Serialize back to the key/value surface.
    ///
    /// Reloading the returned pairs yields an equal configuration. The pairs
    /// contain the raw secret values and must not be logged.
    pub fn to_env(&self) -> Vec<(String, String)> {
        let mut pairs = self.server.to_env();
        pairs.push((
            KEY_BRAVE_API_KEY.to_string(),
            self.brave_api_key.as_str().to_string(),
        ));
        pairs.push((
            KEY_BRAVE_SEARCH_API_URL.to_string(),
            self.brave_search_api_url.to_string(),
        ));
        pairs
    }
}

/// Configuration for the filesystem access server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemServerConfig {
    pub server: ServerConfig,
    /// Sandbox root. When unset, no directory restriction is applied.
    pub base_path: Option<PathBuf>,
}

impl FilesystemServerConfig {
    /// Validate a raw key/value mapping into a filesystem-server
    /// configuration.
    pub fn load(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server = ServerConfig::load(raw, DEFAULT_FILESYSTEM_PORT)?;

        let base_path = match non_empty(raw, KEY_BASE_PATH) {
            Some(value) => {
                let path = PathBuf::from(value);
                if !path.is_dir() {
                    return Err(ConfigError::InvalidPath {
                        key: KEY_BASE_PATH,
                        path: value.to_string(),
                    });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self { server, base_path })
    }

    /// Serialize back to the key/value surface.
    ///
    /// Reloading the returned pairs yields an equal configuration. The pairs
    /// contain the raw secret values and must not be logged.
    pub fn to_env(&self) -> Vec<(String, String)> {
        let mut pairs = self.server.to_env();
        if let Some(base_path) = &self.base_path {
            pairs.push((
                KEY_BASE_PATH.to_string(),
                base_path.to_string_lossy().into_owned(),
            ));
        }
        pairs
    }
}

/// A set-but-empty variable behaves like an absent one.
fn non_empty<'a>(raw: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    raw.get(key).map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn parse_port(raw: &HashMap<String, String>, default_port: u16) -> Result<u16, ConfigError> {
    let Some(value) = non_empty(raw, KEY_PORT) else {
        return Ok(default_port);
    };
    let port: u16 = value.parse().map_err(|_| ConfigError::InvalidType {
        key: KEY_PORT,
        value: value.to_string(),
    })?;
    if port == 0 {
        return Err(ConfigError::InvalidType {
            key: KEY_PORT,
            value: value.to_string(),
        });
    }
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_accepts_known_names() {
        assert_eq!(
            LogLevel::from_value(KEY_LOG_LEVEL, "debug").unwrap(),
            LogLevel::Debug
        );
        assert_eq!(
            LogLevel::from_value(KEY_LOG_LEVEL, " warn ").unwrap(),
            LogLevel::Warn
        );
    }

    #[test]
    fn log_level_rejects_unknown_names() {
        let err = LogLevel::from_value(KEY_LOG_LEVEL, "trace").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnum { key: KEY_LOG_LEVEL, .. }
        ));
    }

    #[test]
    fn secret_never_renders_its_value() {
        let secret = Secret::new("super-sensitive");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
    }

    #[test]
    fn port_zero_is_rejected() {
        let raw = HashMap::from([(KEY_PORT.to_string(), "0".to_string())]);
        let err = parse_port(&raw, 8000).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType { key: KEY_PORT, .. }));
    }

    #[test]
    fn port_above_u16_is_rejected() {
        let raw = HashMap::from([(KEY_PORT.to_string(), "70000".to_string())]);
        let err = parse_port(&raw, 8000).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType { key: KEY_PORT, .. }));
    }
}
