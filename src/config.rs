//! Configuration types.
//!
//! Everything is read once at startup by [`SyncConfig::from_env`] and handed
//! to the client and store constructors. Nothing else touches the environment.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Notion API base URL.
pub const DEFAULT_API_URL: &str = "https://api.notion.com";

/// Notion API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Largest page size the query endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Connection settings for the Notion database being read.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Integration token, sent as a bearer token.
    pub token: SecretString,
    /// ID of the Notion database to query.
    pub database_id: String,
    /// Base URL of the API (no trailing path).
    pub api_url: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Records requested per query call.
    pub page_size: u32,
}

impl SourceConfig {
    /// Build a config with default URL, version and page size.
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            database_id: database_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Point the client at a different base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Names of the Notion properties each column is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub title: String,
    pub status: String,
    pub due_date: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            status: "Status".to_string(),
            due_date: "Due Date".to_string(),
        }
    }
}

/// Where synced rows are written.
#[derive(Debug, Clone)]
pub enum DestinationConfig {
    /// A libSQL database file on local disk.
    Local { path: PathBuf },
    /// A remote libSQL server.
    Remote {
        url: String,
        auth_token: SecretString,
    },
}

/// Complete configuration for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub properties: PropertyNames,
    pub destination: DestinationConfig,
}

impl SyncConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let token = require("NOTION_TOKEN")?;
        let database_id = require("NOTION_DATABASE_ID")?;

        let page_size = match get("NOTION_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => MAX_PAGE_SIZE,
        };

        let source = SourceConfig {
            token: SecretString::from(token),
            database_id,
            api_url: get("NOTION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            notion_version: get("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            page_size,
        };

        let defaults = PropertyNames::default();
        let properties = PropertyNames {
            title: get("NOTION_PROP_NAME").unwrap_or(defaults.title),
            status: get("NOTION_PROP_STATUS").unwrap_or(defaults.status),
            due_date: get("NOTION_PROP_DUE_DATE").unwrap_or(defaults.due_date),
        };

        let destination = match (get("SYNC_DB_URL"), get("SYNC_DB_PATH")) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidValue {
                    key: "SYNC_DB_URL".to_string(),
                    message: "SYNC_DB_URL and SYNC_DB_PATH are both set; choose one destination"
                        .to_string(),
                });
            }
            (Some(url), None) => {
                if !is_remote_url(&url) {
                    return Err(ConfigError::InvalidValue {
                        key: "SYNC_DB_URL".to_string(),
                        message: format!(
                            "expected a libsql://, https:// or http:// URL, got {url:?}"
                        ),
                    });
                }
                let auth_token = require("SYNC_DB_AUTH_TOKEN")?;
                DestinationConfig::Remote {
                    url,
                    auth_token: SecretString::from(auth_token),
                }
            }
            (None, Some(path)) => DestinationConfig::Local {
                path: PathBuf::from(path),
            },
            (None, None) => {
                return Err(ConfigError::MissingRequired {
                    key: "SYNC_DB_PATH".to_string(),
                    hint: "Set SYNC_DB_PATH to a local database file, or SYNC_DB_URL and \
                           SYNC_DB_AUTH_TOKEN for a remote libSQL server."
                        .to_string(),
                });
            }
        };

        Ok(Self {
            source,
            properties,
            destination,
        })
    }
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "NOTION_PAGE_SIZE".to_string(),
        message,
    };
    let size: u32 = raw
        .parse()
        .map_err(|e| invalid(format!("{raw:?} is not a number: {e}")))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}, got {size}")));
    }
    Ok(size)
}

fn is_remote_url(url: &str) -> bool {
    ["libsql://", "https://", "http://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}
