//! Configuration management for the adapter processes.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and an optional `.env` file) once at startup. The
//! resulting value is passed by reference into the service clients; nothing
//! reads the environment after bootstrap.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default Brave Search web endpoint.
pub const DEFAULT_BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Default GitHub REST API base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default GitLab REST API base URL, overridable with `GITLAB_API_URL`.
pub const DEFAULT_GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// Which backing service this process adapts.
///
/// Each adapter runs as its own process and needs exactly one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Brave web search.
    BraveSearch,
    /// GitHub repositories and code search.
    GitHub,
    /// GitLab merge requests.
    GitLab,
}

impl AdapterKind {
    /// Name reported to clients unless `MCP_SERVER_NAME` overrides it.
    pub fn server_name(self) -> &'static str {
        match self {
            Self::BraveSearch => "brave-search",
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
        }
    }

    /// Environment variable holding the adapter's credential.
    pub fn credential_var(self) -> &'static str {
        match self {
            Self::BraveSearch => "BRAVE_API_KEY",
            Self::GitHub => "GITHUB_PERSONAL_ACCESS_TOKEN",
            Self::GitLab => "GITLAB_PERSONAL_ACCESS_TOKEN",
        }
    }
}

/// Main configuration structure for an adapter process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Adapter served by this process.
    pub adapter: AdapterKind,

    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Backing service base URLs.
    pub endpoints: EndpointsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Credentials for the backing APIs.
///
/// Only the one matching [`Config::adapter`] is required.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Brave Search subscription token.
    /// Get a key at: https://brave.com/search/api/
    pub brave_api_key: Option<String>,

    /// GitHub personal access token.
    pub github_token: Option<String>,

    /// GitLab personal access token.
    pub gitlab_token: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("brave_api_key", &self.brave_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("gitlab_token", &self.gitlab_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Base URLs of the backing services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Brave web search endpoint.
    pub brave_search_url: String,

    /// GitHub REST API root.
    pub github_api_url: String,

    /// GitLab REST API root.
    pub gitlab_api_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            brave_search_url: DEFAULT_BRAVE_SEARCH_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            gitlab_api_url: DEFAULT_GITLAB_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Create a configuration with default values for the given adapter.
    pub fn new(adapter: AdapterKind) -> Self {
        Self {
            adapter,
            server: ServerConfig {
                name: adapter.server_name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_LOG_TIMESTAMPS`, `MCP_TRANSPORT`). Credentials use
    /// the names the services document (`BRAVE_API_KEY`,
    /// `GITHUB_PERSONAL_ACCESS_TOKEN`, `GITLAB_PERSONAL_ACCESS_TOKEN`), plus
    /// `GITLAB_API_URL` for self-hosted GitLab. Empty values count as unset.
    ///
    /// Missing credentials are not an error here; see
    /// [`Config::require_credential`].
    pub fn from_env(adapter: AdapterKind) -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::new(adapter);

        if let Some(name) = env_value("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_value("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(timestamps) = env_value("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.credentials = CredentialsConfig {
            brave_api_key: env_value(AdapterKind::BraveSearch.credential_var()),
            github_token: env_value(AdapterKind::GitHub.credential_var()),
            gitlab_token: env_value(AdapterKind::GitLab.credential_var()),
        };

        if let Some(url) = env_value("GITLAB_API_URL") {
            info!("GitLab API URL set to {}", url);
            config.endpoints.gitlab_api_url = url;
        }

        debug!("Credentials loaded: {:?}", config.credentials);

        config
    }

    /// Return the credential the configured adapter needs.
    ///
    /// Fails with a configuration error when it is absent; callers treat that
    /// as fatal before the transport opens.
    pub fn require_credential(&self) -> Result<&str> {
        let credential = match self.adapter {
            AdapterKind::BraveSearch => self.credentials.brave_api_key.as_deref(),
            AdapterKind::GitHub => self.credentials.github_token.as_deref(),
            AdapterKind::GitLab => self.credentials.gitlab_token.as_deref(),
        };

        credential.ok_or_else(|| {
            Error::config(format!(
                "{} environment variable is required",
                self.adapter.credential_var()
            ))
        })
    }
}

/// Read a non-empty environment variable.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
