use crate::config::{CliConfig, FileConfig};
use crate::utils::error::{FedError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_zero_duration, validate_positive_number, validate_url,
    Validate,
};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BASE_URL: &str = "https://api.moov.io/v1";
pub const LOCAL_BASE_URL: &str = "http://localhost";

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_IDLE_CONNECTIONS: usize = 100;
pub const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 100;
pub const MAX_CONNECTIONS_PER_HOST: usize = 100;
pub const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

pub fn default_user_agent() -> String {
    format!("moov fedtest/{}", VERSION)
}

/// Transport settings for the FED client. Built once, never mutated.
///
/// Building a `ClientConfig` does no I/O; the connection pool only exists
/// once [`ClientConfig::build_http_client`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    user_agent: String,
    timeout: Duration,
    max_idle_connections: usize,
    max_idle_connections_per_host: usize,
    max_connections_per_host: usize,
    idle_connection_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            user_agent: default_user_agent(),
            timeout: HTTP_TIMEOUT,
            max_idle_connections: MAX_IDLE_CONNECTIONS,
            max_idle_connections_per_host: MAX_IDLE_CONNECTIONS_PER_HOST,
            max_connections_per_host: MAX_CONNECTIONS_PER_HOST,
            idle_connection_timeout: IDLE_CONNECTION_TIMEOUT,
        }
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        Ok(Self::new(validate_url("base_url", base_url)?))
    }

    /// 解析 base URL：--base-url > --local > 設定檔 > 正式環境
    pub fn resolve(cli: &CliConfig, file: Option<&FileConfig>) -> Result<Self> {
        let file_base = file.and_then(|f| f.service.base_url.as_deref());
        let base_url = match (&cli.base_url, cli.local, file_base) {
            (Some(explicit), _, _) => explicit.as_str(),
            (None, true, _) => LOCAL_BASE_URL,
            (None, false, Some(from_file)) => from_file,
            (None, false, None) => DEFAULT_BASE_URL,
        };

        let config = Self::from_base_url(base_url)?;
        Ok(match file.and_then(|f| f.service.user_agent.as_deref()) {
            Some(user_agent) => config.with_user_agent(user_agent),
            None => config,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_idle_connections(&self) -> usize {
        self.max_idle_connections
    }

    pub fn max_idle_connections_per_host(&self) -> usize {
        self.max_idle_connections_per_host
    }

    pub fn max_connections_per_host(&self) -> usize {
        self.max_connections_per_host
    }

    pub fn idle_connection_timeout(&self) -> Duration {
        self.idle_connection_timeout
    }

    /// Resolve a service path (e.g. `fed/ach/search`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build the pooled HTTP client shared by every call of a run.
    ///
    /// reqwest only exposes the per-host idle bound; the total idle and
    /// per-host connection caps are kept for logging and reports.
    pub fn build_http_client(&self) -> Result<Client> {
        tracing::debug!(
            "HTTP client: timeout={:?}, max_idle={}, max_idle_per_host={}, \
             max_per_host={}, idle_timeout={:?}",
            self.timeout,
            self.max_idle_connections,
            self.max_idle_connections_per_host,
            self.max_connections_per_host,
            self.idle_connection_timeout
        );

        Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.max_idle_connections_per_host)
            .pool_idle_timeout(self.idle_connection_timeout)
            .build()
            .map_err(|e| FedError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", self.base_url.as_str())?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_non_zero_duration("timeout", self.timeout)?;
        validate_non_zero_duration("idle_connection_timeout", self.idle_connection_timeout)?;
        validate_positive_number("max_idle_connections", self.max_idle_connections, 1)?;
        validate_positive_number(
            "max_idle_connections_per_host",
            self.max_idle_connections_per_host,
            1,
        )?;
        validate_positive_number("max_connections_per_host", self.max_connections_per_host, 1)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_transport_policy() {
        let config = ClientConfig::from_base_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_idle_connections(), 100);
        assert_eq!(config.max_idle_connections_per_host(), 100);
        assert_eq!(config.max_connections_per_host(), 100);
        assert_eq!(config.idle_connection_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_user_agent_embeds_version() {
        let config = ClientConfig::from_base_url(LOCAL_BASE_URL).unwrap();
        assert_eq!(config.user_agent(), format!("moov fedtest/{}", VERSION));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ClientConfig::from_base_url("https://api.moov.io/v1").unwrap();
        assert_eq!(
            config.endpoint("fed/ach/search").unwrap().as_str(),
            "https://api.moov.io/v1/fed/ach/search"
        );
        assert_eq!(
            config.endpoint("/ping").unwrap().as_str(),
            "https://api.moov.io/v1/ping"
        );

        let local = ClientConfig::from_base_url(LOCAL_BASE_URL).unwrap();
        assert_eq!(local.endpoint("ping").unwrap().as_str(), "http://localhost/ping");
    }

    #[test]
    fn test_build_client_does_not_touch_network() {
        // 連到不存在的主機也能建立 client，代表建構過程沒有任何網路 I/O
        let config = ClientConfig::from_base_url("http://fed.invalid:1").unwrap();
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_file_user_agent_overrides_default() {
        let cli = <CliConfig as clap::Parser>::parse_from(["fedtest", "--local"]);
        let file: FileConfig = toml::from_str("[service]\nuser_agent = \"ops fedtest\"").unwrap();

        let config = ClientConfig::resolve(&cli, Some(&file)).unwrap();
        assert_eq!(config.user_agent(), "ops fedtest");

        let default = ClientConfig::resolve(&cli, None).unwrap();
        assert_eq!(default.user_agent(), default_user_agent());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = ClientConfig::from_base_url(LOCAL_BASE_URL)
            .unwrap()
            .with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ClientConfig::from_base_url("ftp://fed.example").is_err());
        assert!(ClientConfig::from_base_url("").is_err());
    }
}
