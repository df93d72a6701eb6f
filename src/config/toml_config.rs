use crate::config::EmptyResultPolicy;
use crate::utils::error::{FedError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `--config` file. Every key may be omitted.
///
/// ```toml
/// [service]
/// base_url = "http://localhost:8086"
/// user_agent = "ops fedtest"
///
/// [lookup]
/// routing_number = "322271627"
/// empty_result = "fail"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub lookup: LookupSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupSection {
    pub routing_number: Option<String>,
    pub empty_result: Option<EmptyResultPolicy>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| FedError::ConfigError {
                message: format!("cannot read config file {}: {}", path.as_ref().display(), e),
            })?;
        let config: FileConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config file {}", path.as_ref().display());
        Ok(config)
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.service.base_url {
            validate_url("service.base_url", base_url)?;
        }
        if let Some(user_agent) = &self.service.user_agent {
            validate_non_empty_string("service.user_agent", user_agent)?;
        }
        if let Some(routing_number) = &self.lookup.routing_number {
            validate_non_empty_string("lookup.routing_number", routing_number)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
base_url = "http://localhost:8086"
user_agent = "ops fedtest"

[lookup]
routing_number = "121042882"
empty_result = "fail"
"#
        )
        .unwrap();

        let config = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service.base_url.as_deref(), Some("http://localhost:8086"));
        assert_eq!(config.service.user_agent.as_deref(), Some("ops fedtest"));
        assert_eq!(config.lookup.routing_number.as_deref(), Some("121042882"));
        assert_eq!(config.lookup.empty_result, Some(EmptyResultPolicy::Fail));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = FileConfig::from_file(file.path()).unwrap();
        assert!(config.service.base_url.is_none());
        assert!(config.lookup.empty_result.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nbase_uri = \"http://localhost\"").unwrap();
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(FedError::TomlError(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nbase_url = \"not a url\"").unwrap();
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(FedError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        match FileConfig::from_file("/nonexistent/fedtest.toml") {
            Err(FedError::ConfigError { message }) => {
                assert!(message.contains("/nonexistent/fedtest.toml"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
