pub mod client;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use client::ClientConfig;
pub use toml_config::FileConfig;

/// Known-good sample routing number (JPMorgan Chase, California).
pub const DEFAULT_ROUTING_NUMBER: &str = "322271627";

/// How a successful search with zero participants is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyResultPolicy {
    /// Zero matches still count as a successful lookup.
    #[default]
    Allow,
    /// Zero matches fail the lookup.
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "fedtest", version)]
#[command(about = "Diagnostic client for the FED routing-number directory service")]
pub struct CliConfig {
    #[arg(long, help = "Use local HTTP addresses (e.g. a service started with `cargo run`)")]
    pub local: bool,

    #[arg(long, help = "Routing number to lookup in FED [default: 322271627]")]
    pub routing_number: Option<String>,

    #[arg(long, help = "Explicit service base URL, overrides --local and the config file")]
    pub base_url: Option<String>,

    #[arg(long, value_enum, help = "How to judge a search with zero matches [default: allow]")]
    pub empty_result: Option<EmptyResultPolicy>,

    #[arg(long, help = "Optional TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Everything one diagnostic run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub client: ClientConfig,
    pub routing_number: String,
    pub empty_result: EmptyResultPolicy,
    pub output: OutputFormat,
}

impl RunConfig {
    /// 合併 CLI 參數與設定檔：CLI > 設定檔 > 預設值
    pub fn resolve(cli: &CliConfig, file: Option<&FileConfig>) -> Result<Self> {
        let client = ClientConfig::resolve(cli, file)?;

        let routing_number = cli
            .routing_number
            .clone()
            .or_else(|| file.and_then(|f| f.lookup.routing_number.clone()))
            .unwrap_or_else(|| DEFAULT_ROUTING_NUMBER.to_string());

        let empty_result = cli
            .empty_result
            .or_else(|| file.and_then(|f| f.lookup.empty_result))
            .unwrap_or_default();

        let config = Self {
            client,
            routing_number,
            empty_result,
            output: cli.output,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the optional config file named by `--config` and resolve.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(FileConfig::from_file(path)?),
            None => None,
        };
        Self::resolve(cli, file.as_ref())
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("routing_number", &self.routing_number)?;
        self.client.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["fedtest"];
        argv.extend_from_slice(args);
        CliConfig::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(!cli.local);
        assert_eq!(cli.log_format, LogFormat::Compact);

        let config = RunConfig::resolve(&cli, None).unwrap();
        assert_eq!(config.routing_number, DEFAULT_ROUTING_NUMBER);
        assert_eq!(config.empty_result, EmptyResultPolicy::Allow);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.client.base_url().as_str(), "https://api.moov.io/v1/");
    }

    #[test]
    fn test_cli_flags() {
        let cli = parse(&[
            "--local",
            "--routing-number",
            "121042882",
            "--empty-result",
            "fail",
            "--output",
            "json",
        ]);
        let config = RunConfig::resolve(&cli, None).unwrap();
        assert_eq!(config.routing_number, "121042882");
        assert_eq!(config.empty_result, EmptyResultPolicy::Fail);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.client.base_url().as_str(), "http://localhost/");
    }

    #[test]
    fn test_cli_takes_precedence_over_file() {
        let file: FileConfig = toml::from_str(
            r#"
[service]
base_url = "http://fed.internal:8086"

[lookup]
routing_number = "091400046"
empty_result = "fail"
"#,
        )
        .unwrap();

        let from_file = RunConfig::resolve(&parse(&[]), Some(&file)).unwrap();
        assert_eq!(from_file.routing_number, "091400046");
        assert_eq!(from_file.empty_result, EmptyResultPolicy::Fail);
        assert_eq!(from_file.client.base_url().as_str(), "http://fed.internal:8086/");

        let cli = parse(&["--routing-number", "322271627", "--empty-result", "allow", "--local"]);
        let overridden = RunConfig::resolve(&cli, Some(&file)).unwrap();
        assert_eq!(overridden.routing_number, "322271627");
        assert_eq!(overridden.empty_result, EmptyResultPolicy::Allow);
        assert_eq!(overridden.client.base_url().as_str(), "http://localhost/");
    }

    #[test]
    fn test_load_reads_config_flag_and_merges_cli() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
base_url = "http://fed.internal:8086"

[lookup]
routing_number = "091400046"
"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = RunConfig::load(&parse(&["--config", &path, "--local"])).unwrap();
        assert_eq!(config.routing_number, "091400046");
        assert_eq!(config.client.base_url().as_str(), "http://localhost/");
        assert_eq!(config.empty_result, EmptyResultPolicy::Allow);
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let err = RunConfig::load(&parse(&["--config", "/nonexistent/fedtest.toml"])).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fedtest.toml"));
    }

    #[test]
    fn test_blank_routing_number_rejected() {
        let cli = parse(&["--routing-number", "  "]);
        assert!(RunConfig::resolve(&cli, None).is_err());
    }
}
