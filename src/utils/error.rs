use std::error::Error as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FedError {
    #[error("HTTP request failed: {}", describe_http_error(.0))]
    HttpError(#[from] reqwest::Error),

    #[error("{operation} returned status {status}{}", service_message_suffix(.message))]
    StatusError {
        operation: String,
        status: u16,
        message: Option<String>,
    },

    #[error("Failed to decode {operation} response: {source}")]
    DecodeError {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} search returned no participants for routing number {routing_number}")]
    EmptyResultError {
        kind: String,
        routing_number: String,
    },

    #[error("Config file parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl FedError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FedError::HttpError(_) => ErrorCategory::Network,
            FedError::StatusError { .. } => ErrorCategory::Service,
            FedError::DecodeError { .. } | FedError::EmptyResultError { .. } => ErrorCategory::Data,
            FedError::TomlError(_)
            | FedError::UrlError(_)
            | FedError::ConfigError { .. }
            | FedError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Network | ErrorCategory::Service => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 是否為逾時錯誤
    pub fn is_timeout(&self) -> bool {
        matches!(self, FedError::HttpError(e) if e.is_timeout())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FedError::HttpError(e) if e.is_timeout() => {
                "The FED service did not answer before the request timeout".to_string()
            }
            FedError::HttpError(e) if e.is_connect() => {
                "Could not connect to the FED service".to_string()
            }
            FedError::HttpError(_) => "The request to the FED service failed".to_string(),
            FedError::StatusError { operation, status, .. } => {
                format!("The FED service rejected {} with HTTP {}", operation, status)
            }
            FedError::DecodeError { operation, .. } => {
                format!("The FED service sent an unreadable {} response", operation)
            }
            FedError::EmptyResultError { kind, routing_number } => {
                format!("No {} participant matched {}", kind, routing_number)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FedError::HttpError(e) if e.is_timeout() => {
                "Check service load and network latency, then rerun"
            }
            FedError::HttpError(_) => {
                "Verify the base URL (--local / --base-url) and that the service is running"
            }
            FedError::StatusError { status, .. } if *status >= 500 => {
                "Inspect the service logs for this request id"
            }
            FedError::StatusError { .. } => "Check the routing number and request parameters",
            FedError::DecodeError { .. } => "The client and service API versions may differ",
            FedError::EmptyResultError { .. } => {
                "Confirm the routing number exists in the loaded FED data files"
            }
            FedError::TomlError(_) => "Check the --config file syntax",
            FedError::UrlError(_)
            | FedError::ConfigError { .. }
            | FedError::InvalidConfigValueError { .. } => "Fix the configuration value and rerun",
        }
    }
}

/// reqwest only prints its outer message; append every `source()` so the
/// real cause (refused connection, DNS, timeout) reaches the logs.
fn describe_http_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    if error.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}

fn service_message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, FedError>;
