pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::HttpFedClient;
pub use config::{CliConfig, ClientConfig, EmptyResultPolicy, OutputFormat, RunConfig};
pub use core::session::{DiagnosticSession, RunOutcome, RunReport};
pub use domain::model::{CorrelationId, LookupKind};
pub use utils::error::{FedError, Result};
