pub mod orchestrator;
pub mod probe;
pub mod session;

pub use crate::domain::model::{CorrelationId, LookupKind, LookupReport, LookupResult};
pub use crate::domain::ports::FedApi;
pub use crate::utils::error::Result;
