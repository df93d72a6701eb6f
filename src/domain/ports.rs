use crate::domain::model::{AchSearchResponse, CorrelationId, LookupRequest, WireSearchResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The FED directory service as seen by this client.
///
/// The HTTP adapter implements it against a live service; tests swap in
/// recording fakes so ordering can be checked without a network.
#[async_trait]
pub trait FedApi: Send + Sync {
    async fn ping(&self, correlation_id: &CorrelationId) -> Result<()>;
    async fn search_ach(&self, request: &LookupRequest) -> Result<AchSearchResponse>;
    async fn search_wire(&self, request: &LookupRequest) -> Result<WireSearchResponse>;
}
