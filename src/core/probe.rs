use crate::domain::model::CorrelationId;
use crate::domain::ports::FedApi;
use crate::utils::error::Result;

/// Health-check gate run before any lookup.
///
/// Any error (connection, timeout, non-2xx) is returned as-is; the caller
/// treats it as fatal for the whole run.
pub async fn probe_liveness<A: FedApi + ?Sized>(
    api: &A,
    correlation_id: &CorrelationId,
) -> Result<()> {
    match api.ping(correlation_id).await {
        Ok(()) => {
            tracing::info!("[INFO] ping succeeded");
            Ok(())
        }
        Err(e) => {
            tracing::error!("[FAILURE] ping error: {}", e);
            Err(e)
        }
    }
}
