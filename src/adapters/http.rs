use crate::config::ClientConfig;
use crate::domain::model::{
    AchSearchResponse, CorrelationId, LookupKind, LookupRequest, ServiceError, WireSearchResponse,
};
use crate::domain::ports::FedApi;
use crate::utils::error::{FedError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

const MAX_ERROR_BODY_CHARS: usize = 256;

/// reqwest-backed [`FedApi`]. One pooled client serves every call of a run.
pub struct HttpFedClient {
    client: Client,
    config: ClientConfig,
}

impl HttpFedClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn search<T: DeserializeOwned>(
        &self,
        kind: LookupKind,
        request: &LookupRequest,
    ) -> Result<T> {
        let operation = format!("{} search", kind);
        let endpoint = self.config.endpoint(kind.search_path())?;

        tracing::debug!(
            "📡 {}: GET {} routingNumber={} request_id={}",
            operation,
            endpoint,
            request.routing_number,
            request.correlation_id
        );

        let response = self
            .client
            .get(endpoint)
            .query(&[("routingNumber", request.routing_number.as_str())])
            .header(REQUEST_ID_HEADER, request.correlation_id.as_str())
            .send()
            .await?;

        let response = ensure_success(&operation, response).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| FedError::DecodeError { operation, source })
    }
}

#[async_trait]
impl FedApi for HttpFedClient {
    async fn ping(&self, correlation_id: &CorrelationId) -> Result<()> {
        let endpoint = self.config.endpoint("ping")?;
        tracing::debug!("📡 ping: GET {} request_id={}", endpoint, correlation_id);

        let response = self
            .client
            .get(endpoint)
            .header(REQUEST_ID_HEADER, correlation_id.as_str())
            .send()
            .await?;

        // 回應在此離開作用域即釋放連線
        ensure_success("ping", response).await.map(drop)
    }

    async fn search_ach(&self, request: &LookupRequest) -> Result<AchSearchResponse> {
        self.search(LookupKind::Ach, request).await
    }

    async fn search_wire(&self, request: &LookupRequest) -> Result<WireSearchResponse> {
        self.search(LookupKind::Wire, request).await
    }
}

/// Pass 2xx responses through; turn anything else into a `StatusError`
/// carrying the service's `{"error": ...}` message when it sent one.
async fn ensure_success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("📡 {}: response status {}", operation, status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FedError::StatusError {
        operation: operation.to_string(),
        status: status.as_u16(),
        message: service_error_message(&body),
    })
}

fn service_error_message(body: &str) -> Option<String> {
    if let Ok(ServiceError { error: Some(message) }) = serde_json::from_str::<ServiceError>(body) {
        return Some(message);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
    }
}
