use crate::config::client::VERSION;
use crate::config::{EmptyResultPolicy, RunConfig};
use crate::core::orchestrator::LookupOrchestrator;
use crate::core::probe::probe_liveness;
use crate::domain::model::{CorrelationId, LookupKind, LookupReport, LookupResult};
use crate::domain::ports::FedApi;
use crate::utils::error::FedError;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    LookupFailure,
    LivenessFailure,
}

impl RunOutcome {
    /// 0 成功、1 查詢失敗、3 服務無法連線（2 保留給設定錯誤）
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::LookupFailure => 1,
            RunOutcome::LivenessFailure => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    fn from_probe(result: &std::result::Result<(), FedError>) -> Self {
        match result {
            Ok(()) => Self {
                status: StepStatus::Success,
                matches: None,
                error: None,
            },
            Err(e) => Self {
                status: StepStatus::Failure,
                matches: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn from_lookup(result: &LookupResult) -> Self {
        Self {
            status: if result.is_success() {
                StepStatus::Success
            } else {
                StepStatus::Failure
            },
            matches: result.payload().map(|p| p.len()),
            error: result.error().map(|e| e.to_string()),
        }
    }
}

/// Summary of one diagnostic run, printed with `--output json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub version: &'static str,
    pub base_url: String,
    pub correlation_id: CorrelationId,
    pub routing_number: String,
    pub empty_result: EmptyResultPolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ping: StepReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ach: Option<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire: Option<StepReport>,
    pub outcome: RunOutcome,
    #[serde(skip)]
    pub lookups: Option<LookupReport>,
}

impl RunReport {
    pub fn lookup(&self, kind: LookupKind) -> Option<&LookupResult> {
        self.lookups.as_ref().map(|l| match kind {
            LookupKind::Ach => &l.ach,
            LookupKind::Wire => &l.wire,
        })
    }
}

/// One full diagnostic pass: ping gate, then ACH and Wire lookups.
pub struct DiagnosticSession<A: FedApi> {
    api: A,
    config: RunConfig,
}

impl<A: FedApi> DiagnosticSession<A> {
    pub fn new(api: A, config: RunConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run with a freshly generated correlation id.
    pub async fn run(&self) -> RunReport {
        self.run_with_id(CorrelationId::generate()).await
    }

    pub async fn run_with_id(&self, correlation_id: CorrelationId) -> RunReport {
        let started_at = Utc::now();
        let routing_number = self.config.routing_number.clone();
        tracing::info!("[INFO] using x-request-id: {}", correlation_id);

        let ping_result = probe_liveness(&self.api, &correlation_id).await;
        let ping = StepReport::from_probe(&ping_result);

        // 服務無法連線時不執行任何查詢
        let lookups = if let Err(e) = &ping_result {
            tracing::error!("💡 {}", e.recovery_suggestion());
            None
        } else {
            let orchestrator = LookupOrchestrator::new(&self.api, self.config.empty_result);
            Some(orchestrator.run_lookups(&routing_number, &correlation_id).await)
        };

        let outcome = match &lookups {
            None => RunOutcome::LivenessFailure,
            Some(report) if report.all_succeeded() => RunOutcome::Success,
            Some(report) => {
                for failed in report.results().into_iter().filter(|r| !r.is_success()) {
                    if let Some(e) = failed.error() {
                        tracing::error!("💡 {}: {}", failed.kind, e.recovery_suggestion());
                    }
                }
                RunOutcome::LookupFailure
            }
        };

        RunReport {
            version: VERSION,
            base_url: self.config.client.base_url().to_string(),
            correlation_id,
            routing_number,
            empty_result: self.config.empty_result,
            started_at,
            finished_at: Utc::now(),
            ping,
            ach: lookups.as_ref().map(|l| StepReport::from_lookup(&l.ach)),
            wire: lookups.as_ref().map(|l| StepReport::from_lookup(&l.wire)),
            outcome,
            lookups,
        }
    }
}
