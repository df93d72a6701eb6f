use crate::config::EmptyResultPolicy;
use crate::domain::model::{
    CorrelationId, LookupKind, LookupOutcome, LookupPayload, LookupReport, LookupRequest,
    LookupResult,
};
use crate::domain::ports::FedApi;
use crate::utils::error::{FedError, Result};

/// Runs the ACH and Wire searches for one routing number.
///
/// The two lookups are independent: ACH always runs first, and its outcome
/// never decides whether Wire runs. No retries.
pub struct LookupOrchestrator<'a, A: FedApi + ?Sized> {
    api: &'a A,
    empty_result: EmptyResultPolicy,
}

impl<'a, A: FedApi + ?Sized> LookupOrchestrator<'a, A> {
    pub fn new(api: &'a A, empty_result: EmptyResultPolicy) -> Self {
        Self { api, empty_result }
    }

    pub async fn run_lookups(
        &self,
        routing_number: &str,
        correlation_id: &CorrelationId,
    ) -> LookupReport {
        let request = LookupRequest::new(routing_number, correlation_id.clone());

        let ach = self.lookup(LookupKind::Ach, &request).await;
        let wire = self.lookup(LookupKind::Wire, &request).await;

        LookupReport { ach, wire }
    }

    pub async fn lookup(&self, kind: LookupKind, request: &LookupRequest) -> LookupResult {
        let fetched = match kind {
            LookupKind::Ach => self
                .api
                .search_ach(request)
                .await
                .map(|r| LookupPayload::Ach(r.ach_participants)),
            LookupKind::Wire => self
                .api
                .search_wire(request)
                .await
                .map(|r| LookupPayload::Wire(r.wire_participants)),
        };

        let judged = fetched.and_then(|payload| self.judge(kind, &request.routing_number, payload));
        let outcome = match judged {
            Ok(payload) => {
                tracing::info!(
                    "[SUCCESS] {}: found {} ({} participants)",
                    kind,
                    request.routing_number,
                    payload.len()
                );
                LookupOutcome::Success(payload)
            }
            Err(e) => {
                tracing::error!(
                    "[FAILURE] {}: error looking up {}: {}",
                    kind,
                    request.routing_number,
                    e
                );
                LookupOutcome::Failure(e)
            }
        };

        LookupResult {
            kind,
            routing_number: request.routing_number.clone(),
            outcome,
        }
    }

    /// 依照空結果策略判斷成功或失敗
    fn judge(
        &self,
        kind: LookupKind,
        routing_number: &str,
        payload: LookupPayload,
    ) -> Result<LookupPayload> {
        if payload.is_empty() {
            return match self.empty_result {
                EmptyResultPolicy::Allow => {
                    tracing::warn!(
                        "{}: no participants for {} (empty result allowed)",
                        kind,
                        routing_number
                    );
                    Ok(payload)
                }
                EmptyResultPolicy::Fail => Err(FedError::EmptyResultError {
                    kind: kind.to_string(),
                    routing_number: routing_number.to_string(),
                }),
            };
        }

        if !payload.contains_routing_number(routing_number) {
            tracing::warn!(
                "{}: {} participants returned but none has routing number {}",
                kind,
                payload.len(),
                routing_number
            );
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        AchParticipant, AchSearchResponse, WireParticipant, WireSearchResponse,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFed {
        ach_rows: usize,
        wire_rows: usize,
        ach_fails: bool,
        calls: Mutex<Vec<(LookupKind, CorrelationId)>>,
    }

    #[async_trait]
    impl FedApi for FakeFed {
        async fn ping(&self, _correlation_id: &CorrelationId) -> Result<()> {
            Ok(())
        }

        async fn search_ach(&self, request: &LookupRequest) -> Result<AchSearchResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((LookupKind::Ach, request.correlation_id.clone()));
            if self.ach_fails {
                return Err(FedError::StatusError {
                    operation: "ACH search".to_string(),
                    status: 502,
                    message: None,
                });
            }
            Ok(AchSearchResponse {
                ach_participants: (0..self.ach_rows)
                    .map(|_| AchParticipant {
                        routing_number: Some(request.routing_number.clone()),
                        ..Default::default()
                    })
                    .collect(),
            })
        }

        async fn search_wire(&self, request: &LookupRequest) -> Result<WireSearchResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((LookupKind::Wire, request.correlation_id.clone()));
            Ok(WireSearchResponse {
                wire_participants: (0..self.wire_rows)
                    .map(|_| WireParticipant {
                        routing_number: Some(request.routing_number.clone()),
                        ..Default::default()
                    })
                    .collect(),
            })
        }
    }

    #[tokio::test]
    async fn test_both_lookups_succeed_in_order() {
        let api = FakeFed {
            ach_rows: 2,
            wire_rows: 1,
            ..Default::default()
        };
        let id = CorrelationId::generate();

        let report = LookupOrchestrator::new(&api, EmptyResultPolicy::Allow)
            .run_lookups("322271627", &id)
            .await;

        assert!(report.all_succeeded());
        assert_eq!(report.ach.payload().unwrap().len(), 2);
        assert_eq!(report.wire.payload().unwrap().len(), 1);
        assert!(report.ach.payload().unwrap().contains_routing_number("322271627"));

        let calls = api.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(LookupKind::Ach, id.clone()), (LookupKind::Wire, id)]
        );
    }

    #[tokio::test]
    async fn test_ach_failure_does_not_block_wire() {
        let api = FakeFed {
            ach_fails: true,
            wire_rows: 1,
            ..Default::default()
        };

        let report = LookupOrchestrator::new(&api, EmptyResultPolicy::Allow)
            .run_lookups("322271627", &CorrelationId::generate())
            .await;

        assert!(!report.ach.is_success());
        assert!(report.wire.is_success());
        assert!(!report.all_succeeded());
        assert_eq!(api.calls.lock().unwrap().len(), 2);
        assert_eq!(report.ach.routing_number, "322271627");
    }

    #[tokio::test]
    async fn test_empty_result_allowed() {
        let api = FakeFed::default();

        let report = LookupOrchestrator::new(&api, EmptyResultPolicy::Allow)
            .run_lookups("000000000", &CorrelationId::generate())
            .await;

        assert!(report.all_succeeded());
        assert!(report.ach.payload().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_fails_under_strict_policy() {
        let api = FakeFed {
            ach_rows: 1,
            ..Default::default()
        };

        let report = LookupOrchestrator::new(&api, EmptyResultPolicy::Fail)
            .run_lookups("322271627", &CorrelationId::generate())
            .await;

        assert!(report.ach.is_success());
        assert!(matches!(
            report.wire.error(),
            Some(FedError::EmptyResultError { .. })
        ));
    }
}
