use crate::utils::error::FedError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-run request identifier, sent as `X-Request-ID` on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random id (32 lowercase hex characters).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LookupKind {
    Ach,
    Wire,
}

impl LookupKind {
    pub fn label(&self) -> &'static str {
        match self {
            LookupKind::Ach => "ACH",
            LookupKind::Wire => "Wire",
        }
    }

    /// 服務端的搜尋路徑（相對於 base URL）
    pub fn search_path(&self) -> &'static str {
        match self {
            LookupKind::Ach => "fed/ach/search",
            LookupKind::Wire => "fed/wire/search",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub routing_number: String,
    pub correlation_id: CorrelationId,
}

impl LookupRequest {
    pub fn new(routing_number: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            routing_number: routing_number.into(),
            correlation_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub postal_code_extension: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchParticipant {
    pub routing_number: Option<String>,
    pub office_code: Option<String>,
    #[serde(rename = "servicingFRBNumber")]
    pub servicing_frb_number: Option<String>,
    pub record_type_code: Option<String>,
    pub revised: Option<String>,
    pub new_routing_number: Option<String>,
    pub customer_name: Option<String>,
    pub ach_location: Option<AchLocation>,
    pub telephone_number: Option<String>,
    pub status_code: Option<String>,
    pub view_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLocation {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParticipant {
    pub routing_number: Option<String>,
    pub telegraphic_name: Option<String>,
    pub customer_name: Option<String>,
    pub wire_location: Option<WireLocation>,
    pub funds_transfer_status: Option<String>,
    pub funds_settlement_only_status: Option<String>,
    pub book_entry_securities_transfer_status: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchSearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ach_participants: Vec<AchParticipant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wire_participants: Vec<WireParticipant>,
}

/// 服務端錯誤回應 `{"error": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    pub error: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A decoded search result set, tagged by network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPayload {
    Ach(Vec<AchParticipant>),
    Wire(Vec<WireParticipant>),
}

impl LookupPayload {
    pub fn len(&self) -> usize {
        match self {
            LookupPayload::Ach(rows) => rows.len(),
            LookupPayload::Wire(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_routing_number(&self, routing_number: &str) -> bool {
        match self {
            LookupPayload::Ach(rows) => rows
                .iter()
                .any(|p| p.routing_number.as_deref() == Some(routing_number)),
            LookupPayload::Wire(rows) => rows
                .iter()
                .any(|p| p.routing_number.as_deref() == Some(routing_number)),
        }
    }
}

#[derive(Debug)]
pub enum LookupOutcome {
    Success(LookupPayload),
    Failure(FedError),
}

#[derive(Debug)]
pub struct LookupResult {
    pub kind: LookupKind,
    pub routing_number: String,
    pub outcome: LookupOutcome,
}

impl LookupResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Success(_))
    }

    pub fn payload(&self) -> Option<&LookupPayload> {
        match &self.outcome {
            LookupOutcome::Success(payload) => Some(payload),
            LookupOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FedError> {
        match &self.outcome {
            LookupOutcome::Success(_) => None,
            LookupOutcome::Failure(e) => Some(e),
        }
    }
}

/// Both lookups of one run, always collected in ACH, Wire order.
#[derive(Debug)]
pub struct LookupReport {
    pub ach: LookupResult,
    pub wire: LookupResult,
}

impl LookupReport {
    pub fn all_succeeded(&self) -> bool {
        self.ach.is_success() && self.wire.is_success()
    }

    pub fn results(&self) -> [&LookupResult; 2] {
        [&self.ach, &self.wire]
    }
}
