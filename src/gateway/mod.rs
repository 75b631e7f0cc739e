//! Contracts toward the surrounding infrastructure.
//!
//! Document retrieval, persistence of results and fallouts, outbound
//! delivery, and id-resolution services are external collaborators; the
//! engine only consumes them. They are modelled as synchronous traits —
//! the engine itself never blocks on I/O, and callers impose their own
//! timeouts around the network layer.
//!
//! The one concrete piece here is [`CounterpartMapping`]: the priority
//! cascade for resolving a ledger counterpart from a legal id is small,
//! table-driven logic that belongs with the engine.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::core::NormalizedBillingRecord;

/// Errors from collaborator implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// No counterpart mapping matched the legal id at any cascade tier.
    #[error("no counterpart mapping for legal id {legal_id:?}")]
    CounterpartNotFound { legal_id: String },

    /// Transport-level failure in a collaborator.
    #[error("transport error: {0}")]
    Transport(String),

    /// Persistence failure in a collaborator.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Retrieval of raw form-instance documents from the platform.
pub trait FormInstanceSource {
    /// Instance ids submitted for `family_id` within the date range.
    fn list_instances(
        &self,
        family_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<String>, GatewayError>;

    /// Raw document bytes for one instance.
    fn fetch_instance(&self, instance_id: &str) -> Result<Vec<u8>, GatewayError>;
}

/// Outbound delivery to the billing processor.
pub trait BillingRecordSender {
    /// Send one record; returns the created resource location.
    fn send(&self, record: &NormalizedBillingRecord) -> Result<String, GatewayError>;
}

/// Success-history persistence.
pub trait BillingHistory {
    fn save(&self, record: &NormalizedBillingRecord, location: &str) -> Result<(), GatewayError>;
}

/// Fallout persistence. One bad document must never abort a batch: the
/// caller records the failure here and continues with the next instance.
pub trait FalloutRepository {
    /// A document that failed decoding; tied to the raw bytes.
    fn save_decode_fallout(
        &self,
        raw: &[u8],
        family_id: &str,
        flow_instance_id: &str,
        message: &str,
    ) -> Result<(), GatewayError>;

    /// A document that decoded but failed validation or mapping.
    fn save_mapping_fallout(
        &self,
        raw: &[u8],
        family_id: &str,
        flow_instance_id: &str,
        message: &str,
    ) -> Result<(), GatewayError>;
}

/// Post-mapping decoration: resolve the recipient's party id in the
/// master data service.
pub trait PartyIdResolver {
    fn resolve(
        &self,
        municipality_id: &str,
        legal_id: &str,
    ) -> Result<Option<String>, GatewayError>;
}

/// Stakeholder classification used by the counterpart fallback tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeholderType {
    Organization,
    PrivatePerson,
}

/// Resolution of a ledger counterpart code from a legal id.
pub trait CounterpartResolver {
    fn resolve(
        &self,
        legal_id: &str,
        stakeholder: StakeholderType,
    ) -> Result<String, GatewayError>;
}

/// Table-driven counterpart resolution.
///
/// Cascade: exact legal-id match, then the first matching regex pattern
/// in insertion order, then the stakeholder-type fallback, then
/// [`GatewayError::CounterpartNotFound`].
#[derive(Debug, Default)]
pub struct CounterpartMapping {
    exact: HashMap<String, String>,
    patterns: Vec<(Regex, String)>,
    fallback: HashMap<StakeholderType, String>,
}

impl CounterpartMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exact(mut self, legal_id: impl Into<String>, counterpart: impl Into<String>) -> Self {
        self.exact.insert(legal_id.into(), counterpart.into());
        self
    }

    pub fn with_pattern(mut self, pattern: Regex, counterpart: impl Into<String>) -> Self {
        self.patterns.push((pattern, counterpart.into()));
        self
    }

    pub fn with_fallback(
        mut self,
        stakeholder: StakeholderType,
        counterpart: impl Into<String>,
    ) -> Self {
        self.fallback.insert(stakeholder, counterpart.into());
        self
    }
}

impl CounterpartResolver for CounterpartMapping {
    fn resolve(
        &self,
        legal_id: &str,
        stakeholder: StakeholderType,
    ) -> Result<String, GatewayError> {
        if let Some(counterpart) = self.exact.get(legal_id) {
            return Ok(counterpart.clone());
        }
        for (pattern, counterpart) in &self.patterns {
            if pattern.is_match(legal_id) {
                return Ok(counterpart.clone());
            }
        }
        if let Some(counterpart) = self.fallback.get(&stakeholder) {
            return Ok(counterpart.clone());
        }
        Err(GatewayError::CounterpartNotFound {
            legal_id: legal_id.to_string(),
        })
    }
}
