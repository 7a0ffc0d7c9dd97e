//! Payout record generation.
//!
//! A [`PayoutRecord`] binds a service, a reviewer and the incentive computed
//! from the reviewer's helpfulness score. Its `payout_id` is a keccak256
//! digest over the canonical fields so any party holding the JSON can
//! recompute and check it. Generating a record has no side effects; storing
//! or submitting it is the caller's job.

use chrono::{DateTime, SecondsFormat, Utc};
use ethers_core::types::Address;
use ethers_core::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::error::{IncentError, Result};
use crate::helpfulness::HelpfulnessScore;
use crate::incentive::{calculate_incentive, IncentiveAmount};

/// Domain separator mixed into every payout digest.
const PAYOUT_DOMAIN: &str = "incent-payout-v1";

/// Inputs needed to produce a payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub service_id: u64,
    pub reviewer: Address,
    pub score: HelpfulnessScore,
    pub network_id: String,
}

/// An auditable payout record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub payout_id: String,
    pub service_id: u64,
    pub reviewer: Address,
    pub helpfulness_score: HelpfulnessScore,
    pub amount: IncentiveAmount,
    pub network_id: String,
    pub issued_at: DateTime<Utc>,
}

impl PayoutRecord {
    /// Recompute the digest from the record's fields.
    pub fn compute_digest(&self) -> String {
        payout_digest(
            self.service_id,
            &self.reviewer,
            self.helpfulness_score,
            &self.amount,
            &self.network_id,
            &self.issued_at,
        )
    }

    /// True when `payout_id` matches the record's contents.
    pub fn verify_digest(&self) -> bool {
        self.payout_id.eq_ignore_ascii_case(&self.compute_digest())
    }

    /// Full validation: field constraints plus digest integrity.
    pub fn validate(&self) -> Result<()> {
        validate_parties(&self.reviewer, &self.network_id)?;
        if self.amount != calculate_incentive(self.helpfulness_score) {
            return Err(IncentError::InvalidPayout(format!(
                "amount {} does not match score {}",
                self.amount, self.helpfulness_score
            )));
        }
        if !self.verify_digest() {
            return Err(IncentError::InvalidPayout("payout_id digest mismatch".to_string()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a record.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }
}

/// Build a payout record.
///
/// `issued_at` is passed in so the same request always yields the same record.
pub fn generate_payout(request: &PayoutRequest, issued_at: DateTime<Utc>) -> Result<PayoutRecord> {
    let network_id = request.network_id.trim().to_string();
    validate_parties(&request.reviewer, &network_id)?;

    // Whole seconds keep the RFC 3339 form and the digest stable across round trips.
    let issued_at = DateTime::<Utc>::from_timestamp(issued_at.timestamp(), 0).unwrap_or(issued_at);
    let amount = calculate_incentive(request.score);

    let payout_id = payout_digest(
        request.service_id,
        &request.reviewer,
        request.score,
        &amount,
        &network_id,
        &issued_at,
    );

    Ok(PayoutRecord {
        payout_id,
        service_id: request.service_id,
        reviewer: request.reviewer,
        helpfulness_score: request.score,
        amount,
        network_id,
        issued_at,
    })
}

/// Build a payout record and serialize it as pretty JSON.
pub fn generate_payout_json(request: &PayoutRequest, issued_at: DateTime<Utc>) -> Result<String> {
    generate_payout(request, issued_at)?.to_json()
}

fn validate_parties(reviewer: &Address, network_id: &str) -> Result<()> {
    if reviewer.is_zero() {
        return Err(IncentError::InvalidPayout(
            "reviewer must not be the zero address".to_string(),
        ));
    }
    if network_id.trim().is_empty() {
        return Err(IncentError::InvalidPayout("network_id must not be empty".to_string()));
    }
    Ok(())
}

fn payout_digest(
    service_id: u64,
    reviewer: &Address,
    score: HelpfulnessScore,
    amount: &IncentiveAmount,
    network_id: &str,
    issued_at: &DateTime<Utc>,
) -> String {
    let canonical = format!(
        "{}|{}|{:?}|{}|{}|{}|{}",
        PAYOUT_DOMAIN,
        service_id,
        reviewer,
        score,
        amount.wei(),
        network_id,
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    format!("0x{}", hex::encode(keccak256(canonical.as_bytes())))
}
