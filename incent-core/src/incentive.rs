//! Reviewer incentive calculation.
//!
//! Incentives are exact wei amounts. A helpfulness score in `1..=100` maps
//! linearly onto `[10^-6, 10^-4]` ether; out-of-range scores are clamped
//! first, so the amount can never leave those bounds.

use std::fmt;

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{IncentError, Result};
use crate::helpfulness::{HelpfulnessScore, MAX_HELPFULNESS_SCORE, MIN_HELPFULNESS_SCORE};

/// Decimals of the native token.
pub const ETHER_DECIMALS: usize = 18;

/// 10^-6 ether.
pub const MIN_INCENTIVE_WEI: u64 = 1_000_000_000_000;

/// 10^-4 ether.
pub const MAX_INCENTIVE_WEI: u64 = 100_000_000_000_000;

/// An incentive amount, always within `[MIN_INCENTIVE_WEI, MAX_INCENTIVE_WEI]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "AmountRepr")]
pub struct IncentiveAmount {
    wei: U256,
}

impl IncentiveAmount {
    pub fn min() -> Self {
        Self { wei: U256::from(MIN_INCENTIVE_WEI) }
    }

    pub fn max() -> Self {
        Self { wei: U256::from(MAX_INCENTIVE_WEI) }
    }

    /// Wrap a wei amount, rejecting anything outside the incentive bounds.
    pub fn from_wei(wei: U256) -> Result<Self> {
        let amount = Self { wei };
        if amount < Self::min() || amount > Self::max() {
            return Err(IncentError::InvalidAmount(format!(
                "{} wei is outside [{}, {}]",
                wei, MIN_INCENTIVE_WEI, MAX_INCENTIVE_WEI
            )));
        }
        Ok(amount)
    }

    pub fn wei(&self) -> U256 {
        self.wei
    }

    /// Exact decimal rendering in ether, without trailing zeros.
    pub fn to_ether_string(&self) -> String {
        format_units(self.wei, ETHER_DECIMALS)
    }
}

impl fmt::Display for IncentiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.to_ether_string())
    }
}

/// JSON form of an amount: both denominations, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AmountRepr {
    wei: String,
    eth: String,
}

impl From<IncentiveAmount> for AmountRepr {
    fn from(amount: IncentiveAmount) -> Self {
        Self {
            wei: amount.wei.to_string(),
            eth: amount.to_ether_string(),
        }
    }
}

impl TryFrom<AmountRepr> for IncentiveAmount {
    type Error = IncentError;

    fn try_from(repr: AmountRepr) -> Result<Self> {
        let wei = U256::from_dec_str(&repr.wei)
            .map_err(|e| IncentError::InvalidAmount(format!("Invalid wei value: {}", e)))?;
        let amount = Self::from_wei(wei)?;
        let eth = parse_amount(&format!("{} ether", repr.eth))?;
        if eth != wei {
            return Err(IncentError::InvalidAmount(format!(
                "eth value {} does not match wei value {}",
                repr.eth, repr.wei
            )));
        }
        Ok(amount)
    }
}

/// Compute the incentive for a helpfulness score.
///
/// `min + (score - 1) * (max - min) / 99`, which is exact for every score.
pub fn calculate_incentive(score: HelpfulnessScore) -> IncentiveAmount {
    let steps = U256::from(score.value() - MIN_HELPFULNESS_SCORE);
    let span = U256::from(MAX_INCENTIVE_WEI - MIN_INCENTIVE_WEI);
    let range = U256::from(MAX_HELPFULNESS_SCORE - MIN_HELPFULNESS_SCORE);

    IncentiveAmount {
        wei: U256::from(MIN_INCENTIVE_WEI) + steps * span / range,
    }
}

/// Compute the incentive for an unvalidated numeric score (clamped, NaN → minimum).
pub fn calculate_incentive_for(score: f64) -> IncentiveAmount {
    calculate_incentive(HelpfulnessScore::from_f64(score))
}

/// Parse an amount string into wei.
///
/// Accepts a raw integer (wei) or `"<decimal> <unit>"` with unit `ether`,
/// `gwei` or `wei`. Extra decimals beyond the unit's precision are truncated.
pub fn parse_amount(input: &str) -> Result<U256> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (number, decimals) = match parts.as_slice() {
        [] => return Err(IncentError::InvalidAmount("Empty amount".to_string())),
        [raw] => (*raw, 0usize),
        [value, unit] => {
            let decimals = match unit.to_lowercase().as_str() {
                "ether" | "eth" => ETHER_DECIMALS,
                "gwei" => 9,
                "wei" => 0,
                other => {
                    return Err(IncentError::InvalidAmount(format!("Unsupported unit: {}", other)))
                }
            };
            (*value, decimals)
        }
        _ => return Err(IncentError::InvalidAmount(format!("Malformed amount: {}", input))),
    };

    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, f),
        None => (number, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(IncentError::InvalidAmount(format!("Invalid number: {}", number)));
    }
    if decimals == 0 && !frac_part.is_empty() {
        return Err(IncentError::InvalidAmount(format!(
            "Fractional value not allowed for this unit: {}",
            number
        )));
    }

    let overflow = || IncentError::InvalidAmount(format!("Amount too large: {}", input));
    let scale = U256::exp10(decimals);

    let int_value = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part).map_err(|_| overflow())?
    };

    let mut frac_digits: String = frac_part.chars().take(decimals).collect();
    while frac_digits.len() < decimals {
        frac_digits.push('0');
    }
    let frac_value = if frac_digits.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&frac_digits).map_err(|_| overflow())?
    };

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

/// Render `value / 10^decimals` as an exact decimal string.
pub fn format_units(value: U256, decimals: usize) -> String {
    let scale = U256::exp10(decimals);
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part.is_zero() {
        return int_part.to_string();
    }
    let frac = format!("{:0>width$}", frac_part.to_string(), width = decimals);
    format!("{}.{}", int_part, frac.trim_end_matches('0'))
}
