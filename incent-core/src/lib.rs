//! # Incent Core
//!
//! **Review helpfulness scoring and reviewer incentives**
//!
//! This crate holds the pure domain of the review incentive system: it
//! scores how helpful a review is, turns that score into an exact payout
//! amount, and produces auditable payout records.
//!
//! ## Features
//!
//! - **Deterministic**: same review → same score → same amount
//! - **Total**: scoring never fails; empty input gets the minimum score
//! - **Exact**: amounts are integer wei, never floating point
//! - **Minimal**: no network I/O, no async
//!
//! ## Quick Start
//!
//! ```rust
//! use incent_core::{calculate_incentive, score_text};
//!
//! let report = score_text("Checkout took 40 seconds, you should add a guest option.");
//! let amount = calculate_incentive(report.score);
//! assert!(amount >= incent_core::IncentiveAmount::min());
//! println!("score {} pays {}", report.score, amount);
//! ```

pub mod error;
pub mod helpfulness;
pub mod incentive;
pub mod payout;
pub mod review;
pub mod service;

// Re-export main types for convenience
pub use error::{IncentError, Result};
pub use helpfulness::{
    score_review, score_text, DimensionScores, HelpfulnessReport, HelpfulnessScore,
    MAX_HELPFULNESS_SCORE, MIN_HELPFULNESS_SCORE,
};
pub use incentive::{
    calculate_incentive, calculate_incentive_for, format_units, parse_amount, IncentiveAmount,
    MAX_INCENTIVE_WEI, MIN_INCENTIVE_WEI,
};
pub use payout::{generate_payout, generate_payout_json, PayoutRecord, PayoutRequest};
pub use review::{Review, ReviewAnswer};
pub use service::{Feedback, Service, ServiceMetadata};
