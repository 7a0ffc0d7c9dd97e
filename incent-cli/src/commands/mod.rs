//! CLI command implementations.

pub mod agent;
pub mod evaluate;
pub mod incentive;
pub mod networks;
pub mod payout;
pub mod score;
#[cfg(feature = "api")]
pub mod serve;
pub mod services;
