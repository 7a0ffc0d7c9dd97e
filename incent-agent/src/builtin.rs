//! Built-in review tools.

use async_trait::async_trait;
use chrono::Utc;
use ethers::types::Address;
use serde_json::{json, Value};

use incent_core::{
    calculate_incentive, generate_payout, score_review, HelpfulnessScore, PayoutRequest, Review,
};

use crate::tools::{Tool, ToolError, ToolRegistry, ToolSpec};
use crate::wallet::WalletData;

pub const HELPFULNESS_PROMPT: &str = "This tool evaluates how helpful a review is to a company by analyzing its descriptiveness, sentiment, actionability, uniqueness, specificity, and length adequacy.";

pub const CALCULATE_INCENTIVE_PROMPT: &str = "This tool calculates the incentive to pay to a reviewer based on their review score. The score ranges between 1 and 100, and the incentive is a value between 10^-6 and 10^-4.";

pub const GENERATE_PAYOUT_PROMPT: &str = "This tool produces the payout record for a reviewer as JSON. It takes the review score (1 to 100), the service id and the reviewer's address, computes the incentive and returns a record with a payout id that anyone can recompute.";

pub const WALLET_DETAILS_PROMPT: &str = "This tool returns the agent's wallet id, network id and default address.";

/// Register every built-in tool.
pub fn register_builtin_tools(registry: &mut ToolRegistry, wallet: &WalletData) -> Result<(), ToolError> {
    registry.register(CheckReviewHelpfulness)?;
    registry.register(CalculateIncentive)?;
    registry.register(GeneratePayoutJson {
        network_id: wallet.network_id.clone(),
    })?;
    registry.register(GetWalletDetails {
        wallet: wallet.clone(),
    })?;
    Ok(())
}

/// Scores the review in `args.review`. Missing or unusable input scores as
/// an empty review.
pub struct CheckReviewHelpfulness;

#[async_trait]
impl Tool for CheckReviewHelpfulness {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "check_review_helpfulness".to_string(),
            description: HELPFULNESS_PROMPT.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "review": {
                        "description": "The review text, or an object mapping feedback questions to answers"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: &Value) -> Result<String, ToolError> {
        let review = match &args["review"] {
            Value::String(s) => Review::parse(s),
            other => Review::from_json(other),
        };
        let report = score_review(&review);
        serde_json::to_string(&report).map_err(|e| ToolError::execution("check_review_helpfulness", e))
    }
}

/// Converts a score into an incentive amount.
pub struct CalculateIncentive;

#[async_trait]
impl Tool for CalculateIncentive {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "calculate_incentive".to_string(),
            description: CALCULATE_INCENTIVE_PROMPT.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "score": score_schema()
                }
            }),
        }
    }

    async fn call(&self, args: &Value) -> Result<String, ToolError> {
        let score = coerce_score(&args["score"]);
        let amount = calculate_incentive(score);
        Ok(json!({
            "score": score,
            "incentive_wei": amount.wei().to_string(),
            "incentive_eth": amount.to_ether_string(),
        })
        .to_string())
    }
}

/// Produces a payout record for one reviewer.
pub struct GeneratePayoutJson {
    network_id: String,
}

#[async_trait]
impl Tool for GeneratePayoutJson {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "generate_payout_json".to_string(),
            description: GENERATE_PAYOUT_PROMPT.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "score": score_schema(),
                    "service_id": { "type": "integer", "minimum": 0 },
                    "reviewer": {
                        "description": "Reviewer address, 0x-prefixed",
                        "type": "string"
                    },
                    "network_id": { "type": "string" }
                },
                "required": ["score", "service_id", "reviewer"]
            }),
        }
    }

    async fn call(&self, args: &Value) -> Result<String, ToolError> {
        const NAME: &str = "generate_payout_json";

        let reviewer: Address = args["reviewer"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .parse()
            .map_err(|e| ToolError::execution(NAME, format!("invalid reviewer address: {}", e)))?;
        let service_id = args["service_id"]
            .as_u64()
            .ok_or_else(|| ToolError::execution(NAME, "service_id must be a non-negative integer"))?;
        let network_id = args["network_id"]
            .as_str()
            .unwrap_or(&self.network_id)
            .to_string();

        let request = PayoutRequest {
            service_id,
            reviewer,
            score: coerce_score(&args["score"]),
            network_id,
        };

        generate_payout(&request, Utc::now())
            .and_then(|record| record.to_json())
            .map_err(|e| ToolError::execution(NAME, e))
    }
}

/// Reports the agent's own wallet, without the seed.
pub struct GetWalletDetails {
    wallet: WalletData,
}

#[async_trait]
impl Tool for GetWalletDetails {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_wallet_details".to_string(),
            description: WALLET_DETAILS_PROMPT.to_string(),
            parameters: json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _args: &Value) -> Result<String, ToolError> {
        Ok(json!({
            "wallet_id": self.wallet.wallet_id,
            "network_id": self.wallet.network_id,
            "default_address": self.wallet.default_address,
        })
        .to_string())
    }
}

fn score_schema() -> Value {
    json!({ "description": "Helpfulness score between 1 and 100" })
}

/// Models sometimes quote numbers. Unparseable input gets the minimum score.
fn coerce_score(value: &Value) -> HelpfulnessScore {
    match value {
        Value::Number(n) => n.as_f64().map(HelpfulnessScore::from_f64).unwrap_or(HelpfulnessScore::MIN),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(HelpfulnessScore::from_f64)
            .unwrap_or(HelpfulnessScore::MIN),
        _ => HelpfulnessScore::MIN,
    }
}
