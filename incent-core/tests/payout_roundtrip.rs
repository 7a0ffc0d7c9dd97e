//! Payout records must survive serialization and stay verifiable.

use chrono::{TimeZone, Utc};
use ethers_core::types::Address;
use incent_core::{
    generate_payout, generate_payout_json, score_text, HelpfulnessScore, PayoutRecord,
    PayoutRequest,
};

fn reviewer() -> Address {
    "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".parse().unwrap()
}

fn request(score: HelpfulnessScore) -> PayoutRequest {
    PayoutRequest {
        service_id: 3,
        reviewer: reviewer(),
        score,
        network_id: "base-sepolia".to_string(),
    }
}

#[test]
fn test_json_round_trip() {
    let issued_at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let record = generate_payout(&request(HelpfulnessScore::from_raw(64)), issued_at).unwrap();

    let json = record.to_json().unwrap();
    let back = PayoutRecord::from_json(&json).unwrap();
    assert_eq!(record, back);
}

#[test]
fn test_json_contains_audit_fields() {
    let issued_at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let json = generate_payout_json(&request(HelpfulnessScore::from_raw(10)), issued_at).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["service_id"], 3);
    assert_eq!(value["reviewer"], "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    assert_eq!(value["helpfulness_score"], 10);
    assert_eq!(value["amount"]["eth"], "0.00001");
    assert_eq!(value["issued_at"], "2025-01-15T09:00:00Z");
    assert!(value["payout_id"].as_str().unwrap().starts_with("0x"));
}

#[test]
fn test_tampered_json_rejected() {
    let issued_at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let json = generate_payout_json(&request(HelpfulnessScore::from_raw(50)), issued_at).unwrap();
    let tampered = json.replace("\"service_id\": 3", "\"service_id\": 4");
    assert_ne!(json, tampered);
    assert!(PayoutRecord::from_json(&tampered).is_err());
}

#[test]
fn test_score_to_payout_pipeline() {
    let report = score_text(
        "Delivery arrived 3 days late and the packaging was damaged. \
         You should offer tracking updates by email.",
    );
    let issued_at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let record = generate_payout(&request(report.score), issued_at).unwrap();
    assert_eq!(record.helpfulness_score, report.score);
    assert!(record.validate().is_ok());
}
