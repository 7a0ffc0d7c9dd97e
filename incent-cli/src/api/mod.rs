//! HTTP API for the review dashboard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use ethers::types::Address;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use incent_agent::{review_prompt, AgentChunk, InitializedAgent};
use incent_core::{
    calculate_incentive, generate_payout, score_review, HelpfulnessScore, PayoutRequest, Review,
    ServiceMetadata,
};
use incent_registry::IpfsClient;

/// Shared state for the API server.
pub struct ApiState {
    pub ipfs: Option<IpfsClient>,
    pub agent: Option<InitializedAgent>,
    pub network_id: String,
    next_thread: AtomicU64,
}

impl ApiState {
    pub fn new(ipfs: Option<IpfsClient>, agent: Option<InitializedAgent>, network_id: String) -> Self {
        Self {
            ipfs,
            agent,
            network_id,
            next_thread: AtomicU64::new(1),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub review: Value,
}

#[derive(Debug, Deserialize)]
pub struct PayoutBody {
    pub score: f64,
    pub service_id: u64,
    pub reviewer: String,
    pub network_id: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn parse_review(value: &Value) -> Review {
    match value {
        Value::String(s) => Review::parse(s),
        other => Review::from_json(other),
    }
}

/// Score a review and report its incentive.
async fn review(Json(req): Json<ReviewRequest>) -> Response {
    let report = score_review(&parse_review(&req.review));
    let amount = calculate_incentive(report.score);
    Json(json!({
        "report": report,
        "incentive_wei": amount.wei().to_string(),
        "incentive_eth": amount.to_ether_string(),
    }))
    .into_response()
}

/// Build a payout record.
async fn payout(State(state): State<Arc<ApiState>>, Json(body): Json<PayoutBody>) -> Response {
    let reviewer: Address = match body.reviewer.trim().parse() {
        Ok(a) => a,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid reviewer address"),
    };

    let request = PayoutRequest {
        service_id: body.service_id,
        reviewer,
        score: HelpfulnessScore::from_f64(body.score),
        network_id: body.network_id.unwrap_or_else(|| state.network_id.clone()),
    };

    match generate_payout(&request, Utc::now()) {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Pin service metadata to IPFS and return its hash.
async fn service(State(state): State<Arc<ApiState>>, Json(metadata): Json<ServiceMetadata>) -> Response {
    let Some(ipfs) = state.ipfs.as_ref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "IPFS pinning is not configured");
    };

    let metadata = match metadata.normalized() {
        Ok(m) => m,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match ipfs.pin_json(&metadata).await {
        Ok(cid) => Json(json!({ "IpfsHash": cid, "url": ipfs.gateway_url(&cid) })).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

/// Run one agent turn over a review and return the transcript chunks.
async fn agent(State(state): State<Arc<ApiState>>, Json(req): Json<ReviewRequest>) -> Response {
    let Some(initialized) = state.agent.as_ref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Agent is not configured");
    };

    let review = match &req.review {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let thread_id = format!("api-{}", state.next_thread.fetch_add(1, Ordering::Relaxed));

    let mut chunks: Vec<AgentChunk> = Vec::new();
    let result = initialized
        .agent
        .stream_on(&thread_id, &review_prompt(&review), &mut chunks)
        .await;
    initialized.agent.memory().clear(&thread_id);

    match result {
        Ok(summary) => {
            let chunks: Vec<Value> = chunks
                .iter()
                .map(|chunk| match chunk {
                    AgentChunk::Agent(content) => json!({ "agent": content }),
                    AgentChunk::Tools { name, content } => json!({ "tools": content, "name": name }),
                })
                .collect();
            Json(json!({
                "chunks": chunks,
                "final": summary.final_response,
                "tool_calls": summary.tool_calls,
            }))
            .into_response()
        }
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/review", post(review))
        .route("/api/payout", post(payout))
        .route("/api/service", post(service))
        .route("/api/agent", post(agent))
        .with_state(state)
}

pub async fn start_server(port: u16, state: ApiState) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(state));

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    println!("🚀 Incent API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
