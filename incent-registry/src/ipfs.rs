//! IPFS pinning and gateway client.
//!
//! Service metadata is pinned through the Pinata JSON endpoint and read
//! back through an HTTP gateway. Content is addressed by CID; `ipfs://`
//! URIs and `/ipfs/` paths are normalized to a bare CID first.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use incent_core::ServiceMetadata;

use crate::error::{RegistryError, Result};

/// Default pinning API root.
pub const DEFAULT_PINNING_API: &str = "https://api.pinata.cloud";

/// Default public gateway.
pub const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Client for pinning JSON documents and resolving CIDs.
#[derive(Clone)]
pub struct IpfsClient {
    http: Client,
    pinning_api: String,
    gateway: String,
    jwt: Option<String>,
}

impl IpfsClient {
    /// Create a client. `gateway` may be a bare host (`example.mypinata.cloud`).
    pub fn new(pinning_api: &str, gateway: &str, jwt: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::Ipfs(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            pinning_api: pinning_api.trim_end_matches('/').to_string(),
            gateway: with_scheme(gateway.trim_end_matches('/')),
            jwt: jwt.filter(|j| !j.trim().is_empty()),
        })
    }

    /// Resolve a CID (or `ipfs://` URI, or gateway URL) to a fetchable URL.
    pub fn gateway_url(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        format!("{}/ipfs/{}", self.gateway, normalize_cid(reference))
    }

    /// Pin service metadata and return its CID.
    pub async fn pin_json(&self, metadata: &ServiceMetadata) -> Result<String> {
        let jwt = self
            .jwt
            .as_deref()
            .ok_or_else(|| RegistryError::Ipfs("No pinning API token configured".to_string()))?;

        let body = json!({
            "pinataContent": metadata,
            "pinataMetadata": { "name": metadata.name },
        });

        let url = format!("{}/pinning/pinJSONToIPFS", self.pinning_api);
        debug!("Pinning metadata for '{}' via {}", metadata.name, url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(jwt)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Ipfs(format!("Pin request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RegistryError::Ipfs(format!("Pinning API returned {}: {}", status, text)));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(format!("Pin response: {}", e)))?;
        Ok(pinned.ipfs_hash)
    }

    /// Fetch and decode a JSON document.
    pub async fn fetch_json<T: DeserializeOwned>(&self, reference: &str) -> Result<T> {
        let url = self.gateway_url(reference);
        debug!("Fetching {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Ipfs(format!("Gateway request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Ipfs(format!("Gateway returned {} for {}", status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

/// Strip `ipfs://` and `/ipfs/` prefixes.
pub fn normalize_cid(reference: &str) -> &str {
    let reference = reference.trim();
    let reference = reference.strip_prefix("ipfs://").unwrap_or(reference);
    let reference = reference.strip_prefix("/ipfs/").unwrap_or(reference);
    reference.strip_prefix("ipfs/").unwrap_or(reference)
}

fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
