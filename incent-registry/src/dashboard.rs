//! Dashboard request sequencing.
//!
//! Combines the contract and IPFS clients into the three owner-facing
//! flows: list services, add a service, read a service's feedback.

use ethers::types::{Address, H256};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

use incent_core::{Feedback, Service, ServiceMetadata};

use crate::contract::ServiceContract;
use crate::error::{RegistryError, Result};
use crate::ipfs::IpfsClient;

/// Upper bound on simultaneous per-service or per-feedback fetches.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Outcome of registering a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredService {
    pub metadata_cid: String,
    pub tx_hash: H256,
}

pub struct Dashboard<C> {
    contract: C,
    ipfs: IpfsClient,
}

impl<C: ServiceContract> Dashboard<C> {
    pub fn new(contract: C, ipfs: IpfsClient) -> Self {
        Self { contract, ipfs }
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn ipfs(&self) -> &IpfsClient {
        &self.ipfs
    }

    /// All services owned by `owner`, in on-chain id order.
    pub async fn list_services(&self, owner: Address) -> Result<Vec<Service>> {
        let ids = self.contract.service_ids_by_owner(owner).await?;
        info!("Owner {:?} has {} services", owner, ids.len());

        stream::iter(ids)
            .map(|id| self.load_service(id))
            .buffered(MAX_CONCURRENT_FETCHES)
            .try_collect()
            .await
    }

    /// Resolve one service: metadata hash → document → counters.
    pub async fn load_service(&self, service_id: u64) -> Result<Service> {
        let metadata_cid = self.contract.service_metadata(service_id).await?;
        let gateway_url = self.ipfs.gateway_url(&metadata_cid);
        let metadata: ServiceMetadata = self.ipfs.fetch_json(&metadata_cid).await?;
        let feedbacks = self.contract.total_feedbacks(service_id).await?;
        let interactions = self.contract.total_interactions(service_id).await?;

        Ok(Service::from_metadata(
            service_id,
            metadata_cid,
            gateway_url,
            metadata,
            interactions,
            feedbacks,
        ))
    }

    /// Upload metadata to IPFS, then register it on-chain.
    pub async fn add_service(&self, metadata: ServiceMetadata) -> Result<RegisteredService> {
        let metadata = metadata.normalized()?;
        let metadata_cid = self.ipfs.pin_json(&metadata).await?;
        info!("Pinned metadata for '{}' as {}", metadata.name, metadata_cid);

        let tx_hash = match self.contract.register_service(&metadata_cid).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Metadata {} pinned but registration failed", metadata_cid);
                return Err(e);
            }
        };

        Ok(RegisteredService { metadata_cid, tx_hash })
    }

    /// Every feedback document recorded for a service.
    pub async fn service_feedback(&self, service_id: u64) -> Result<Vec<Feedback>> {
        let hashes = self.contract.all_feedbacks(service_id).await?;

        stream::iter(hashes)
            .map(|cid| async move {
                let content = self.ipfs.fetch_json(&cid).await?;
                Ok::<_, RegistryError>(Feedback { cid, content })
            })
            .buffered(MAX_CONCURRENT_FETCHES)
            .try_collect()
            .await
    }
}
