//! Service registry contract client.
//!
//! Wraps an ethers `Contract` built from a human-readable ABI. Reads go
//! through a plain provider; writes need a local signing key.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{parse_abi, Abi};
use ethers::contract::Contract;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, U256};
use tracing::{debug, info};

use crate::error::{RegistryError, Result};

/// Functions of the service registry the dashboard relies on.
pub const SERVICE_REGISTRY_ABI: &[&str] = &[
    "function registerService(string ipfsHash)",
    "function getServiceIdsByOwner(address owner) view returns (uint256[])",
    "function getServiceMetadata(uint256 serviceId) view returns (string)",
    "function getTotalFeedbacks(uint256 serviceId) view returns (uint256)",
    "function getTotalInteractions(uint256 serviceId) view returns (uint256)",
    "function getAllFeedbacks(uint256 serviceId) view returns (string[])",
];

/// The on-chain system of record for services and feedback.
#[async_trait]
pub trait ServiceContract: Send + Sync {
    /// Ids of services registered by `owner`.
    async fn service_ids_by_owner(&self, owner: Address) -> Result<Vec<u64>>;

    /// Content hash of the service's metadata document.
    async fn service_metadata(&self, service_id: u64) -> Result<String>;

    async fn total_feedbacks(&self, service_id: u64) -> Result<u64>;

    async fn total_interactions(&self, service_id: u64) -> Result<u64>;

    /// Content hashes of every feedback document for a service.
    async fn all_feedbacks(&self, service_id: u64) -> Result<Vec<String>>;

    /// Register a service by metadata hash; returns the mined transaction hash.
    async fn register_service(&self, metadata_cid: &str) -> Result<H256>;
}

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// [`ServiceContract`] backed by a JSON-RPC endpoint.
pub struct EthServiceRegistry {
    address: Address,
    read: Contract<Provider<Http>>,
    write: Option<Contract<SignerClient>>,
}

impl EthServiceRegistry {
    /// Create a read-only client.
    pub fn new(rpc_url: &str, address: Address) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| RegistryError::Contract(format!("Invalid RPC URL: {}", e)))?;
        let read = Contract::new(address, registry_abi()?, Arc::new(provider));

        Ok(Self { address, read, write: None })
    }

    /// Enable writes with a hex private key.
    pub fn with_signer(mut self, rpc_url: &str, private_key: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| RegistryError::Contract(format!("Invalid RPC URL: {}", e)))?;
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| RegistryError::InvalidAddress(format!("Invalid private key: {}", e)))?
            .with_chain_id(chain_id);

        info!("Registry writes signed by {:?}", wallet.address());
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        self.write = Some(Contract::new(self.address, registry_abi()?, client));
        Ok(self)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Address of the configured signer, if any.
    pub fn signer_address(&self) -> Option<Address> {
        self.write.as_ref().map(|c| c.client().address())
    }

    async fn call_u256(&self, function: &str, service_id: u64) -> Result<U256> {
        debug!("{}({})", function, service_id);
        self.read
            .method::<_, U256>(function, U256::from(service_id))
            .map_err(|e| RegistryError::Contract(format!("{}: {}", function, e)))?
            .call()
            .await
            .map_err(|e| RegistryError::Contract(format!("{}: {}", function, e)))
    }
}

#[async_trait]
impl ServiceContract for EthServiceRegistry {
    async fn service_ids_by_owner(&self, owner: Address) -> Result<Vec<u64>> {
        let ids: Vec<U256> = self
            .read
            .method::<_, Vec<U256>>("getServiceIdsByOwner", owner)
            .map_err(|e| RegistryError::Contract(format!("getServiceIdsByOwner: {}", e)))?
            .call()
            .await
            .map_err(|e| RegistryError::Contract(format!("getServiceIdsByOwner: {}", e)))?;

        ids.into_iter().map(to_u64).collect()
    }

    async fn service_metadata(&self, service_id: u64) -> Result<String> {
        self.read
            .method::<_, String>("getServiceMetadata", U256::from(service_id))
            .map_err(|e| RegistryError::Contract(format!("getServiceMetadata: {}", e)))?
            .call()
            .await
            .map_err(|e| RegistryError::Contract(format!("getServiceMetadata: {}", e)))
    }

    async fn total_feedbacks(&self, service_id: u64) -> Result<u64> {
        to_u64(self.call_u256("getTotalFeedbacks", service_id).await?)
    }

    async fn total_interactions(&self, service_id: u64) -> Result<u64> {
        to_u64(self.call_u256("getTotalInteractions", service_id).await?)
    }

    async fn all_feedbacks(&self, service_id: u64) -> Result<Vec<String>> {
        self.read
            .method::<_, Vec<String>>("getAllFeedbacks", U256::from(service_id))
            .map_err(|e| RegistryError::Contract(format!("getAllFeedbacks: {}", e)))?
            .call()
            .await
            .map_err(|e| RegistryError::Contract(format!("getAllFeedbacks: {}", e)))
    }

    async fn register_service(&self, metadata_cid: &str) -> Result<H256> {
        let contract = self.write.as_ref().ok_or(RegistryError::MissingSigner)?;

        let call = contract
            .method::<_, ()>("registerService", metadata_cid.to_string())
            .map_err(|e| RegistryError::Contract(format!("registerService: {}", e)))?;
        let pending = call
            .send()
            .await
            .map_err(|e| RegistryError::Contract(format!("registerService: {}", e)))?;
        let tx_hash = pending.tx_hash();
        info!("registerService submitted: {:?}", tx_hash);

        let receipt = pending
            .await
            .map_err(|e| RegistryError::Contract(format!("registerService receipt: {}", e)))?
            .ok_or_else(|| {
                RegistryError::Contract(format!("transaction {:?} was dropped", tx_hash))
            })?;

        if receipt.status.map(|s| s.as_u64()) == Some(0) {
            return Err(RegistryError::Contract(format!("transaction {:?} reverted", tx_hash)));
        }
        Ok(receipt.transaction_hash)
    }
}

/// Parse the registry ABI.
pub fn registry_abi() -> Result<Abi> {
    parse_abi(SERVICE_REGISTRY_ABI)
        .map_err(|e| RegistryError::Contract(format!("Failed to parse registry ABI: {}", e)))
}

fn to_u64(value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return Err(RegistryError::InvalidResponse(format!("{} does not fit in u64", value)));
    }
    Ok(value.as_u64())
}
