//! # Incent Registry
//!
//! **External collaborators of the review incentive dashboard**
//!
//! This crate talks to the two systems of record behind the dashboard:
//! the service registry contract (via ethers) and IPFS (pinning API +
//! gateway, via reqwest). [`Dashboard`] sequences them into the
//! owner-facing flows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use incent_registry::{Dashboard, EthServiceRegistry, IpfsClient, DEFAULT_GATEWAY, DEFAULT_PINNING_API};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let contract = EthServiceRegistry::new(
//!         "https://sepolia.base.org",
//!         "0x0000000000000000000000000000000000000001".parse()?,
//!     )?;
//!     let ipfs = IpfsClient::new(DEFAULT_PINNING_API, DEFAULT_GATEWAY, None)?;
//!     let dashboard = Dashboard::new(contract, ipfs);
//!
//!     let owner = "0x1234567890123456789012345678901234567890".parse()?;
//!     for service in dashboard.list_services(owner).await? {
//!         println!("{} ({} feedbacks)", service.name, service.feedbacks);
//!     }
//!     Ok(())
//! }
//! ```

pub mod contract;
pub mod dashboard;
pub mod error;
pub mod ipfs;

// Re-export main types
pub use contract::{EthServiceRegistry, ServiceContract, SERVICE_REGISTRY_ABI};
pub use dashboard::{Dashboard, RegisteredService, MAX_CONCURRENT_FETCHES};
pub use error::{RegistryError, Result};
pub use ipfs::{normalize_cid, IpfsClient, DEFAULT_GATEWAY, DEFAULT_PINNING_API};
