//! Error types for the registry clients.
//!
//! Every variant maps to one failed external call. Callers report the
//! message and abandon the operation; nothing here is retried.

use thiserror::Error;

/// Errors that can occur while talking to the contract or IPFS.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Contract call or transaction failure.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Pinning API or gateway failure.
    #[error("IPFS error: {0}")]
    Ipfs(String),

    /// Malformed address or key.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A collaborator answered with something we could not use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A write was attempted without a signing key.
    #[error("No signer configured; set a private key to send transactions")]
    MissingSigner,

    /// Error from incent-core.
    #[error("Core error: {0}")]
    Core(#[from] incent_core::IncentError),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
