//! Agent wallet persistence.
//!
//! The agent signs with a single local key. Its data is kept as JSON in a
//! plain file so the same wallet survives restarts; the file is rewritten
//! after every successful bootstrap. It holds the private key, so on unix it
//! is only readable by its owner.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AgentError, Result};

/// Exported wallet state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletData {
    pub wallet_id: String,
    pub network_id: String,
    /// Hex-encoded 32-byte private key.
    pub seed: String,
    pub default_address: Address,
}

impl WalletData {
    /// Create a fresh wallet for `network_id`.
    pub fn generate(network_id: &str) -> Result<Self> {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);

        let signer = LocalWallet::from_bytes(&seed)
            .map_err(|e| AgentError::Wallet(format!("Failed to derive key: {}", e)))?;

        Ok(Self {
            wallet_id: Uuid::new_v4().to_string(),
            network_id: network_id.to_string(),
            seed: hex::encode(seed),
            default_address: signer.address(),
        })
    }

    /// The signing key described by `seed`.
    pub fn signer(&self) -> Result<LocalWallet> {
        let bytes = hex::decode(self.seed.trim_start_matches("0x"))
            .map_err(|e| AgentError::Wallet(format!("Seed is not hex: {}", e)))?;
        LocalWallet::from_bytes(&bytes)
            .map_err(|e| AgentError::Wallet(format!("Seed is not a valid key: {}", e)))
    }

    /// Check that the data describes a usable wallet on `network_id`.
    pub fn validate(&self, network_id: &str) -> Result<()> {
        if self.wallet_id.trim().is_empty() {
            return Err(AgentError::Wallet("wallet_id is empty".to_string()));
        }
        if self.network_id != network_id {
            return Err(AgentError::Wallet(format!(
                "wallet belongs to {}, expected {}",
                self.network_id, network_id
            )));
        }
        let derived = self.signer()?.address();
        if derived != self.default_address {
            return Err(AgentError::Wallet(format!(
                "default_address {:?} does not match seed ({:?})",
                self.default_address, derived
            )));
        }
        Ok(())
    }
}

/// Where the bootstrap wallet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOrigin {
    Loaded,
    Created,
}

/// File-backed wallet storage.
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read stored wallet data. Missing or unreadable files yield `None`.
    pub fn load(&self) -> Option<WalletData> {
        if !self.path.exists() {
            debug!("No wallet file at {}", self.path.display());
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Error reading wallet data from {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Wallet file {} is not valid wallet data: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Reuse the stored wallet when it is valid for `network_id`, otherwise create one.
    pub fn load_or_provision(&self, network_id: &str) -> Result<(WalletData, WalletOrigin)> {
        if let Some(data) = self.load() {
            match data.validate(network_id) {
                Ok(()) => return Ok((data, WalletOrigin::Loaded)),
                Err(e) => warn!("Ignoring stored wallet: {}", e),
            }
        }
        Ok((WalletData::generate(network_id)?, WalletOrigin::Created))
    }

    /// Overwrite the file with `data`, mode 0600 on unix.
    pub fn persist(&self, data: &WalletData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(data)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation; tighten files left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;
        debug!("Wallet data written to {}", self.path.display());
        Ok(())
    }
}
