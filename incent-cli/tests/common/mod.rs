use assert_cmd::Command;
use tempfile::TempDir;

/// Variables the CLI reads that must not leak in from the developer's shell.
const SCRUBBED_VARS: &[&str] = &[
    "XAI_API_KEY",
    "CDP_API_KEY_NAME",
    "CDP_API_KEY_PRIVATE_KEY",
    "NETWORK_ID",
    "XAI_BASE_URL",
    "XAI_MODEL",
    "WALLET_DATA_FILE",
    "AUTONOMOUS_INTERVAL_SECS",
    "SERVICE_REGISTRY_ADDRESS",
    "REGISTRY_PRIVATE_KEY",
    "RPC_URL",
    "PINATA_JWT",
    "PINATA_GATEWAY",
    "RUST_LOG",
    "INCENT_LOG_JSON",
];

pub struct TestEnv {
    pub work_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// The `incent` binary running inside an empty working directory.
    pub fn incent(&self) -> Command {
        let mut cmd = Command::cargo_bin("incent").unwrap();
        cmd.current_dir(self.work_dir.path());
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Same as [`TestEnv::incent`] with the agent's required variables set.
    pub fn incent_with_agent_env(&self, llm_base_url: &str) -> Command {
        let mut cmd = self.incent();
        cmd.env("XAI_API_KEY", "xai-test-key")
            .env("CDP_API_KEY_NAME", "organizations/test/apiKeys/test")
            .env("CDP_API_KEY_PRIVATE_KEY", "test-private-key")
            .env("XAI_BASE_URL", llm_base_url);
        cmd
    }
}
