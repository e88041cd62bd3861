use std::time::Duration;

use clap::Parser;
use kale_rok_client::{RokClientConfig, SecretEnvError};

/// Kale daemon - Rok snapshot RPCs for notebook pods
#[derive(Parser, Debug)]
#[command(name = "kale-daemon")]
pub struct Args {
    /// Bind address
    #[arg(long, env = "KALE_DAEMON_LISTEN", default_value = "127.0.0.1:4733")]
    pub listen: String,

    /// Auth token (or set KALE_DAEMON_TOKEN env var)
    #[arg(long, env = "KALE_DAEMON_TOKEN")]
    pub token: Option<String>,

    /// Disable auth (dev only)
    #[arg(long)]
    pub insecure_no_auth: bool,

    /// Rok gateway base URL
    #[arg(long, env = "ROK_GW_URL")]
    pub rok_gw_url: Option<String>,

    /// Per-request timeout for Rok gateway calls, in seconds
    #[arg(long, default_value_t = 30)]
    pub rok_timeout_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    pub fn require_auth(&self) -> bool {
        !self.insecure_no_auth
    }

    /// Rok client settings. The gateway token is read from `ROK_GW_TOKEN`
    /// or the file named by `ROK_GW_TOKEN_FILE`.
    pub fn rok_client_config(&self) -> Result<RokClientConfig, SecretEnvError> {
        let mut config =
            RokClientConfig::from_env()?.with_timeout(Duration::from_secs(self.rok_timeout_secs));
        if let Some(url) = self.rok_gw_url.as_deref().filter(|u| !u.is_empty()) {
            config = config.with_url(url);
        }
        Ok(config)
    }
}
