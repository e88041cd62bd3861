use kale_rpc_rok::RokRpc;
use tokio::sync::Mutex;

/// Unique client identifier
pub type ClientId = u64;

/// Daemon-wide shared state
pub struct DaemonState {
    /// Token for authentication (None if auth disabled)
    pub token: Option<String>,

    /// Rok handlers, sharing one lazily built gateway client
    pub rok: RokRpc,

    /// Next client ID counter
    next_client_id: Mutex<ClientId>,
}

impl DaemonState {
    pub fn new(token: Option<String>, rok: RokRpc) -> Self {
        Self {
            token,
            rok,
            next_client_id: Mutex::new(1),
        }
    }

    /// Allocate an id for a new connection
    pub async fn register_client(&self) -> ClientId {
        let mut id = self.next_client_id.lock().await;
        let client_id = *id;
        *id += 1;
        client_id
    }
}
