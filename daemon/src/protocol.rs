use kale_rpc_rok::{RpcError, Volume, DEFAULT_BUCKET};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request from client
#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// Correlation id. A fresh one is generated when absent.
    #[serde(default)]
    pub trans_id: Option<String>,
}

/// JSON-RPC success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub id: u64,
    pub result: Value,
}

/// JSON-RPC error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub id: u64,
    pub error: ErrorBody,
}

/// Either response, as returned by the handlers
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<String>,
}

// Error codes
pub const AUTH_REQUIRED: &str = "auth_required";
pub const AUTH_FAILED: &str = "auth_failed";
pub const INVALID_PARAMS: &str = "invalid_params";

// Method names
pub const METHOD_AUTH: &str = "auth";
pub const METHOD_ROK_GET_TASK: &str = "rok.get_task";
pub const METHOD_ROK_SNAPSHOT_NOTEBOOK: &str = "rok.snapshot_notebook";
pub const METHOD_ROK_SNAPSHOT_PVC: &str = "rok.snapshot_pvc";
pub const METHOD_ROK_HYDRATE_PVC: &str = "rok.hydrate_pvc_from_snapshot";
pub const METHOD_ROK_REPLACE_CLONED_VOLUMES: &str = "rok.replace_cloned_volumes";
pub const METHOD_ROK_CHECK_AVAILABILITY: &str = "rok.check_rok_availability";

// Fallback when a response cannot be encoded.
const ENCODE_FAILURE: &str =
    r#"{"id":0,"error":{"code":"internal_error","message":"Failed to encode response"}}"#;

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

// --- Request params ---

#[derive(Debug, Deserialize)]
pub struct AuthParams {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct GetTaskParams {
    pub task_id: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotNotebookParams {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default, alias = "obj")]
    pub object: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotPvcParams {
    pub pvc_name: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Deserialize)]
pub struct HydratePvcParams {
    #[serde(alias = "obj")]
    pub object: String,
    pub version: String,
    pub new_pvc_name: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceClonedVolumesParams {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(alias = "obj")]
    pub object: String,
    pub version: String,
    pub volumes: Vec<Volume>,
}

// --- Results ---

#[derive(Debug, Serialize)]
pub struct AuthResult {
    pub ok: bool,
}

impl SuccessResponse {
    pub fn new<T: Serialize>(id: u64, result: T) -> Self {
        Self {
            id,
            result: serde_json::to_value(result).unwrap_or(Value::Null),
        }
    }
}

impl ErrorResponse {
    pub fn new(id: u64, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
                trans_id: None,
            },
        }
    }

    pub fn with_trans_id(mut self, trans_id: impl Into<String>) -> Self {
        self.error.trans_id = Some(trans_id.into());
        self
    }

    /// Wire form of a handler error. `message` carries the underlying error
    /// text when there is one, otherwise the details.
    pub fn from_rpc(id: u64, err: RpcError) -> Self {
        Self {
            id,
            error: ErrorBody {
                code: err.kind.code(),
                message: err.message.unwrap_or_else(|| err.details.clone()),
                details: Some(err.details),
                trans_id: Some(err.trans_id),
            },
        }
    }
}

impl Reply {
    pub fn success<T: Serialize>(id: u64, result: T) -> Self {
        Reply::Success(SuccessResponse::new(id, result))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl From<ErrorResponse> for Reply {
    fn from(response: ErrorResponse) -> Self {
        Reply::Error(response)
    }
}

/// Serialize a response to a single line.
pub fn encode<T: Serialize>(response: &T) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| ENCODE_FAILURE.to_string())
}

/// Decode request params. Missing params are treated as an empty object so
/// that all-default parameter sets can be omitted.
pub fn parse_params<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, String> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(params).map_err(|e| format!("Invalid params: {e}"))
}
