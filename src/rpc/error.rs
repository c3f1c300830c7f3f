/// Failure of a single JSON-RPC round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    /// Request could not be sent or the connection dropped.
    Transport(String),
    /// Endpoint answered with a non-success HTTP status.
    Http(u16),
    /// Response body was not a JSON-RPC envelope.
    Decode(String),
    /// Node returned a JSON-RPC `error` object.
    Node { code: i64, message: String },
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "RPC request failed: {}", msg),
            RpcError::Http(status) => write!(f, "RPC endpoint returned HTTP {}", status),
            RpcError::Decode(msg) => write!(f, "Invalid JSON-RPC response: {}", msg),
            RpcError::Node { code, message } => write!(f, "RPC error {}: {}", code, message),
        }
    }
}

impl std::error::Error for RpcError {}

impl RpcError {
    /// Node-side errors are answered like a missing result: the node may simply
    /// not have the data yet.
    pub fn is_node_error(&self) -> bool {
        matches!(self, RpcError::Node { .. })
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RpcError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RpcError::Http(status.as_u16())
        } else {
            RpcError::Transport(e.to_string())
        }
    }
}
