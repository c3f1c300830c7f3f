use super::{RpcError, RpcTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// JSON-RPC 2.0 client over HTTP POST.
///
/// The endpoint is owned by the client value, so separate analyses can point at
/// separate nodes in the same process.
#[derive(Clone)]
pub struct HttpRpcClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRpcClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        log::debug!("📡 {} → {}", method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Rate limits (429) and some gateway errors still carry a JSON-RPC
            // error body; surface it as a node error so the caller can retry.
            let body = response.text().await?;
            log::debug!("⚠️  {} returned HTTP {}", method, status.as_u16());
            return Err(error_from_status_body(status.as_u16(), &body));
        }

        let envelope: Value = response.json().await?;
        result_from_envelope(envelope)
    }
}

/// Classify a non-2xx response. A JSON-RPC envelope with an `error` object is a
/// [`RpcError::Node`]; anything else stays [`RpcError::Http`].
pub(crate) fn error_from_status_body(status: u16, body: &str) -> RpcError {
    match serde_json::from_str::<Value>(body) {
        Ok(envelope) if envelope.get("error").is_some_and(|e| e.is_object()) => {
            match result_from_envelope(envelope) {
                Err(e) => e,
                Ok(_) => RpcError::Http(status),
            }
        }
        _ => RpcError::Http(status),
    }
}

/// Pull `result` out of a JSON-RPC envelope. A missing `result` becomes
/// `Value::Null`; an `error` object becomes [`RpcError::Node`].
pub(crate) fn result_from_envelope(mut envelope: Value) -> Result<Value, RpcError> {
    if !envelope.is_object() {
        return Err(RpcError::Decode(format!(
            "expected JSON object, got {}",
            envelope
        )));
    }

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(RpcError::Node {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        });
    }

    Ok(envelope
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
