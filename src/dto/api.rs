//! JSON pass-through payloads of the `/api/proxy` endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiEnvelope;

/// Request forwarded verbatim to the backend on behalf of the session user.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProxyRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
    /// Scalar query parameters; `null` values are dropped.
    #[serde(default)]
    pub query: BTreeMap<String, Value>,
}

/// Backend status with the untouched envelope.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub envelope: ApiEnvelope<Value>,
}
