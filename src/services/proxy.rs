use reqwest::Method;
use serde_json::Value;

use crate::client::{ApiRequest, validate_path};
use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::{ProxyRequest, ProxyResponse};
use crate::repository::BackendProxy;
use crate::services::{ServiceError, ServiceResult};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Checks the method and path, then forwards the request with the user's token.
pub async fn forward<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request: ProxyRequest,
) -> ServiceResult<ProxyResponse>
where
    R: BackendProxy + ?Sized,
{
    let method = Method::from_bytes(request.method.trim().to_ascii_uppercase().as_bytes())
        .ok()
        .filter(|m| ALLOWED_METHODS.contains(m))
        .ok_or_else(|| ServiceError::Form(format!("Unsupported method {}", request.method)))?;

    validate_path(&request.path).map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut api_request = ApiRequest::new(method, request.path.clone());
    for (key, value) in &request.query {
        if let Some(value) = query_value(value) {
            api_request = api_request.query(key, value);
        }
    }
    api_request.body = request.body;

    let (status, envelope) = repo.forward_request(api_request).await.map_err(|err| {
        log::warn!(
            "Proxy {} {} for {} failed: {err}",
            request.method,
            request.path,
            user.email
        );
        err
    })?;

    Ok(ProxyResponse { status, envelope })
}
