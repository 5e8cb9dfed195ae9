use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, post, web};
use serde_json::Value;

use crate::client::{ApiClient, ApiEnvelope};
use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::ProxyRequest;
use crate::routes::backend;
use crate::services::{ServiceError, proxy as proxy_service};

#[post("/proxy")]
/// Forwards a JSON request from page scripts to the backend with the
/// session token attached. The backend envelope is returned as-is.
pub async fn proxy(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Json(request): web::Json<ProxyRequest>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match proxy_service::forward(&repo, &user, request).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
            HttpResponse::build(status).json(response.envelope)
        }
        Err(err) => proxy_error(err),
    }
}

fn proxy_error(err: ServiceError) -> HttpResponse {
    let status = match &err {
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden => StatusCode::FORBIDDEN,
        ServiceError::Form(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Internal(message) => {
            log::error!("Proxy request failed: {message}");
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    HttpResponse::build(status).json(ApiEnvelope::<Value>::failure(err.user_message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_errors_map_to_http_statuses() {
        assert_eq!(
            proxy_error(ServiceError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            proxy_error(ServiceError::Form("bad path".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            proxy_error(ServiceError::Backend("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            proxy_error(ServiceError::Internal("io".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
