use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiEnvelope, ApiRequest};
use crate::domain::auth::{LoginCredentials, LoginSession, UserProfile};
use crate::repository::errors::RepositoryResult;
use crate::repository::{AuthGateway, BackendProxy, BackendRepository};

#[async_trait]
impl AuthGateway for BackendRepository<'_> {
    async fn login(&self, credentials: &LoginCredentials) -> RepositoryResult<LoginSession> {
        self.send(ApiRequest::post("/auth/login").json(credentials)?)
            .await
    }

    async fn current_user(&self) -> RepositoryResult<UserProfile> {
        self.send(ApiRequest::get("/auth/me")).await
    }

    async fn logout(&self) -> RepositoryResult<()> {
        self.send(ApiRequest::post("/auth/logout")).await
    }
}

#[async_trait]
impl BackendProxy for BackendRepository<'_> {
    async fn forward_request(
        &self,
        request: ApiRequest,
    ) -> RepositoryResult<(u16, ApiEnvelope<Value>)> {
        let (status, envelope) = self.client().forward(self.token(), request).await?;
        Ok((status.as_u16(), envelope))
    }
}
