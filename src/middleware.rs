//! Session user extraction and the unauthorized redirect.

use std::future::{Ready, ready};
use std::task::{Context, Poll};

use actix_identity::Identity;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::domain::auth::AuthenticatedUser;

/// Where unauthenticated requests are sent.
pub const SIGN_IN_PATH: &str = "/auth";

/// Stores the user, bearer token included, as the identity of the session.
pub fn remember_user(req: &HttpRequest, user: &AuthenticatedUser) -> Result<Identity, Error> {
    let serialized = serde_json::to_string(user).map_err(actix_web::error::ErrorInternalServerError)?;
    Identity::login(&req.extensions(), serialized).map_err(actix_web::error::ErrorInternalServerError)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = Identity::from_request(req, payload)
            .into_inner()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|id| match serde_json::from_str::<AuthenticatedUser>(&id) {
                Ok(user) => Some(user),
                Err(err) => {
                    log::warn!("Discarding unreadable session user: {err}");
                    None
                }
            })
            .filter(|user| !user.token.is_empty());

        ready(user.ok_or_else(|| actix_web::error::ErrorUnauthorized("sign in required")))
    }
}

/// Turns every `401 Unauthorized` response into a redirect to the sign-in page.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware { service }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            let (req, _) = res.into_parts();
            let redirect = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, SIGN_IN_PATH))
                .finish()
                .map_into_right_body();
            Ok(ServiceResponse::new(req, redirect))
        })
    }
}
