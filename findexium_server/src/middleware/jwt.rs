//! Bearer token middleware.
//!
//! This middleware is installed once for the whole application. It reads the `Authorization: Bearer <token>` header,
//! validates the token (signature, issuer, audience and expiry) and, if it is valid, stores the [`JwtClaims`] in the
//! request extensions.
//!
//! It never rejects a request by itself. A missing or invalid token simply leaves no claims behind, and the
//! [`AclMiddlewareFactory`](super::AclMiddlewareFactory) on each protected route decides what to do about that.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};

use crate::auth::{JwtClaims, TokenIssuer};

pub struct JwtAuthenticationFactory {
    issuer: Rc<TokenIssuer>,
}

impl JwtAuthenticationFactory {
    pub fn new(issuer: TokenIssuer) -> Self {
        JwtAuthenticationFactory { issuer: Rc::new(issuer) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthenticationFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtAuthenticationService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthenticationService { issuer: Rc::clone(&self.issuer), service: Rc::new(service) }))
    }
}

pub struct JwtAuthenticationService<S> {
    issuer: Rc<TokenIssuer>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let claims = bearer_token(&req).and_then(|token| match self.issuer.validate_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("🔐️ Ignoring invalid bearer token on {}. {e}", req.path());
                None
            },
        });
        if let Some(claims) = claims {
            trace!("🔐️ Request from {} ({}) with roles {:?}", claims.username, claims.user_id, claims.roles);
            req.extensions_mut().insert::<JwtClaims>(claims);
        }
        Box::pin(async move { service.call(req).await })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim()).filter(|t| !t.is_empty())
}
