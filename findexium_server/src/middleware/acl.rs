//! Access control list middleware for the Findexium server.
//! This middleware can be placed on any route or service.
//!
//! It checks the claims left in the request extensions by the
//! [`JwtAuthenticationFactory`](super::JwtAuthenticationFactory) against the [`AccessPolicy`] for the route.
//! Requests without valid claims get a 401 Unauthorized response. Authenticated callers who do not satisfy the
//! policy get a 403 Forbidden response. Otherwise, the request is allowed to continue.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::debug;

use crate::{
    auth::{authorize, AccessPolicy, JwtClaims},
    errors::ServerError,
};

pub struct AclMiddlewareFactory {
    policy: AccessPolicy,
}

impl AclMiddlewareFactory {
    pub fn new(policy: AccessPolicy) -> Self {
        AclMiddlewareFactory { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AclMiddlewareService { policy: Rc::new(self.policy.clone()), service: Rc::new(service) }))
    }
}

pub struct AclMiddlewareService<S> {
    policy: Rc<AccessPolicy>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let policy = Rc::clone(&self.policy);
        Box::pin(async move {
            let claims = req.extensions().get::<JwtClaims>().cloned();
            let target_id = req.match_info().get("id");
            match authorize(&policy, claims.as_ref(), target_id) {
                Ok(()) => service.call(req).await,
                Err(e) => {
                    debug!("🔐️ Access to {} {} denied. {e}", req.method(), req.path());
                    Err(ServerError::AuthenticationError(e).into())
                },
            }
        })
    }
}
