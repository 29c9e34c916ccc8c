//! Request handler definitions
//!
//! Define each route and it handler here. The generic CRUD handlers for the trading reference data live in
//! [`crate::resource_routes`].
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! etc.) should be expressed as futures or asynchronous functions. Password hashing is cpu-bound, so the engine runs it
//! on the blocking thread pool.
//!
//! Every protected handler takes the caller's identity as an explicit [`JwtClaims`] argument. Access control itself
//! happens before the handler runs, in the [`crate::middleware::AclMiddlewareFactory`] that the `route!` macro
//! wraps around the route.
use std::str::FromStr;

use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use findexium_engine::{
    db_types::{Role, UserId, UserProfile, UserUpdate},
    traits::{AuthManagement, UserManagement},
    AuthApi,
    UserApi,
};
use log::*;

use crate::{
    auth::{AccessPolicy, JwtClaims, TokenIssuer},
    config::ServerOptions,
    data_objects::{CreateUserRequest, LoginRequest, LoginResponse, MessageResponse},
    errors::ServerError,
    helpers::{display_ip, get_remote_ip},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires $policy:expr) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new($policy));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires $policy:expr)  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($policy));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login => Post "/auth/login" impl AuthManagement);
/// Route handler for the login endpoint
///
/// Exchanges an email and password for a bearer token. The body is `{"email": "...", "password": "..."}`.
///
/// * An empty email or password gives a 400, and the credential store is never consulted.
/// * An unknown email and a wrong password both give the same 401 response, so that clients cannot probe for
///   registered addresses.
/// * On success, the response is `{"token": "<jwt>"}`. The token carries the username, the user id and every role the
///   user currently holds. It does NOT refresh; clients must log in again once it expires.
pub async fn login<A>(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    A: AuthManagement,
{
    trace!("💻️ Received login request");
    let ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    let LoginRequest { email, password } = body.into_inner();
    let (user, roles) = api.authenticate(&email, password.reveal()).await.map_err(|e| {
        info!(target: "fdx::audit", "Failed login for '{email}' from {}. {e}", display_ip(ip));
        ServerError::from(e)
    })?;
    let claims = JwtClaims::for_user(&user, &roles);
    let token = signer.issue_token(claims)?;
    info!(target: "fdx::audit", "User {} ({}) logged in from {} with roles {roles:?}", user.username, user.id, display_ip(ip));
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

route!(logout => Post "/auth/logout" requires AccessPolicy::Authenticated);
/// Route handler for the logout endpoint
///
/// Tokens are stateless, so there is nothing to revoke. The token stays valid until it expires; clients are expected
/// to discard it. The logout is recorded in the audit log.
pub async fn logout(req: HttpRequest, claims: JwtClaims, options: web::Data<ServerOptions>) -> impl Responder {
    let ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    info!(target: "fdx::audit", "User {} ({}) logged out from {}", claims.username, claims.user_id, display_ip(ip));
    HttpResponse::Ok().json(MessageResponse::new("Logged out."))
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(users => Get "/users" impl UserManagement where requires AccessPolicy::admin_only());
pub async fn users<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET users for {}", claims.username);
    let users = api.users().await?.into_iter().map(UserProfile::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(users))
}

route!(user_by_id => Get "/users/{id}" impl UserManagement where requires AccessPolicy::AdminOrSelf);
/// Admins can fetch any account. Everyone else can only fetch their own.
pub async fn user_by_id<B: UserManagement>(
    claims: JwtClaims,
    path: web::Path<UserId>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET user {id} for {}", claims.username);
    let user = api.user_by_id(&id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("User {id}")))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

route!(create_user => Post "/users" impl UserManagement where requires AccessPolicy::admin_only());
/// Route handler for creating users
///
/// The body is `{"username", "email", "password", "role"}`, where `role` is optional. An unknown role name is a
/// 400 and no account is created.
pub async fn create_user<B: UserManagement>(
    claims: JwtClaims,
    body: web::Json<CreateUserRequest>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (new_user, role) = body.into_inner().into_parts();
    debug!("💻️ POST user {} by {}", new_user.username, claims.username);
    let role = role
        .as_deref()
        .map(Role::from_str)
        .transpose()
        .map_err(|e| ServerError::ValidationError(e.to_string()))?;
    let user = api.create_user(new_user, role).await?;
    info!("💻️ User {} ({}) was created by {}", user.username, user.id, claims.username);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/users/{}", user.id)))
        .json(UserProfile::from(user)))
}

route!(update_user => Put "/users/{id}" impl UserManagement where requires AccessPolicy::AdminOrSelf);
/// Route handler for updating users
///
/// Admins can update any account. Everyone else can only update their own. Only the fields that are supplied are
/// changed.
pub async fn update_user<B: UserManagement>(
    claims: JwtClaims,
    path: web::Path<UserId>,
    body: web::Json<UserUpdate>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PUT user {id} by {}", claims.username);
    let user =
        api.update_user(&id, body.into_inner()).await?.ok_or_else(|| ServerError::NoRecordFound(format!("User {id}")))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

route!(delete_user => Delete "/users/{id}" impl UserManagement where requires AccessPolicy::admin_only());
pub async fn delete_user<B: UserManagement>(
    claims: JwtClaims,
    path: web::Path<UserId>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    if !api.delete_user(&id).await? {
        debug!("💻️ DELETE user {id}: no such user");
        return Err(ServerError::NoRecordFound(format!("User {id}")));
    }
    info!("💻️ User {id} was deleted by {}", claims.username);
    Ok(HttpResponse::NoContent().finish())
}

/// A catch-all response for unmatched routes
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    Err(ServerError::NoRecordFound(format!("No route for {} {}", req.method(), req.path())))
}
