//! Access tokens and access policies.
//!
//! Access tokens are HS256 JWTs. Besides the registered `iss`, `aud`, `iat` and `exp` claims, they carry
//! * `sub` - the username,
//! * `nameid` - the user id,
//! * `roles` - every role the user held when the token was issued.
//!
//! Claims are fixed at issuance. There is no revocation list, so a token remains valid until it expires, even if the
//! user's roles or password change in the meantime.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use findexium_engine::db_types::{Role, UserAccount, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(rename = "sub")]
    pub username: String,
    #[serde(rename = "nameid")]
    pub user_id: UserId,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl JwtClaims {
    pub fn for_user(user: &UserAccount, roles: &[Role]) -> Self {
        Self { username: user.username.clone(), user_id: user.id.clone(), roles: roles.to_vec() }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// The full claim set as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    claims: JwtClaims,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Claims are placed in the request extensions by [`crate::middleware::JwtAuthenticationFactory`]. Handlers that take
/// a `JwtClaims` argument therefore get the caller's identity explicitly, and fail with a 401 if there is none.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or(ServerError::AuthenticationError(AuthError::MissingToken)))
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: config.token_lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a new access token that expires after the configured lifetime.
    /// This method DOES NOT check that the claims are legitimate. Credentials must be verified before calling it.
    pub fn issue_token(&self, claims: JwtClaims) -> Result<String, AuthError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::TokenSigningError("The token expiry time is out of range.".into()))?;
        self.issue_token_with_expiry(claims, expires_at)
    }

    pub fn issue_token_with_expiry(&self, claims: JwtClaims, expires_at: DateTime<Utc>) -> Result<String, AuthError> {
        let token_claims = TokenClaims {
            claims,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &token_claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenSigningError(e.to_string()))
    }

    /// Checks the signature, issuer, audience and expiry of the token, and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("🔐️ Access token rejected. {e}");
            AuthError::ValidationError(e.to_string())
        })?;
        Ok(data.claims.claims)
    }
}

//----------------------------------------------   Access policies  ----------------------------------------------------
/// The access rule attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No token required.
    Public,
    /// Any caller with a valid token.
    Authenticated,
    /// The caller must hold at least one of the listed roles.
    AnyRole(Vec<Role>),
    /// The caller must be an admin, or be the user the request is about (the `{id}` path segment).
    AdminOrSelf,
}

impl AccessPolicy {
    pub fn admin_only() -> Self {
        Self::AnyRole(vec![Role::Admin])
    }

    pub fn admin_or_user() -> Self {
        Self::AnyRole(vec![Role::Admin, Role::User])
    }
}

/// Decides whether a caller may proceed.
///
/// `claims` is `None` when the request carried no token, or a token that failed validation. `target_id` is the id of
/// the user account the request is about, if any.
pub fn authorize(policy: &AccessPolicy, claims: Option<&JwtClaims>, target_id: Option<&str>) -> Result<(), AuthError> {
    let claims = match (policy, claims) {
        (AccessPolicy::Public, _) => return Ok(()),
        (_, None) => return Err(AuthError::MissingToken),
        (_, Some(c)) => c,
    };
    match policy {
        AccessPolicy::Public | AccessPolicy::Authenticated => Ok(()),
        AccessPolicy::AnyRole(roles) => {
            if roles.iter().any(|r| claims.has_role(*r)) {
                Ok(())
            } else {
                let names = roles.iter().map(Role::to_string).collect::<Vec<_>>().join(" or ");
                Err(AuthError::InsufficientPermissions(format!("This action requires the {names} role.")))
            }
        },
        AccessPolicy::AdminOrSelf => {
            let is_self = target_id.map(|id| id == claims.user_id.as_str()).unwrap_or(false);
            if is_self || claims.is_admin() {
                Ok(())
            } else {
                Err(AuthError::InsufficientPermissions("Only an admin or the account owner may do this.".into()))
            }
        },
    }
}
