use std::fmt::Display;

use fdx_common::Secret;
use findexium_engine::db_types::NewUser;
use serde::{Deserialize, Serialize};

/// A plain `{"message": "..."}` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}

/// Missing fields deserialize as empty strings, so that they are reported as missing credentials (400) rather than
/// as a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Secret<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    /// Optional role name, "Admin" or "User"
    #[serde(default)]
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn into_parts(self) -> (NewUser, Option<String>) {
        let user = NewUser { username: self.username, email: self.email, password: self.password };
        (user, self.role)
    }
}
