use thiserror::Error;

use crate::helpers::PasswordError;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Both an email address and a password are required.")]
    MissingCredentials,
    #[error("No user account exists for the given email address.")]
    UnknownEmail,
    #[error("The password is incorrect.")]
    IncorrectPassword,
    #[error("The role {0} is not defined in the database.")]
    RoleNotFound(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid user data. {0}")]
    ValidationError(String),
    #[error("A user with that {0} already exists.")]
    AlreadyExists(String),
    #[error("Could not hash the password. {0}")]
    PasswordHashError(String),
}

impl From<sqlx::Error> for UserApiError {
    fn from(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                let field = if db_err.message().contains("email") { "email" } else { "username" };
                UserApiError::AlreadyExists(field.into())
            },
            _ => UserApiError::DatabaseError(e.to_string()),
        }
    }
}

impl From<PasswordError> for UserApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::PolicyViolation(msg) => UserApiError::ValidationError(msg),
            PasswordError::HashError(msg) => UserApiError::PasswordHashError(msg),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ResourceApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid {resource}. {reason}")]
    ValidationError { resource: &'static str, reason: String },
    #[error("The id in the request body ({body}) does not match the id in the path ({path}).")]
    IdMismatch { path: i64, body: i64 },
}

impl From<sqlx::Error> for ResourceApiError {
    fn from(e: sqlx::Error) -> Self {
        ResourceApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum SeedError {
    #[error("Could not seed roles. {0}")]
    Roles(#[from] AuthApiError),
    #[error("Could not create the bootstrap administrator. {0}")]
    Admin(#[from] UserApiError),
}
