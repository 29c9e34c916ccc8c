use crate::{
    db_types::{Role, UserAccount, UserId},
    AuthApiError,
};

/// The `AuthManagement` trait defines the credential store operations needed to log a user in.
///
/// Implementations must not reveal password hashes. [`check_password`](AuthManagement::check_password) does the
/// comparison inside the backend.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Fetches the account registered to the given email address. Email addresses are matched case-insensitively.
    /// If no such account exists, the call still succeeds and returns `None`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError>;

    /// Checks the password against the stored hash for the user. A missing user is reported as `false`.
    async fn check_password(&self, user_id: &UserId, password: &str) -> Result<bool, AuthApiError>;

    /// Fetches the roles assigned to the user. A user with no roles (or no account) gets an empty vector.
    async fn fetch_roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, AuthApiError>;

    /// Creates the role definition if it does not exist yet. This function must be idempotent.
    async fn ensure_role_exists(&self, role: Role) -> Result<(), AuthApiError>;
}
