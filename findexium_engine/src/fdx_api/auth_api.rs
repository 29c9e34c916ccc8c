//! Credential checks for the login flow.
use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Role, UserAccount},
    traits::AuthManagement,
    AuthApiError,
};

pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Verifies the email and password pair and returns the account with its current roles.
    ///
    /// The checks run in a fixed order, and each one stops the flow:
    /// 1. Blank email or password fails with [`AuthApiError::MissingCredentials`], and the store is never queried.
    /// 2. An unknown email fails with [`AuthApiError::UnknownEmail`].
    /// 3. A wrong password fails with [`AuthApiError::IncorrectPassword`].
    ///
    /// Callers facing the outside world must NOT pass the difference between 2 and 3 on to the client.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(UserAccount, Vec<Role>), AuthApiError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthApiError::MissingCredentials);
        }
        let user = self.db.find_user_by_email(email).await?.ok_or(AuthApiError::UnknownEmail)?;
        if !self.db.check_password(&user.id, password).await? {
            return Err(AuthApiError::IncorrectPassword);
        }
        let roles = self.db.fetch_roles_for_user(&user.id).await?;
        trace!("Authenticated {} with roles {roles:?}", user.id);
        Ok((user, roles))
    }
}
