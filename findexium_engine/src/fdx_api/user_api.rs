//! Administration of user accounts.
use std::fmt::Debug;

use fdx_common::is_blank;
use log::{debug, trace};

use crate::{
    db_types::{NewUser, Role, UserAccount, UserId, UserUpdate},
    helpers::{check_password_policy, is_valid_email, is_valid_username},
    traits::UserManagement,
    UserApiError,
};

pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn users(&self) -> Result<Vec<UserAccount>, UserApiError> {
        self.db.fetch_users().await
    }

    pub async fn user_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, UserApiError> {
        self.db.fetch_user_by_id(user_id).await
    }

    /// Validates and creates a new user, optionally assigning a role.
    ///
    /// Username and email must be non-blank. The username may only use letters, digits and `-._@`, the email must
    /// look like an email address and the password has to pass [`check_password_policy`].
    pub async fn create_user(&self, user: NewUser, role: Option<Role>) -> Result<UserAccount, UserApiError> {
        validate_username(&user.username)?;
        validate_email(&user.email)?;
        check_password_policy(user.password.reveal())?;
        let roles = role.into_iter().collect::<Vec<_>>();
        let account = self.db.create_user(user, &roles).await?;
        debug!("Created user {} with roles {roles:?}", account.id);
        Ok(account)
    }

    pub async fn add_role(&self, user_id: &UserId, role: Role) -> Result<(), UserApiError> {
        self.db.add_role_to_user(user_id, role).await
    }

    /// Applies a partial update. Fields that are supplied are validated the same way as on creation.
    pub async fn update_user(&self, user_id: &UserId, update: UserUpdate) -> Result<Option<UserAccount>, UserApiError> {
        if let Some(username) = &update.username {
            validate_username(username)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if update.is_empty() {
            trace!("Empty update for user {user_id}");
            return self.db.fetch_user_by_id(user_id).await;
        }
        self.db.update_user(user_id, update).await
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<bool, UserApiError> {
        self.db.delete_user(user_id).await
    }
}

fn validate_username(username: &str) -> Result<(), UserApiError> {
    if is_blank(Some(username)) {
        return Err(UserApiError::ValidationError("A username is required.".into()));
    }
    if !is_valid_username(username.trim()) {
        return Err(UserApiError::ValidationError(format!(
            "{username} is not a valid username. Use only letters, digits and -._@"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserApiError> {
    if is_blank(Some(email)) {
        return Err(UserApiError::ValidationError("An email address is required.".into()));
    }
    if !is_valid_email(email.trim()) {
        return Err(UserApiError::ValidationError(format!("{email} is not a valid email address.")));
    }
    Ok(())
}
