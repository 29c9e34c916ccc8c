use crate::{
    db_types::{NewUser, Role, UserAccount, UserId, UserUpdate},
    UserApiError,
};

/// Administrative operations on user accounts.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn fetch_users(&self) -> Result<Vec<UserAccount>, UserApiError>;

    async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, UserApiError>;

    /// Creates a new account and assigns it the given roles in a single atomic step. The backend is responsible for
    /// hashing the password. A duplicate email or username fails with [`UserApiError::AlreadyExists`].
    async fn create_user(&self, user: NewUser, roles: &[Role]) -> Result<UserAccount, UserApiError>;

    /// Assigns a role to the user. Assigning a role the user already holds is a no-op.
    async fn add_role_to_user(&self, user_id: &UserId, role: Role) -> Result<(), UserApiError>;

    /// Applies the update and returns the modified account, or `None` if the user does not exist.
    async fn update_user(&self, user_id: &UserId, update: UserUpdate) -> Result<Option<UserAccount>, UserApiError>;

    /// Deletes the user and their role assignments. Returns `false` if the user did not exist.
    async fn delete_user(&self, user_id: &UserId) -> Result<bool, UserApiError>;
}
