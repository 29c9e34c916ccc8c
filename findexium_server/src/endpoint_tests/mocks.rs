use findexium_engine::{
    db_types::{NewUser, Role, UserAccount, UserId, UserUpdate},
    traits::{AuthManagement, UserManagement},
    AuthApiError,
    UserApiError,
};
use mockall::mock;

mock! {
    pub AuthManager {}
    impl AuthManagement for AuthManager {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError>;
        async fn check_password(&self, user_id: &UserId, password: &str) -> Result<bool, AuthApiError>;
        async fn fetch_roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, AuthApiError>;
        async fn ensure_role_exists(&self, role: Role) -> Result<(), AuthApiError>;
    }
}

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn fetch_users(&self) -> Result<Vec<UserAccount>, UserApiError>;
        async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, UserApiError>;
        async fn create_user(&self, user: NewUser, roles: &[Role]) -> Result<UserAccount, UserApiError>;
        async fn add_role_to_user(&self, user_id: &UserId, role: Role) -> Result<(), UserApiError>;
        async fn update_user(&self, user_id: &UserId, update: UserUpdate) -> Result<Option<UserAccount>, UserApiError>;
        async fn delete_user(&self, user_id: &UserId) -> Result<bool, UserApiError>;
    }
}
