//! `SqliteDatabase` is a concrete implementation of a Findexium engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{
    auth,
    new_pool,
    resources::{self, SqliteResource},
    users,
};
use crate::{
    db_types::{NewUser, Record, Role, UserAccount, UserId, UserUpdate},
    traits::{AuthManagement, ResourceManagement, UserManagement},
    AuthApiError,
    ResourceApiError,
    UserApiError,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::find_user_by_email(email, &mut conn).await
    }

    async fn check_password(&self, user_id: &UserId, password: &str) -> Result<bool, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::check_password(user_id, password, &mut conn).await
    }

    async fn fetch_roles_for_user(&self, user_id: &UserId) -> Result<Vec<Role>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::roles_for_user(user_id, &mut conn).await
    }

    async fn ensure_role_exists(&self, role: Role) -> Result<(), AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::ensure_role_exists(role, &mut conn).await
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_users(&self) -> Result<Vec<UserAccount>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_users(&mut conn).await
    }

    async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<UserAccount>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(user_id, &mut conn).await
    }

    async fn create_user(&self, user: NewUser, roles: &[Role]) -> Result<UserAccount, UserApiError> {
        let mut tx = self.pool.begin().await?;
        let account = users::insert_user(user, &mut tx).await?;
        for role in roles {
            users::add_role_to_user(&account.id, *role, &mut tx).await?;
        }
        tx.commit().await?;
        Ok(account)
    }

    async fn add_role_to_user(&self, user_id: &UserId, role: Role) -> Result<(), UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::add_role_to_user(user_id, role, &mut conn).await
    }

    async fn update_user(&self, user_id: &UserId, update: UserUpdate) -> Result<Option<UserAccount>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_user(user_id, update, &mut conn).await
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<bool, UserApiError> {
        let mut tx = self.pool.begin().await?;
        let deleted = users::delete_user(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}

impl<R: SqliteResource> ResourceManagement<R> for SqliteDatabase {
    async fn fetch_all(&self) -> Result<Vec<Record<R>>, ResourceApiError> {
        let mut conn = self.pool.acquire().await?;
        resources::fetch_all(&mut conn).await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Record<R>>, ResourceApiError> {
        let mut conn = self.pool.acquire().await?;
        resources::fetch_by_id(id, &mut conn).await
    }

    async fn insert(&self, data: &R) -> Result<Record<R>, ResourceApiError> {
        let mut conn = self.pool.acquire().await?;
        resources::insert(data, &mut conn).await
    }

    async fn update(&self, id: i64, data: &R) -> Result<Option<Record<R>>, ResourceApiError> {
        let mut conn = self.pool.acquire().await?;
        resources::update(id, data, &mut conn).await
    }

    async fn delete(&self, id: i64) -> Result<bool, ResourceApiError> {
        let mut conn = self.pool.acquire().await?;
        resources::delete::<R>(id, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations are embedded in the binary, so this is safe to call on every start.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}
