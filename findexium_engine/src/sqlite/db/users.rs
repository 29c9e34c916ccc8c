//! Sqlite database operations for managing user accounts and their role assignments.
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, Role, UserAccount, UserId, UserUpdate},
    helpers::hash_in_background,
    UserApiError,
};

const USER_COLUMNS: &str = "id, email, username, created_at, updated_at";

pub async fn fetch_users(conn: &mut SqliteConnection) -> Result<Vec<UserAccount>, UserApiError> {
    let users = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, username"))
        .fetch_all(conn)
        .await?;
    Ok(users)
}

pub async fn fetch_user_by_id(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, UserApiError> {
    let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Inserts the user. The caller should wrap this in a transaction if roles are assigned straight afterwards.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<UserAccount, UserApiError> {
    let id = UserId::random();
    let hash = hash_in_background(user.password.reveal().clone()).await?;
    let account: UserAccount = sqlx::query_as(&format!(
        "INSERT INTO users (id, email, username, password_hash) VALUES (?, ?, ?, ?) RETURNING {USER_COLUMNS}"
    ))
    .bind(id.as_str())
    .bind(user.email.trim())
    .bind(user.username.trim())
    .bind(hash)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Created user account {} ({})", account.username, account.id);
    Ok(account)
}

pub async fn add_role_to_user(user_id: &UserId, role: Role, conn: &mut SqliteConnection) -> Result<(), UserApiError> {
    sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?)").bind(role.as_str()).execute(&mut *conn).await?;
    let result = sqlx::query(
        "INSERT OR IGNORE INTO user_roles (user_id, role_id) SELECT ?, id FROM roles WHERE name = ?",
    )
    .bind(user_id.as_str())
    .bind(role.as_str())
    .execute(conn)
    .await?;
    if result.rows_affected() > 0 {
        debug!("🗃️ Assigned role {role} to user {user_id}");
    }
    Ok(())
}

pub async fn update_user(
    user_id: &UserId,
    update: UserUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<UserAccount>, UserApiError> {
    let UserUpdate { username, email } = update;
    let account: Option<UserAccount> = sqlx::query_as(&format!(
        r#"UPDATE users SET
            username = COALESCE(?, username),
            email = COALESCE(?, email),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING {USER_COLUMNS}"#
    ))
    .bind(username.as_deref().map(str::trim))
    .bind(email.as_deref().map(str::trim))
    .bind(user_id.as_str())
    .fetch_all(conn)
    .await?
    .pop();
    Ok(account)
}

pub async fn delete_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<bool, UserApiError> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = ?").bind(user_id.as_str()).execute(&mut *conn).await?;
    let result = sqlx::query("DELETE FROM users WHERE id = ?").bind(user_id.as_str()).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
