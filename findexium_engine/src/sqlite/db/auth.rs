//! Sqlite database operations for logging users in.
//!
//! Generally clients should never call these methods directly, and prefer to use the [`AuthManagement`] trait methods
//! that are implemented on the [`SqliteDatabase`] struct instead.
//!
//! [`AuthManagement`]: crate::traits::AuthManagement
//! [`SqliteDatabase`]: crate::SqliteDatabase
use log::{debug, error};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Role, UserAccount, UserId},
    helpers::verify_in_background,
    AuthApiError,
};

pub async fn find_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, AuthApiError> {
    let user = sqlx::query_as("SELECT id, email, username, created_at, updated_at FROM users WHERE email = ?")
        .bind(email.trim())
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn password_hash_for_user(
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<String>, AuthApiError> {
    let hash: Option<String> = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
        .bind(user_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(hash)
}

pub async fn check_password(
    user_id: &UserId,
    password: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, AuthApiError> {
    match password_hash_for_user(user_id, conn).await? {
        Some(hash) => Ok(verify_in_background(password.to_string(), hash).await),
        None => {
            debug!("🗃️ Password check for unknown user {user_id}");
            Ok(false)
        },
    }
}

pub async fn roles_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Role>, AuthApiError> {
    let names: Vec<String> = sqlx::query_scalar(
        r#"SELECT roles.name FROM user_roles
            JOIN roles ON user_roles.role_id = roles.id
            WHERE user_roles.user_id = ?
            ORDER BY roles.name"#,
    )
    .bind(user_id.as_str())
    .fetch_all(conn)
    .await?;
    let roles = names
        .iter()
        .map(|name| {
            name.parse::<Role>().map_err(|_| {
                error!("🗃️ Role definitions in the database and the code have diverged. Unknown role: {name}");
                AuthApiError::RoleNotFound(name.clone())
            })
        })
        .collect::<Result<Vec<Role>, _>>()?;
    Ok(roles)
}

pub async fn ensure_role_exists(role: Role, conn: &mut SqliteConnection) -> Result<(), AuthApiError> {
    let result = sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?)").bind(role.as_str()).execute(conn).await?;
    if result.rows_affected() > 0 {
        debug!("🗃️ Created role {role}");
    }
    Ok(())
}
