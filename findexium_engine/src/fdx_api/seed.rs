//! Start-up seeding of the credential store.
use fdx_common::Secret;
use log::*;

use crate::{
    db_types::{NewUser, Role},
    traits::{AuthManagement, UserManagement},
    SeedError,
    UserApi,
};

/// The administrator account that must exist before the server accepts traffic.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub username: String,
    pub password: Secret<String>,
}

/// Makes sure every [`Role`] is defined and that the bootstrap administrator exists.
///
/// Each step checks before it writes, so calling this on every start is safe. Returns `true` if the administrator
/// account was created by this call. An existing account with the same email is left untouched, including its
/// password and roles.
pub async fn seed_roles_and_admin<B>(db: B, admin: &BootstrapAdmin) -> Result<bool, SeedError>
where B: AuthManagement + UserManagement {
    for role in Role::ALL {
        db.ensure_role_exists(role).await?;
    }
    if db.find_user_by_email(&admin.email).await?.is_some() {
        debug!("🌱️ Bootstrap administrator {} already exists", admin.email);
        return Ok(false);
    }
    let api = UserApi::new(db);
    let user = NewUser { username: admin.username.clone(), email: admin.email.clone(), password: admin.password.clone() };
    let account = api.create_user(user, Some(Role::Admin)).await?;
    info!("🌱️ Created bootstrap administrator {} ({})", account.email, account.id);
    Ok(true)
}
