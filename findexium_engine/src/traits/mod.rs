//! # Storage backend contracts
//!
//! This module defines the behaviour a storage backend needs to expose to be used by the Findexium engine.
//!
//! * [`AuthManagement`] is the login side of the credential store: finding users, checking passwords and fetching
//!   role assignments.
//! * [`UserManagement`] is the administrative side of the credential store: creating, updating and deleting users and
//!   assigning roles.
//! * [`ResourceManagement`] persists the CRUD resources in [`crate::resource_types`]. A backend implements it once
//!   for every resource type it supports.
//!
//! Password hashes never cross these interfaces. Backends hash on the way in and verify in place.
mod auth_management;
mod resource_management;
mod user_management;

pub use auth_management::AuthManagement;
pub use resource_management::ResourceManagement;
pub use user_management::UserManagement;

pub use crate::fdx_api::errors::{AuthApiError, ResourceApiError, UserApiError};
