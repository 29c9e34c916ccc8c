//! # Findexium engine public API
//!
//! The `fdx_api` module exposes the programmatic API for the Findexium engine.
//! The API is modular, so that clients can pick the functionality they need, and each part only asks its backend for
//! the traits it actually uses.
//!
//! * [`auth_api`] verifies login credentials and returns the user's current roles.
//! * [`user_api`] administers user accounts, including input validation and the password policy.
//! * [`resource_api`] is the generic CRUD API for bids, trades, curve points, ratings and rule names.
//! * [`seed`] prepares a fresh store with the default roles and a bootstrap administrator.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use findexium_engine::{AuthApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements AuthManagement
//! let api = AuthApi::new(db);
//! let (user, roles) = api.authenticate("test@test.com", "Password123!").await?;
//! ```
pub mod auth_api;
pub mod errors;
pub mod resource_api;
pub mod seed;
pub mod user_api;
