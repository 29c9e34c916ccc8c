//! Findexium Engine
//!
//! The Findexium engine holds the domain logic for the Findexium back-office service: user accounts and their roles,
//! credential checks, and the trading reference data (bids, trades, curve points, ratings and rule names).
//! It is transport-agnostic. The HTTP layer lives in `findexium_server`.
//!
//! The library is divided into two main sections:
//! 1. Storage backends ([`mod@sqlite`]). Backends implement the traits in [`mod@traits`]. You should never need to
//!    talk to the database directly. Use the public API instead. The exception is the data types used in the
//!    database, which are defined in [`mod@db_types`] and [`mod@resource_types`] and are public.
//! 2. The public API ([`mod@fdx_api`]). Each API object wraps a backend that implements the traits it needs, so that
//!    they can be mocked independently in tests.
pub mod db_types;
pub mod fdx_api;
pub mod helpers;
pub mod resource_types;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use fdx_api::{
    auth_api::AuthApi,
    errors::{AuthApiError, ResourceApiError, SeedError, UserApiError},
    resource_api::ResourceApi,
    seed::{seed_roles_and_admin, BootstrapAdmin},
    user_api::UserApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{AuthManagement, ResourceManagement, UserManagement};
