//! # Findexium server
//! This crate hosts the HTTP server for the Findexium back-office API. It is responsible for:
//! * Logging users in and issuing signed bearer tokens (JWTs).
//! * Checking tokens and access policies on every protected route.
//! * Exposing user administration and the CRUD resources (bids, trades, curve points, ratings and rule names).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /auth/login`: Exchange an email and password for a bearer token.
//! * `POST /auth/logout`: Logs the logout. Tokens are stateless and stay valid until they expire.
//! * `/api/users[/{id}]`: User administration. Admin only, except that users may read and update their own account.
//! * `/api/{bid|trade|curve|rating|rulename}[/{id}]`: CRUD for the trading reference data. Any role can read and write;
//!   only admins may delete.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod resource_routes;
pub mod routes;
pub mod server;
