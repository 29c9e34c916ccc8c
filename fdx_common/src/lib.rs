//! Small building blocks shared by the Findexium engine and server crates.
mod helpers;
mod secret;

pub use helpers::{is_blank, parse_boolean_flag};
pub use secret::Secret;
