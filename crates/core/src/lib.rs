//! Domain primitives shared by every polyfaq crate.

pub mod cache_keys;
pub mod error;
pub mod language;
pub mod roles;
pub mod types;
