//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod faq_repo;
pub mod user_repo;

pub use faq_repo::FaqRepo;
pub use user_repo::UserRepo;
