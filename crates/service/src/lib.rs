//! FAQ service: the read path with lazy translation and caching, and the
//! admin write paths with namespace-wide cache invalidation.

pub mod error;
pub mod faq_service;
pub mod single_flight;
pub mod stats;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{ServiceError, ServiceResult};
pub use faq_service::{FaqDraft, FaqService};
pub use stats::StatsSnapshot;
