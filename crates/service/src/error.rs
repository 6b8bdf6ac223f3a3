use polyfaq_core::error::CoreError;
use polyfaq_db::store::StoreError;

/// Failures surfaced by [`FaqService`](crate::FaqService).
///
/// Translation and cache failures never appear here: both are absorbed
/// inside the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
