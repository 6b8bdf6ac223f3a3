use std::sync::Arc;

use polyfaq_cache::Cache;
use polyfaq_db::store::{FaqStore, UserStore};
use polyfaq_service::FaqService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Accounts for signup and login.
    pub users: Arc<dyn UserStore>,
    /// FAQ reads and admin writes.
    pub faqs: Arc<FaqService>,
    /// Same store the service uses; kept for health reporting.
    pub store: Arc<dyn FaqStore>,
    /// Same cache the service uses; kept for health reporting.
    pub cache: Arc<dyn Cache>,
    pub config: Arc<ServerConfig>,
}
