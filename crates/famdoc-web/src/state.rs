//! Application state.

use famdoc_db::DbPool;
use std::sync::Arc;

use crate::mailer::{LogMailer, Mailer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub mailer: Arc<dyn Mailer>,
    /// Public base URL, used in invitation links.
    pub app_url: String,
}

impl AppState {
    pub fn new(db: DbPool, app_url: impl Into<String>) -> Self {
        Self {
            db,
            mailer: Arc::new(LogMailer),
            app_url: app_url.into(),
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
