use std::sync::Arc;

use crate::cache::StatusCache;
use crate::refresh::RefreshJob;
use crate::views::Views;

/// Shared state handed to every route handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub job: Arc<RefreshJob>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(job: Arc<RefreshJob>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            job,
            views: Arc::new(Views::new()?),
        })
    }

    pub fn cache(&self) -> &StatusCache {
        self.job.cache()
    }
}
