use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use super::ApiError;
use crate::llm::ChatCompletion;
use crate::rag::Retriever;

/// Shared state behind every route. Cloning is cheap; everything is
/// behind an Arc.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
    pub llm: Arc<dyn ChatCompletion>,
    pub retriever: Option<Arc<Retriever>>,
}

impl ApiContext {
    pub fn new(
        conn: Connection,
        llm: Arc<dyn ChatCompletion>,
        retriever: Option<Arc<Retriever>>,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            llm,
            retriever,
        }
    }

    /// Lock the database for a short synchronous block. Handlers must
    /// release the guard before awaiting anything.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }
}
