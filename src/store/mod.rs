mod memory;
mod sql;

pub use memory::MemoryPredictionStore;
pub use sql::SqlPredictionStore;

use crate::{
    Result,
    prediction::{Prediction, PredictionId, PredictionPatch, UnsavedPrediction},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Persistence for predictions.
///
/// Every engine assigns ids strictly greater than any id it handed out
/// before (including ids of cleared records), lists newest first, and
/// serializes concurrent updates to the same record.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn insert(&self, prediction: UnsavedPrediction) -> Result<PredictionId>;

    async fn find_by_id(&self, id: PredictionId) -> Result<Prediction>;

    /// All predictions, ordered by id descending.
    async fn list_all(&self) -> Result<Vec<Prediction>>;

    async fn update_fields(&self, id: PredictionId, patch: PredictionPatch) -> Result<Prediction>;

    /// Removes every record. Administrative only; ids are not reused afterwards.
    async fn clear(&self) -> Result<()>;
}

/// Opens the libSQL store at `db_path`, falling back to an in-memory store
/// when the database cannot be initialized.
pub async fn open_store(db_path: &str) -> Arc<dyn PredictionStore> {
    match SqlPredictionStore::open(db_path).await {
        Ok(store) => {
            info!("Prediction database initialized: {}", db_path);
            Arc::new(store)
        }
        Err(e) => {
            warn!(
                "Database initialization failed, using in-memory store: {}",
                e
            );
            Arc::new(MemoryPredictionStore::new())
        }
    }
}
