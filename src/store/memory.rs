use super::PredictionStore;
use crate::{
    Error, Result,
    prediction::{Prediction, PredictionId, PredictionPatch, UnsavedPrediction},
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};
use tracing::debug;

#[derive(Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<PredictionId, Prediction>,
}

/// Process-local store. Used by tests and as the fallback when the
/// database cannot be opened.
#[derive(Default)]
pub struct MemoryPredictionStore {
    inner: Mutex<Inner>,
}

impl MemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}

#[async_trait]
impl PredictionStore for MemoryPredictionStore {
    async fn insert(&self, prediction: UnsavedPrediction) -> Result<PredictionId> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let id = PredictionId::new(inner.last_id);
        inner.records.insert(id, prediction.into_prediction(id));
        debug!("Prediction {} saved to memory store", id);
        Ok(id)
    }

    async fn find_by_id(&self, id: PredictionId) -> Result<Prediction> {
        self.lock()?
            .records
            .get(&id)
            .cloned()
            .ok_or(Error::PredictionNotFound { id })
    }

    async fn list_all(&self) -> Result<Vec<Prediction>> {
        let inner = self.lock()?;
        Ok(inner.records.values().rev().cloned().collect())
    }

    async fn update_fields(&self, id: PredictionId, patch: PredictionPatch) -> Result<Prediction> {
        let mut inner = self.lock()?;
        let prediction = inner
            .records
            .get_mut(&id)
            .ok_or(Error::PredictionNotFound { id })?;
        patch.apply(prediction);
        debug!("Prediction {} updated in memory store", id);
        Ok(prediction.clone())
    }

    async fn clear(&self) -> Result<()> {
        self.lock()?.records.clear();
        Ok(())
    }
}
