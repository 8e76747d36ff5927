use crate::{
    Error, Result,
    predictor::PredictorRegistry,
    prediction::{Prediction, PredictionId, UnsavedPrediction},
    store::PredictionStore,
    validation::Validator,
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Prediction lifecycle: create (validate, classify, insert), read, and patch.
#[derive(Clone)]
pub struct PredictionService {
    validator: Validator,
    predictors: PredictorRegistry,
    store: Arc<dyn PredictionStore>,
    predictor_timeout: Duration,
}

impl PredictionService {
    /// The validator accepts exactly the predictors registered in `predictors`.
    pub fn new(
        predictors: PredictorRegistry,
        store: Arc<dyn PredictionStore>,
        predictor_timeout: Duration,
    ) -> Self {
        Self::with_validator(
            Validator::new(predictors.choices()),
            predictors,
            store,
            predictor_timeout,
        )
    }

    pub fn with_validator(
        validator: Validator,
        predictors: PredictorRegistry,
        store: Arc<dyn PredictionStore>,
        predictor_timeout: Duration,
    ) -> Self {
        Self {
            validator,
            predictors,
            store,
            predictor_timeout,
        }
    }

    pub async fn create(&self, params: &HashMap<String, String>) -> Result<Prediction> {
        let request = self.validator.validate_creation(params)?;

        let predictor = self.predictors.get(&request.predictor).ok_or_else(|| {
            Error::upstream(format!("No predictor registered as '{}'", request.predictor))
        })?;

        let classification =
            match tokio::time::timeout(self.predictor_timeout, predictor.predict(&request.img_url))
                .await
            {
                Ok(Ok(classification)) => classification,
                Ok(Err(e)) => {
                    warn!("Predictor {} failed: {}", request.predictor, e);
                    return Err(match e {
                        Error::UpstreamPredictor(msg) => Error::UpstreamPredictor(msg),
                        other => Error::upstream(other.to_string()),
                    });
                }
                Err(_) => {
                    warn!(
                        "Predictor {} timed out after {:?}",
                        request.predictor, self.predictor_timeout
                    );
                    return Err(Error::upstream(format!(
                        "Predictor '{}' timed out after {} ms",
                        request.predictor,
                        self.predictor_timeout.as_millis()
                    )));
                }
            };

        debug!(
            "Classified {} as {} with confidence {}",
            request.img_url, classification.label, classification.confidence
        );

        let unsaved = UnsavedPrediction::new(request, classification.label);
        let id = self.store.insert(unsaved.clone()).await?;
        info!("Created prediction {} using {}", id, unsaved.predictor);

        Ok(unsaved.into_prediction(id))
    }

    pub async fn get(&self, id: PredictionId) -> Result<Prediction> {
        self.store.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Prediction>> {
        self.store.list_all().await
    }

    pub async fn patch(
        &self,
        id: PredictionId,
        params: &HashMap<String, String>,
    ) -> Result<Prediction> {
        let patch = self.validator.validate_patch(params)?;
        let prediction = self.store.update_fields(id, patch).await?;
        info!("Patched prediction {}", id);
        Ok(prediction)
    }

    /// Drops every stored prediction. Not exposed over HTTP.
    pub async fn clear(&self) -> Result<()> {
        warn!("Clearing all predictions");
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        predictor::{Classification, Predictor, StaticPredictor},
        store::MemoryPredictionStore,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct SlowPredictor;

    #[async_trait]
    impl Predictor for SlowPredictor {
        async fn predict(&self, _img_url: &str) -> Result<Classification> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Classification {
                label: "late".to_string(),
                confidence: 0.0,
            })
        }
    }

    fn params(img_url: &str, predictor: &str) -> HashMap<String, String> {
        HashMap::from([
            ("img_url".to_string(), img_url.to_string()),
            ("predictor".to_string(), predictor.to_string()),
        ])
    }

    #[tokio::test]
    async fn test_timeout_does_not_persist() {
        let store = Arc::new(MemoryPredictionStore::new());
        let service = PredictionService::new(
            PredictorRegistry::new().with("slow", Arc::new(SlowPredictor)),
            store.clone(),
            Duration::from_millis(50),
        );

        let err = service
            .create(&params("http://x/a.jpg", "slow"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamPredictor(_)));
        assert!(err.to_string().contains("timed out"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validator_without_registered_predictor() {
        let service = PredictionService::with_validator(
            Validator::new(crate::validation::PredictorChoices::new(["ghost"])),
            PredictorRegistry::new().with("nanameue", Arc::new(StaticPredictor::new("cat", 1.0))),
            Arc::new(MemoryPredictionStore::new()),
            Duration::from_secs(1),
        );

        let err = service
            .create(&params("http://x/a.jpg", "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamPredictor(_)));
    }

    #[tokio::test]
    async fn test_created_record_matches_stored_record() {
        let service = PredictionService::new(
            PredictorRegistry::new().with("nanameue", Arc::new(StaticPredictor::new("cat", 1.0))),
            Arc::new(MemoryPredictionStore::new()),
            Duration::from_secs(1),
        );

        let created = service
            .create(&params("http://x/a.jpg", "nanameue"))
            .await
            .unwrap();
        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(created, fetched);
    }
}
