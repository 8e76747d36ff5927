mod fixed;
mod http;

pub use fixed::StaticPredictor;
pub use http::HttpPredictor;

use crate::{
    Result,
    config::{PredictorConfig, PredictorType},
    validation::PredictorChoices,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f64,
}

/// A named image classifier.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, img_url: &str) -> Result<Classification>;
}

pub fn create_predictor(config: PredictorConfig) -> Result<Arc<dyn Predictor>> {
    match config.predictor_type {
        PredictorType::Http => Ok(Arc::new(HttpPredictor::new(config)?)),
        PredictorType::Static => Ok(Arc::new(StaticPredictor::from_config(config)?)),
    }
}

/// Predictors keyed by the name clients pass in the `predictor` field.
#[derive(Clone, Default)]
pub struct PredictorRegistry {
    predictors: HashMap<String, Arc<dyn Predictor>>,
}

impl PredictorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(configs: &[PredictorConfig]) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            let name = config.name.clone();
            registry.register(name.clone(), create_predictor(config.clone())?);
            info!("Registered predictor: {}", name);
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, predictor: Arc<dyn Predictor>) {
        self.predictors.insert(name.into(), predictor);
    }

    pub fn with(mut self, name: impl Into<String>, predictor: Arc<dyn Predictor>) -> Self {
        self.register(name, predictor);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Predictor>> {
        self.predictors.get(name).cloned()
    }

    pub fn choices(&self) -> PredictorChoices {
        PredictorChoices::new(self.predictors.keys().cloned())
    }
}
