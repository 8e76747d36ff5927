use super::{Classification, Predictor};
use crate::{Error, Result, config::PredictorConfig};
use async_trait::async_trait;

/// Answers every image with the same label. Useful for local runs and
/// smoke tests where no model server is available.
#[derive(Debug, Clone)]
pub struct StaticPredictor {
    classification: Classification,
}

impl StaticPredictor {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            classification: Classification {
                label: label.into(),
                confidence,
            },
        }
    }

    pub fn from_config(config: PredictorConfig) -> Result<Self> {
        let label = config.label.ok_or_else(|| {
            Error::config(format!(
                "static predictor '{}' requires label field",
                config.name
            ))
        })?;
        Ok(Self::new(label, config.confidence))
    }
}

#[async_trait]
impl Predictor for StaticPredictor {
    async fn predict(&self, _img_url: &str) -> Result<Classification> {
        Ok(self.classification.clone())
    }
}
