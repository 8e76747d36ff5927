use super::{Classification, Predictor};
use crate::{Error, Result, config::PredictorConfig};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

/// Calls a model server that accepts `{"img_url": ...}` and answers
/// `{"label": ..., "confidence": ...}`.
pub struct HttpPredictor {
    url: String,
    headers: HashMap<String, String>,
    client: reqwest::Client,
    name: String,
}

impl HttpPredictor {
    pub fn new(config: PredictorConfig) -> Result<Self> {
        let url = config.url.ok_or_else(|| {
            Error::config(format!(
                "http predictor '{}' requires url field",
                config.name
            ))
        })?;

        debug!("Creating HTTP predictor for: {}", config.name);

        Ok(Self {
            url,
            headers: config.headers,
            client: reqwest::Client::new(),
            name: config.name,
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, img_url: &str) -> Result<Classification> {
        let mut req_builder = self
            .client
            .post(&self.url)
            .json(&json!({ "img_url": img_url }));

        for (key, value) in &self.headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await.map_err(|e| {
            Error::upstream(format!("Failed to reach predictor '{}': {}", self.name, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(format!(
                "Predictor '{}' responded with status {}",
                self.name, status
            )));
        }

        let classification: Classification = response.json().await.map_err(|e| {
            Error::upstream(format!(
                "Failed to parse response from predictor '{}': {}",
                self.name, e
            ))
        })?;

        debug!(
            "Predictor {} labelled {} as {} ({:.3})",
            self.name, img_url, classification.label, classification.confidence
        );
        Ok(classification)
    }
}
