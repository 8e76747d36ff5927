use async_trait::async_trait;
use kiyo_prime::{
    Error, Result,
    predictor::{Classification, Predictor},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Mock predictor that records every image it was asked to classify
#[derive(Debug)]
pub struct MockPredictor {
    pub label: String,
    pub calls: Arc<AtomicUsize>,
    pub images: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
}

impl MockPredictor {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            images: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get_images(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, img_url: &str) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.images.lock().unwrap().push(img_url.to_string());

        if let Some(ref error) = self.error {
            return Err(Error::upstream(error.clone()));
        }

        Ok(Classification {
            label: self.label.clone(),
            confidence: 0.9,
        })
    }
}
