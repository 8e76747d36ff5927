use super::mocks::MockPredictor;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use kiyo_prime::{
    predictor::PredictorRegistry,
    server::{self, API_KEY_HEADER, handlers::AppState},
    service::PredictionService,
    store::{MemoryPredictionStore, PredictionStore, SqlPredictionStore},
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc, time::Duration};

pub const TEST_API_KEY: &str = "test-api-key";
pub const VALID_IMG_URL: &str = "http://placehold.it/299x299.jpg";
pub const VALID_PREDICTOR: &str = "nanameue";

/// Both store engines, labelled for assertion messages
pub async fn all_stores() -> Vec<(&'static str, Arc<dyn PredictionStore>)> {
    vec![
        ("memory", Arc::new(MemoryPredictionStore::new())),
        (
            "libsql",
            Arc::new(SqlPredictionStore::open(":memory:").await.unwrap()),
        ),
    ]
}

/// Service backed by an in-memory libSQL store and a single mock predictor
pub async fn create_test_service(predictor: Arc<MockPredictor>) -> PredictionService {
    let store = SqlPredictionStore::open(":memory:").await.unwrap();
    PredictionService::new(
        PredictorRegistry::new().with(VALID_PREDICTOR, predictor),
        Arc::new(store),
        Duration::from_secs(5),
    )
}

pub async fn create_test_app(predictor: Arc<MockPredictor>) -> (Router, Arc<PredictionService>) {
    let service = Arc::new(create_test_service(predictor).await);
    let state = AppState {
        service: service.clone(),
        api_key: Arc::from(TEST_API_KEY),
    };
    (server::router(state), service)
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn valid_params() -> HashMap<String, String> {
    params(&[("img_url", VALID_IMG_URL), ("predictor", VALID_PREDICTOR)])
}

fn encode_form(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(API_KEY_HEADER, TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

pub fn form_request(method: &str, uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(API_KEY_HEADER, TEST_API_KEY)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(encode_form(pairs)))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
