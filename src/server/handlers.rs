use super::{
    docs::DOCS_PAGE,
    types::{CreatedResponse, ErrorResponse, StatusResponse},
};
use crate::{
    Error,
    prediction::{Prediction, PredictionId},
    service::PredictionService,
};
use axum::{
    extract::{Form, Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, Json},
};
use std::{collections::HashMap, sync::Arc};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub api_key: Arc<str>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

type FormParams = Result<Form<HashMap<String, String>>, FormRejection>;

pub fn into_api_error(e: Error) -> ApiError {
    let status = match e {
        Error::MissingParameter { .. }
        | Error::InvalidChoice { .. }
        | Error::FieldNotPatchable { .. } => StatusCode::BAD_REQUEST,
        Error::PredictionNotFound { .. } => StatusCode::NOT_FOUND,
        Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::UpstreamPredictor(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if !e.is_client_error() {
        error!("Request failed: {}", e);
    }

    let body = ErrorResponse {
        error: e.to_string(),
        fields: e.field_messages().into_iter().collect(),
    };
    (status, Json(body))
}

/// A request without a form body carries no parameters.
fn form_params(form: FormParams) -> Result<HashMap<String, String>, ApiError> {
    match form {
        Ok(Form(params)) => Ok(params),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(HashMap::new()),
        Err(rejection) => {
            warn!("Rejected form body: {}", rejection.body_text());
            Err((
                rejection.status(),
                Json(ErrorResponse::new(rejection.body_text())),
            ))
        }
    }
}

fn parse_id(raw: &str) -> Result<PredictionId, ApiError> {
    raw.parse().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Prediction not found: {raw}"))),
        )
    })
}

pub async fn docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: StatusCode::OK.as_u16(),
        message: "OK".to_string(),
    })
}

pub async fn create_prediction(
    State(state): State<AppState>,
    form: FormParams,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let params = form_params(form)?;
    info!("Received prediction request for: {:?}", params.get("img_url"));

    let prediction = state.service.create(&params).await.map_err(into_api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            prediction_id: prediction.id,
        }),
    ))
}

pub async fn list_predictions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Prediction>>, ApiError> {
    let predictions = state.service.list().await.map_err(into_api_error)?;
    Ok(Json(predictions))
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Prediction>, ApiError> {
    let id = parse_id(&raw_id)?;
    let prediction = state.service.get(id).await.map_err(into_api_error)?;
    Ok(Json(prediction))
}

pub async fn patch_prediction(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    form: FormParams,
) -> Result<Json<Prediction>, ApiError> {
    let id = parse_id(&raw_id)?;
    let params = form_params(form)?;
    let prediction = state
        .service
        .patch(id, &params)
        .await
        .map_err(into_api_error)?;
    Ok(Json(prediction))
}
