use crate::prediction::PredictionId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required parameter: {}", .fields.join(", "))]
    MissingParameter { fields: Vec<String> },

    #[error("{field}: {value} is not a valid choice")]
    InvalidChoice { field: String, value: String },

    #[error("Field cannot be patched: {field}")]
    FieldNotPatchable { field: String },

    #[error("Prediction not found: {id}")]
    PredictionNotFound { id: PredictionId },

    #[error("Predictor error: {0}")]
    UpstreamPredictor(String),

    #[error("Missing or invalid access credential")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn missing(fields: &[&str]) -> Self {
        Self::MissingParameter {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn invalid_choice(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidChoice {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamPredictor(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Per-field rejection reasons, keyed by parameter name.
    pub fn field_messages(&self) -> Vec<(String, String)> {
        match self {
            Self::MissingParameter { fields } => fields
                .iter()
                .map(|f| {
                    (
                        f.clone(),
                        "Missing required parameter in the post body".to_string(),
                    )
                })
                .collect(),
            Self::InvalidChoice { field, value } => {
                vec![(field.clone(), format!("{value} is not a valid choice"))]
            }
            Self::FieldNotPatchable { field } => {
                vec![(field.clone(), "Field is read-only".to_string())]
            }
            _ => Vec::new(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::InvalidChoice { .. }
                | Self::FieldNotPatchable { .. }
                | Self::PredictionNotFound { .. }
                | Self::Unauthorized
        )
    }
}
