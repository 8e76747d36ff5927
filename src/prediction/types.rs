use crate::{Error, Result};
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Store-assigned identifier. Strictly increasing in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(i64);

impl PredictionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PredictionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub img_url: String,
    pub predictor: String,
    pub predicted_label: String,
    pub human_answer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrediction {
    pub img_url: String,
    pub predictor: String,
}

/// A classified prediction that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsavedPrediction {
    pub img_url: String,
    pub predictor: String,
    pub predicted_label: String,
    pub created_at: DateTime<Utc>,
}

impl UnsavedPrediction {
    pub fn new(request: NewPrediction, predicted_label: String) -> Self {
        Self {
            img_url: request.img_url,
            predictor: request.predictor,
            predicted_label,
            created_at: now(),
        }
    }

    pub fn into_prediction(self, id: PredictionId) -> Prediction {
        Prediction {
            id,
            img_url: self.img_url,
            predictor: self.predictor,
            predicted_label: self.predicted_label,
            human_answer: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Fields a patch may change. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionPatch {
    pub human_answer: Option<String>,
}

impl PredictionPatch {
    pub fn human_answer(answer: impl Into<String>) -> Self {
        Self {
            human_answer: Some(answer.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.human_answer.is_none()
    }

    /// Merges the patch into `prediction` and bumps `updated_at`.
    pub fn apply(&self, prediction: &mut Prediction) {
        if let Some(ref answer) = self.human_answer {
            prediction.human_answer = Some(answer.clone());
        }
        prediction.updated_at = next_update_time(prediction.updated_at);
    }
}

/// Current time at microsecond resolution, the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Refreshed `updated_at`, always strictly after `previous`.
pub fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Prediction {
        UnsavedPrediction::new(
            NewPrediction {
                img_url: "http://placehold.it/299x299.jpg".to_string(),
                predictor: "nanameue".to_string(),
            },
            "cat".to_string(),
        )
        .into_prediction(PredictionId::new(1))
    }

    #[test]
    fn test_new_prediction_has_equal_timestamps() {
        let prediction = sample();
        assert_eq!(prediction.created_at, prediction.updated_at);
        assert!(prediction.human_answer.is_none());
    }

    #[test]
    fn test_patch_moves_updated_at_forward() {
        let mut prediction = sample();
        let created_at = prediction.created_at;

        PredictionPatch::human_answer("dog").apply(&mut prediction);
        assert_eq!(prediction.human_answer.as_deref(), Some("dog"));
        assert!(prediction.updated_at > created_at);

        let first_update = prediction.updated_at;
        PredictionPatch::human_answer("bird").apply(&mut prediction);
        assert!(prediction.updated_at > first_update);
        assert_eq!(prediction.created_at, created_at);
    }

    #[test]
    fn test_next_update_time_when_clock_lags() {
        let future = now() + Duration::seconds(60);
        assert_eq!(next_update_time(future), future + Duration::microseconds(1));
    }

    #[test]
    fn test_timestamp_text_round_trip_keeps_micros() {
        let ts = now();
        let text = format_timestamp(&ts);
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn test_prediction_id_parsing() {
        assert_eq!("42".parse::<PredictionId>().unwrap(), PredictionId::new(42));
        assert!("abc".parse::<PredictionId>().is_err());
        assert!(PredictionId::new(2) > PredictionId::new(1));
    }

    #[test]
    fn test_prediction_serializes_id_as_number() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["predicted_label"], "cat");
        assert!(json["human_answer"].is_null());
    }
}
