use crate::{
    Error, Result,
    prediction::{NewPrediction, PredictionPatch},
};
use std::collections::{BTreeSet, HashMap};

pub const IMG_URL: &str = "img_url";
pub const PREDICTOR: &str = "predictor";
pub const HUMAN_ANSWER: &str = "human_answer";

const PATCHABLE_FIELDS: &[&str] = &[HUMAN_ANSWER];

/// The closed set of predictor names accepted at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictorChoices(BTreeSet<String>);

impl PredictorChoices {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    choices: PredictorChoices,
}

impl Validator {
    pub fn new(choices: PredictorChoices) -> Self {
        Self { choices }
    }

    pub fn choices(&self) -> &PredictorChoices {
        &self.choices
    }

    pub fn validate_creation(&self, params: &HashMap<String, String>) -> Result<NewPrediction> {
        let img_url = present(params, IMG_URL);
        let predictor = present(params, PREDICTOR);

        let (img_url, predictor) = match (img_url, predictor) {
            (Some(img_url), Some(predictor)) => (img_url, predictor),
            (None, None) => return Err(Error::missing(&[IMG_URL, PREDICTOR])),
            (None, Some(_)) => return Err(Error::missing(&[IMG_URL])),
            (Some(_), None) => return Err(Error::missing(&[PREDICTOR])),
        };

        if !self.choices.contains(predictor) {
            return Err(Error::invalid_choice(PREDICTOR, predictor));
        }

        Ok(NewPrediction {
            img_url: img_url.to_string(),
            predictor: predictor.to_string(),
        })
    }

    pub fn validate_patch(&self, params: &HashMap<String, String>) -> Result<PredictionPatch> {
        let mut rejected: Vec<&String> = params
            .keys()
            .filter(|key| !PATCHABLE_FIELDS.contains(&key.as_str()))
            .collect();
        rejected.sort();
        if let Some(field) = rejected.first() {
            return Err(Error::FieldNotPatchable {
                field: field.to_string(),
            });
        }

        let patch = PredictionPatch {
            human_answer: params.get(HUMAN_ANSWER).cloned(),
        };
        if patch.is_empty() {
            return Err(Error::missing(&[HUMAN_ANSWER]));
        }
        Ok(patch)
    }
}

/// The raw value of `field`, unless it is absent or blank.
fn present<'a>(params: &'a HashMap<String, String>, field: &str) -> Option<&'a str> {
    params
        .get(field)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
