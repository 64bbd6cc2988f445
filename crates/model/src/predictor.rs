use hydrosense_core::CompleteReadings;
use serde::Serialize;
use std::path::Path;

use crate::advice::{hydration_advice, season_advice, Advice};
use crate::classifier::{Classifier, N_FEATURES};
use crate::error::{read_artifact, ModelError};
use crate::labels::LabelEncoder;

/// A classifier paired with the encoder that names its classes.
#[derive(Debug, Clone)]
pub struct LabeledModel {
    classifier: Classifier,
    labels: LabelEncoder,
}

impl LabeledModel {
    pub fn new(classifier: Classifier, labels: LabelEncoder) -> Result<Self, ModelError> {
        classifier.validate()?;
        if classifier.n_classes() != labels.len() {
            return Err(ModelError::Invalid(format!(
                "classifier has {} classes but encoder lists {}",
                classifier.n_classes(),
                labels.len()
            )));
        }
        Ok(Self { classifier, labels })
    }

    pub fn load(model_path: &Path, labels_path: &Path) -> Result<Self, ModelError> {
        let classifier = Classifier::from_json(&read_artifact(model_path)?)?;
        let labels = LabelEncoder::load(labels_path)?;
        Self::new(classifier, labels)
    }

    pub fn predict(&self, features: &[f64; N_FEATURES]) -> Result<&str, ModelError> {
        self.labels.inverse_transform(self.classifier.predict(features))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub hydration: String,
    pub season: String,
    pub hydration_advice: Advice,
    pub season_advice: Advice,
}

/// The two independent classifiers: hydration status from body temperature
/// and GSR, seasonal context from environmental temperature and humidity.
#[derive(Debug, Clone)]
pub struct Predictor {
    hydration: LabeledModel,
    season: LabeledModel,
}

impl Predictor {
    pub fn new(hydration: LabeledModel, season: LabeledModel) -> Self {
        Self { hydration, season }
    }

    pub fn predict(&self, readings: &CompleteReadings) -> Result<Prediction, ModelError> {
        let hydration = self.hydration.predict(&readings.hydration_features())?.to_string();
        let season = self.season.predict(&readings.season_features())?.to_string();
        tracing::info!(%hydration, %season, "prediction made");
        Ok(Prediction {
            hydration_advice: hydration_advice(&hydration),
            season_advice: season_advice(&season),
            hydration,
            season,
        })
    }
}
