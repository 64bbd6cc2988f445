use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::field::Field;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadingsError {
    #[error("Missing sensor values: {}", FieldList(.0))]
    Incomplete(Vec<Field>),
}

struct FieldList<'a>(&'a [Field]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// The four sensor values as far as they are known. `None` means the value
/// was neither extracted nor entered, which is distinct from `Some(0.0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(default)]
    pub body_temp: Option<f64>,
    #[serde(default)]
    pub gsr: Option<f64>,
    #[serde(default)]
    pub env_temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

impl SensorReadings {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::BodyTemp => self.body_temp,
            Field::Gsr => self.gsr,
            Field::EnvTemp => self.env_temp,
            Field::Humidity => self.humidity,
        }
    }

    pub fn set(&mut self, field: Field, value: Option<f64>) {
        let slot = match field {
            Field::BodyTemp => &mut self.body_temp,
            Field::Gsr => &mut self.gsr,
            Field::EnvTemp => &mut self.env_temp,
            Field::Humidity => &mut self.humidity,
        };
        *slot = value;
    }

    /// Fields that were not found at all (zero values count as found here).
    pub fn not_found(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.get(*f).is_none()).collect()
    }

    /// Fields that block a prediction: absent or exactly zero.
    pub fn unusable(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !matches!(self.get(*f), Some(v) if v != 0.0))
            .collect()
    }

    /// Apply manually entered values on top of these; a field left empty in
    /// `manual` keeps its current value.
    pub fn overlay(&self, manual: &SensorReadings) -> SensorReadings {
        let mut merged = *self;
        for field in Field::ALL {
            if let Some(v) = manual.get(field) {
                merged.set(field, Some(v));
            }
        }
        merged
    }

    pub fn complete(&self) -> Result<CompleteReadings, ReadingsError> {
        CompleteReadings::try_from(self)
    }
}

/// Four present, non-zero values. The only shape the predictor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompleteReadings {
    pub body_temp: f64,
    pub gsr: f64,
    pub env_temp: f64,
    pub humidity: f64,
}

impl CompleteReadings {
    /// Feature vector for the hydration classifier.
    pub fn hydration_features(&self) -> [f64; 2] {
        [self.body_temp, self.gsr]
    }

    /// Feature vector for the seasonal-context classifier.
    pub fn season_features(&self) -> [f64; 2] {
        [self.env_temp, self.humidity]
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::BodyTemp => self.body_temp,
            Field::Gsr => self.gsr,
            Field::EnvTemp => self.env_temp,
            Field::Humidity => self.humidity,
        }
    }

    /// Values in `Field::ALL` order.
    pub fn values(&self) -> [f64; 4] {
        Field::ALL.map(|f| self.get(f))
    }
}

impl TryFrom<&SensorReadings> for CompleteReadings {
    type Error = ReadingsError;

    fn try_from(r: &SensorReadings) -> Result<Self, Self::Error> {
        let unusable = r.unusable();
        if !unusable.is_empty() {
            return Err(ReadingsError::Incomplete(unusable));
        }
        Ok(CompleteReadings {
            body_temp: r.body_temp.unwrap_or_default(),
            gsr: r.gsr.unwrap_or_default(),
            env_temp: r.env_temp.unwrap_or_default(),
            humidity: r.humidity.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SensorReadings {
        SensorReadings {
            body_temp: Some(36.5),
            gsr: Some(512.0),
            env_temp: Some(28.3),
            humidity: Some(55.0),
        }
    }

    #[test]
    fn complete_readings_split_into_feature_pairs() {
        let c = full().complete().unwrap();
        assert_eq!(c.hydration_features(), [36.5, 512.0]);
        assert_eq!(c.season_features(), [28.3, 55.0]);
        assert_eq!(c.values(), [36.5, 512.0, 28.3, 55.0]);
    }

    #[test]
    fn zero_blocks_prediction_like_missing() {
        let r = SensorReadings { gsr: Some(0.0), humidity: None, ..full() };
        assert_eq!(r.not_found(), vec![Field::Humidity]);
        assert_eq!(
            r.complete().unwrap_err(),
            ReadingsError::Incomplete(vec![Field::Gsr, Field::Humidity])
        );
    }

    #[test]
    fn incomplete_error_lists_field_names() {
        let err = SensorReadings::default().complete().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing sensor values: Body Temp, GSR, Env Temp, Humidity"
        );
    }

    #[test]
    fn overlay_prefers_manual_and_keeps_untouched_fields() {
        let extracted = SensorReadings { humidity: None, ..full() };
        let manual = SensorReadings {
            body_temp: Some(37.1),
            humidity: Some(60.0),
            ..Default::default()
        };
        let merged = extracted.overlay(&manual);
        assert_eq!(merged.body_temp, Some(37.1));
        assert_eq!(merged.gsr, Some(512.0));
        assert_eq!(merged.env_temp, Some(28.3));
        assert_eq!(merged.humidity, Some(60.0));
    }

    #[test]
    fn negative_values_are_usable() {
        let r = SensorReadings { env_temp: Some(-4.0), ..full() };
        assert!(r.complete().is_ok());
    }

    #[test]
    fn deserializes_with_missing_keys() {
        let r: SensorReadings = serde_json::from_str(r#"{"gsr": 480}"#).unwrap();
        assert_eq!(r.gsr, Some(480.0));
        assert_eq!(r.body_temp, None);
    }
}
