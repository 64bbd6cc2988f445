use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{read_artifact, ModelError};

/// Maps a classifier's class index back to its label, like a fitted
/// sklearn `LabelEncoder` (`classes_` is sorted at fit time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { classes: classes.into_iter().map(Into::into).collect() }
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let encoder: LabelEncoder = serde_json::from_str(json)?;
        if encoder.classes.is_empty() {
            return Err(ModelError::Invalid("label encoder has no classes".into()));
        }
        Ok(encoder)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path)?)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str, ModelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClass { index, known: self.classes.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_indices_in_order() {
        let enc = LabelEncoder::new(["Dehydrated", "Hydrated"]);
        assert_eq!(enc.inverse_transform(0).unwrap(), "Dehydrated");
        assert_eq!(enc.inverse_transform(1).unwrap(), "Hydrated");
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let enc = LabelEncoder::new(["Summer"]);
        let err = enc.inverse_transform(3).unwrap_err();
        assert!(matches!(err, ModelError::UnknownClass { index: 3, known: 1 }));
    }

    #[test]
    fn parses_and_rejects_empty() {
        let enc = LabelEncoder::from_json(r#"{"classes": ["Summer", "Winter"]}"#).unwrap();
        assert_eq!(enc.len(), 2);
        assert!(matches!(
            LabelEncoder::from_json(r#"{"classes": []}"#),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = LabelEncoder::load(Path::new("/nonexistent/labels.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/labels.json"));
    }
}
