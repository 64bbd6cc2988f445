pub mod advice;
pub mod classifier;
pub mod error;
pub mod labels;
pub mod predictor;

pub use advice::{hydration_advice, season_advice, Advice, Severity};
pub use classifier::{Classifier, DecisionTree, N_FEATURES};
pub use error::ModelError;
pub use labels::LabelEncoder;
pub use predictor::{LabeledModel, Prediction, Predictor};
