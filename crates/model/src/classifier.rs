use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Number of input features every classifier takes.
pub const N_FEATURES: usize = 2;

/// Marker sklearn uses for "no child" in its flattened tree arrays.
const LEAF: i64 = -1;

/// A fitted decision tree in sklearn's flattened array layout
/// (`tree_.children_left`, `tree_.feature`, ...). Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, `n_nodes × n_classes`.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn n_classes(&self) -> usize {
        self.value.first().map_or(0, Vec::len)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(ModelError::Invalid("decision tree has no nodes".into()));
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|len| *len != n)
        {
            return Err(ModelError::Invalid("decision tree arrays differ in length".into()));
        }
        let n_classes = self.n_classes();
        if n_classes == 0 || self.value.iter().any(|row| row.len() != n_classes) {
            return Err(ModelError::Invalid("decision tree class weights are ragged".into()));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF && right == LEAF {
                continue;
            }
            // Children always come after their parent in sklearn's layout,
            // which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(ModelError::Invalid(format!(
                        "node {node} has out-of-order child {child}"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= N_FEATURES as i64 {
                return Err(ModelError::Invalid(format!(
                    "node {node} splits on feature {feature}, expected 0..{N_FEATURES}"
                )));
            }
        }
        Ok(())
    }

    /// Class weights at the leaf `x` lands in, normalized to sum to 1.
    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            weights.clone()
        }
    }
}

/// A pretrained two-feature classifier, deserialized from a JSON artifact
/// tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    DecisionTree(DecisionTree),
    /// Soft-voting ensemble: class probabilities are averaged across trees.
    RandomForest { trees: Vec<DecisionTree> },
}

impl Classifier {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let classifier: Classifier = serde_json::from_str(json)?;
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn n_classes(&self) -> usize {
        match self {
            Classifier::DecisionTree(tree) => tree.n_classes(),
            Classifier::RandomForest { trees } => trees.first().map_or(0, DecisionTree::n_classes),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Classifier::DecisionTree(tree) => tree.validate(),
            Classifier::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Invalid("random forest has no trees".into()));
                }
                let n_classes = trees[0].n_classes();
                for tree in trees {
                    tree.validate()?;
                    if tree.n_classes() != n_classes {
                        return Err(ModelError::Invalid(
                            "random forest trees disagree on class count".into(),
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> Vec<f64> {
        match self {
            Classifier::DecisionTree(tree) => tree.predict_proba(x),
            Classifier::RandomForest { trees } => {
                let mut sum = vec![0.0; self.n_classes()];
                for tree in trees {
                    for (acc, p) in sum.iter_mut().zip(tree.predict_proba(x)) {
                        *acc += p;
                    }
                }
                let n = trees.len() as f64;
                sum.into_iter().map(|s| s / n).collect()
            }
        }
    }

    /// Index of the most probable class; ties go to the lowest index.
    pub fn predict(&self, x: &[f64; N_FEATURES]) -> usize {
        let proba = self.predict_proba(x);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `x[0] <= 37.5` → class 0, otherwise class 1.
    pub(crate) fn stump(threshold: f64) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], vec![4.0, 1.0], vec![0.0, 3.0]],
        }
    }

    #[test]
    fn tree_walks_to_leaf() {
        let tree = stump(37.5);
        tree.validate().unwrap();
        assert_eq!(tree.predict_proba(&[36.5, 0.0]), vec![0.8, 0.2]);
        assert_eq!(tree.predict_proba(&[38.0, 0.0]), vec![0.0, 1.0]);
        // Threshold is inclusive on the left branch.
        assert_eq!(tree.predict_proba(&[37.5, 0.0]), vec![0.8, 0.2]);
    }

    #[test]
    fn second_feature_split() {
        let tree = DecisionTree {
            feature: vec![1, -2, -2],
            ..stump(400.0)
        };
        let clf = Classifier::DecisionTree(tree);
        assert_eq!(clf.predict(&[0.0, 512.0]), 1);
        assert_eq!(clf.predict(&[0.0, 300.0]), 0);
    }

    #[test]
    fn forest_averages_tree_probabilities() {
        let forest = Classifier::RandomForest { trees: vec![stump(37.0), stump(38.0)] };
        forest.validate().unwrap();
        // First tree says class 1 outright, second says 0.8/0.2 for class 0.
        let p = forest.predict_proba(&[37.5, 0.0]);
        assert!((p[0] - 0.4).abs() < 1e-9);
        assert!((p[1] - 0.6).abs() < 1e-9);
        assert_eq!(forest.predict(&[37.5, 0.0]), 1);
    }

    #[test]
    fn ties_pick_lowest_class() {
        let tree = DecisionTree {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![vec![2.0, 2.0]],
        };
        assert_eq!(Classifier::DecisionTree(tree).predict(&[1.0, 1.0]), 0);
    }

    #[test]
    fn parses_tagged_json() {
        let json = r#"{
            "kind": "decision_tree",
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [37.5, -2, -2],
            "value": [[5, 5], [4, 1], [0, 3]]
        }"#;
        let clf = Classifier::from_json(json).unwrap();
        assert_eq!(clf, Classifier::DecisionTree(stump(37.5)));
        assert_eq!(clf.n_classes(), 2);
    }

    #[test]
    fn rejects_malformed_trees() {
        let mut t = stump(1.0);
        t.threshold.pop();
        assert!(matches!(t.validate(), Err(ModelError::Invalid(_))));

        let mut t = stump(1.0);
        t.children_left[0] = 0;
        assert!(matches!(t.validate(), Err(ModelError::Invalid(_))));

        let mut t = stump(1.0);
        t.feature[0] = 2;
        assert!(matches!(t.validate(), Err(ModelError::Invalid(_))));

        let forest = Classifier::RandomForest { trees: vec![] };
        assert!(matches!(forest.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = Classifier::from_json(r#"{"kind": "svm"}"#).unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }
}
