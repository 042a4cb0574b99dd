// Test fixtures and data generators for integration tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sibyl::error::{Result, SibylError};
use sibyl::model::{
    ClassLabels, DecisionTree, Estimator, FeatureMatrix, LinearRegression, LogisticRegression,
    ModelArtifact, ModelInfo, Node, PredictionValue, Predictor, RandomForest, TaskKind, Tree,
};

/// Iris species labels.
pub fn iris_classes() -> ClassLabels {
    ClassLabels::Text(vec![
        "setosa".to_string(),
        "versicolor".to_string(),
        "virginica".to_string(),
    ])
}

/// Nodes of a depth-two iris tree splitting on petal length then petal width.
///
/// Leaves hold class indices 0, 1, 2.
pub fn iris_nodes() -> Vec<Node> {
    vec![
        Node::split(2, 2.45, 1, 2),
        Node::leaf(0.0),
        Node::split(3, 1.75, 3, 4),
        Node::leaf(1.0),
        Node::leaf(2.0),
    ]
}

/// Iris decision tree with integer class labels.
pub fn iris_tree_artifact() -> ModelArtifact {
    ModelArtifact::new(Estimator::DecisionTree(DecisionTree::classifier(
        4,
        ClassLabels::Int(vec![0, 1, 2]),
        iris_nodes(),
    )))
    .with_name("iris-tree")
    .with_feature_names(["sepal_length", "sepal_width", "petal_length", "petal_width"])
}

/// Three-tree forest over the iris features with string labels.
pub fn iris_forest_artifact() -> ModelArtifact {
    let stump = Tree::new(vec![
        Node::split(2, 2.45, 1, 2),
        Node::leaf(0.0),
        Node::leaf(2.0),
    ]);
    ModelArtifact::new(Estimator::RandomForest(RandomForest::classifier(
        4,
        iris_classes(),
        vec![Tree::new(iris_nodes()), Tree::new(iris_nodes()), stump],
    )))
    .with_name("iris-forest")
}

/// `y = 2*x0 - x1 + 0.5`
pub fn linear_artifact() -> ModelArtifact {
    ModelArtifact::new(Estimator::LinearRegression(LinearRegression::new(
        vec![2.0, -1.0],
        0.5,
    )))
}

/// Binary logistic model over three features; positive when `x0 > x2`.
pub fn logistic_artifact() -> ModelArtifact {
    ModelArtifact::new(Estimator::LogisticRegression(LogisticRegression::new(
        vec![vec![1.0, 0.0, -1.0]],
        vec![0.0],
        ClassLabels::Text(vec!["light".to_string(), "heavy".to_string()]),
    )))
}

/// Reference iris samples and their expected class index.
pub fn iris_samples() -> Vec<(Vec<f64>, i64)> {
    vec![
        (vec![5.1, 3.5, 1.4, 0.2], 0),
        (vec![6.0, 2.7, 5.1, 1.6], 1),
        (vec![6.3, 3.3, 6.0, 2.5], 2),
        (vec![4.9, 3.0, 1.4, 0.2], 0),
        (vec![5.7, 2.8, 4.1, 1.3], 1),
        (vec![7.2, 3.6, 6.1, 2.5], 2),
    ]
}

/// Predictor that always fails at inference time.
pub struct FailingPredictor {
    pub n_features: usize,
}

impl Predictor for FailingPredictor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, _features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        Err(SibylError::Prediction("leaf index out of bounds".to_string()))
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: Some("failing".to_string()),
            kind: "failing".to_string(),
            task: TaskKind::Regression,
            n_features: self.n_features,
            feature_names: Vec::new(),
            classes: None,
        }
    }
}

/// Deterministic random data generator for reproducible tests
pub struct TestDataGenerator {
    rng: StdRng,
}

impl TestDataGenerator {
    /// Creates a new generator with a fixed seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a feature vector with values in `[low, high)`
    pub fn features(&mut self, len: usize, low: f64, high: f64) -> Vec<f64> {
        (0..len).map(|_| self.rng.gen_range(low..high)).collect()
    }

    /// Generates a plausible iris measurement
    pub fn iris_features(&mut self) -> Vec<f64> {
        vec![
            self.rng.gen_range(4.3..7.9),
            self.rng.gen_range(2.0..4.4),
            self.rng.gen_range(1.0..6.9),
            self.rng.gen_range(0.1..2.5),
        ]
    }
}

impl Default for TestDataGenerator {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Expected class index for the iris tree, computed directly from the splits.
pub fn iris_tree_expected(features: &[f64]) -> i64 {
    if features[2] <= 2.45 {
        0
    } else if features[3] <= 1.75 {
        1
    } else {
        2
    }
}
