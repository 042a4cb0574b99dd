//! Model abstraction for Sibyl.
//!
//! The HTTP layer only sees the [`Predictor`] capability: given a matrix of
//! feature rows, return one prediction per row. The concrete artifact format
//! lives in [`artifact`], the estimator families in [`linear`] and [`tree`].

pub mod artifact;
pub mod linear;
pub mod loader;
pub mod tree;

pub use artifact::{ArtifactEncoding, Estimator, ModelArtifact};
pub use linear::{LinearRegression, LogisticRegression};
pub use loader::load_predictor;
pub use tree::{DecisionTree, Node, RandomForest, Tree};

use crate::error::{Result, SibylError};
use serde::{Deserialize, Serialize};

/// A loaded model that can score feature rows.
///
/// Implementations are immutable after construction, so a single instance is
/// shared across all request handlers without locking.
pub trait Predictor: Send + Sync {
    /// Number of features each input row must carry.
    fn n_features(&self) -> usize;

    /// Predict one value per row of `features`.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>>;

    /// Summary of the model for logging and inspection.
    fn describe(&self) -> ModelInfo;
}

/// Row-major matrix of feature values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    /// Create a matrix from row-major data.
    pub fn new(data: Vec<f64>, n_rows: usize, n_cols: usize) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SibylError::InvalidRequest(
                "feature matrix must have at least one row and one column".to_string(),
            ));
        }
        if n_rows.checked_mul(n_cols) != Some(data.len()) {
            return Err(SibylError::InvalidRequest(format!(
                "{} values cannot form a {}x{} matrix",
                data.len(),
                n_rows,
                n_cols
            )));
        }
        Ok(Self { data, n_rows, n_cols })
    }

    /// Reshape a single feature vector into a 1 x N matrix.
    pub fn from_row(features: Vec<f64>) -> Result<Self> {
        let n_cols = features.len();
        Self::new(features, 1, n_cols)
    }

    /// Number of rows (samples).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns (features per sample).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Borrow a single row, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.data.chunks_exact(self.n_cols).nth(index)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_cols)
    }

    /// Fail with [`SibylError::ShapeMismatch`] unless rows are `expected` wide.
    pub fn ensure_width(&self, expected: usize) -> Result<()> {
        if self.n_cols != expected {
            return Err(SibylError::ShapeMismatch {
                expected,
                actual: self.n_cols,
            });
        }
        Ok(())
    }
}

/// A single prediction: a class label or a regression value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionValue {
    /// Integer class label.
    Int(i64),
    /// Regression output or floating-point label.
    Float(f64),
    /// String class label.
    Text(String),
}

impl From<i64> for PredictionValue {
    fn from(v: i64) -> Self {
        PredictionValue::Int(v)
    }
}

impl From<f64> for PredictionValue {
    fn from(v: f64) -> Self {
        PredictionValue::Float(v)
    }
}

impl From<&str> for PredictionValue {
    fn from(v: &str) -> Self {
        PredictionValue::Text(v.to_string())
    }
}

/// Class labels of a classifier, in output order.
///
/// Labels are homogeneous: either all integers or all strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabels {
    Int(Vec<i64>),
    Text(Vec<String>),
}

impl ClassLabels {
    /// Number of classes.
    pub fn len(&self) -> usize {
        match self {
            ClassLabels::Int(labels) => labels.len(),
            ClassLabels::Text(labels) => labels.len(),
        }
    }

    /// Whether there are no classes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label for a class index.
    pub fn label(&self, index: usize) -> Option<PredictionValue> {
        match self {
            ClassLabels::Int(labels) => labels.get(index).map(|v| PredictionValue::Int(*v)),
            ClassLabels::Text(labels) => labels.get(index).map(|v| PredictionValue::Text(v.clone())),
        }
    }

    /// All labels as prediction values.
    pub fn to_values(&self) -> Vec<PredictionValue> {
        (0..self.len()).filter_map(|i| self.label(i)).collect()
    }
}

/// Whether a model predicts labels or continuous values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Classification,
    Regression,
}

/// Model summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Optional human-readable model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Estimator family, e.g. `decision_tree`.
    pub kind: String,
    /// Classification or regression.
    pub task: TaskKind,
    /// Expected input width.
    pub n_features: usize,
    /// Feature names, when the artifact records them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feature_names: Vec<String>,
    /// Class labels for classifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<PredictionValue>>,
}
