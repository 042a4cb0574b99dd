//! Linear estimators.

use super::{ClassLabels, FeatureMatrix, PredictionValue};
use crate::error::{Result, SibylError};
use serde::{Deserialize, Serialize};

/// Ordinary least-squares regression: `y = coef · x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// One coefficient per feature.
    pub coef: Vec<f64>,
    /// Bias term.
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.coef.is_empty() {
            return Err(SibylError::InvalidModel(
                "linear_regression: coef must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        features.ensure_width(self.n_features())?;
        Ok(features
            .rows()
            .map(|row| PredictionValue::Float(dot(&self.coef, row) + self.intercept))
            .collect())
    }
}

/// Logistic regression classifier.
///
/// A binary model stores a single coefficient row and two classes; the
/// positive class (`classes[1]`) is chosen when the decision score is
/// strictly positive. A multi-class model stores one row per class and
/// picks the highest score, ties going to the earlier class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Coefficient rows, `[n_rows][n_features]`.
    pub coef: Vec<Vec<f64>>,
    /// One intercept per coefficient row.
    pub intercept: Vec<f64>,
    /// Class labels in output order.
    pub classes: ClassLabels,
}

impl LogisticRegression {
    pub fn new(coef: Vec<Vec<f64>>, intercept: Vec<f64>, classes: ClassLabels) -> Self {
        Self {
            coef,
            intercept,
            classes,
        }
    }

    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1 && self.classes.len() == 2
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SibylError::InvalidModel(format!("logistic_regression: {}", msg)));

        if self.n_features() == 0 {
            return invalid("coef must have at least one non-empty row".to_string());
        }
        if self.coef.iter().any(|row| row.len() != self.n_features()) {
            return invalid("coef rows must all have the same length".to_string());
        }
        if self.intercept.len() != self.coef.len() {
            return invalid(format!(
                "{} intercepts for {} coefficient rows",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        if self.classes.len() < 2 {
            return invalid("at least two classes are required".to_string());
        }
        if !self.is_binary() && self.coef.len() != self.classes.len() {
            return invalid(format!(
                "{} coefficient rows for {} classes",
                self.coef.len(),
                self.classes.len()
            ));
        }
        Ok(())
    }

    /// Raw decision scores for one row, one per coefficient row.
    pub fn decision_function(&self, row: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| dot(weights, row) + bias)
            .collect()
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        features.ensure_width(self.n_features())?;

        features
            .rows()
            .map(|row| {
                let scores = self.decision_function(row);
                let class = if self.is_binary() {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores)
                };
                self.classes.label(class).ok_or_else(|| {
                    SibylError::Prediction(format!("class index {} out of range", class))
                })
            })
            .collect()
    }
}

fn dot(weights: &[f64], row: &[f64]) -> f64 {
    weights.iter().zip(row).map(|(w, x)| w * x).sum()
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
