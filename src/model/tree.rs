//! Decision tree and random forest estimators.
//!
//! Trees are stored as flat node arrays. Children always sit at a higher
//! index than their parent, which validation enforces, so traversal from
//! the root is guaranteed to terminate.

use super::linear::argmax;
use super::{ClassLabels, FeatureMatrix, PredictionValue};
use crate::error::{Result, SibylError};
use serde::{Deserialize, Serialize};

/// A node in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Internal split node: go left if `row[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Leaf node. For classifiers the value is a class index.
    Leaf { value: f64 },
}

impl Node {
    /// Create a new split node.
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Create a new leaf node.
    pub fn leaf(value: f64) -> Self {
        Self::Leaf { value }
    }
}

/// A single tree, rooted at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Check structure against the expected input width and class count.
    pub fn validate(&self, n_features: usize, n_classes: Option<usize>) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(SibylError::InvalidModel("tree has no nodes".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(SibylError::InvalidModel(format!(
                            "node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(SibylError::InvalidModel(format!(
                            "node {} has a non-finite threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(SibylError::InvalidModel(format!(
                                "node {} has invalid child index {}",
                                idx, child
                            )));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if let Some(n_classes) = n_classes {
                        if value < 0.0 || value.fract() != 0.0 || value as usize >= n_classes {
                            return Err(SibylError::InvalidModel(format!(
                                "leaf {} holds {} which is not a class index below {}",
                                idx, value, n_classes
                            )));
                        }
                    } else if !value.is_finite() {
                        return Err(SibylError::InvalidModel(format!(
                            "leaf {} holds a non-finite value",
                            idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf and return its value.
    pub fn leaf_value(&self, row: &[f64]) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).ok_or_else(|| {
                        SibylError::Prediction(format!("feature {} missing from row", feature))
                    })?;
                    let next = if *x <= *threshold { *left } else { *right };
                    if next <= idx {
                        return Err(SibylError::Prediction(format!(
                            "cycle detected at node {}",
                            idx
                        )));
                    }
                    idx = next;
                }
                None => {
                    return Err(SibylError::Prediction(format!(
                        "node {} does not exist",
                        idx
                    )))
                }
            }
        }
    }
}

/// A single decision tree classifier or regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Expected input width.
    pub n_features: usize,
    /// Class labels; `None` for a regressor.
    pub classes: Option<ClassLabels>,
    /// The tree itself.
    pub tree: Tree,
}

impl DecisionTree {
    pub fn classifier(n_features: usize, classes: ClassLabels, nodes: Vec<Node>) -> Self {
        Self {
            n_features,
            classes: Some(classes),
            tree: Tree::new(nodes),
        }
    }

    pub fn regressor(n_features: usize, nodes: Vec<Node>) -> Self {
        Self {
            n_features,
            classes: None,
            tree: Tree::new(nodes),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_common("decision_tree", self.n_features, self.classes.as_ref())?;
        self.tree
            .validate(self.n_features, self.classes.as_ref().map(ClassLabels::len))
            .map_err(|e| prefix("decision_tree", e))
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        features.ensure_width(self.n_features)?;

        features
            .rows()
            .map(|row| {
                let value = self.tree.leaf_value(row)?;
                match &self.classes {
                    Some(classes) => class_label(classes, class_index(value)?),
                    None => Ok(PredictionValue::Float(value)),
                }
            })
            .collect()
    }
}

/// An ensemble of trees.
///
/// Classifiers take the majority vote over trees, ties going to the class
/// listed first; regressors average the leaf values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Expected input width.
    pub n_features: usize,
    /// Class labels; `None` for a regressor.
    pub classes: Option<ClassLabels>,
    /// Member trees.
    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub fn classifier(n_features: usize, classes: ClassLabels, trees: Vec<Tree>) -> Self {
        Self {
            n_features,
            classes: Some(classes),
            trees,
        }
    }

    pub fn regressor(n_features: usize, trees: Vec<Tree>) -> Self {
        Self {
            n_features,
            classes: None,
            trees,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_common("random_forest", self.n_features, self.classes.as_ref())?;
        if self.trees.is_empty() {
            return Err(SibylError::InvalidModel(
                "random_forest: at least one tree is required".to_string(),
            ));
        }
        let n_classes = self.classes.as_ref().map(ClassLabels::len);
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, n_classes)
                .map_err(|e| prefix(&format!("random_forest: tree {}", i), e))?;
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        features.ensure_width(self.n_features)?;

        features
            .rows()
            .map(|row| match &self.classes {
                Some(classes) => {
                    let mut votes = vec![0.0; classes.len()];
                    for tree in &self.trees {
                        let class = class_index(tree.leaf_value(row)?)?;
                        let slot = votes.get_mut(class).ok_or_else(|| {
                            SibylError::Prediction(format!("class index {} out of range", class))
                        })?;
                        *slot += 1.0;
                    }
                    class_label(classes, argmax(&votes))
                }
                None => {
                    let mut sum = 0.0;
                    for tree in &self.trees {
                        sum += tree.leaf_value(row)?;
                    }
                    Ok(PredictionValue::Float(sum / self.trees.len() as f64))
                }
            })
            .collect()
    }
}

fn validate_common(kind: &str, n_features: usize, classes: Option<&ClassLabels>) -> Result<()> {
    if n_features == 0 {
        return Err(SibylError::InvalidModel(format!(
            "{}: n_features must be non-zero",
            kind
        )));
    }
    if classes.is_some_and(ClassLabels::is_empty) {
        return Err(SibylError::InvalidModel(format!(
            "{}: classifier has no classes",
            kind
        )));
    }
    Ok(())
}

/// Interpret a classifier leaf as a class index.
fn class_index(value: f64) -> Result<usize> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(SibylError::Prediction(format!(
            "leaf value {} is not a class index",
            value
        )));
    }
    Ok(value as usize)
}

fn class_label(classes: &ClassLabels, index: usize) -> Result<PredictionValue> {
    classes
        .label(index)
        .ok_or_else(|| SibylError::Prediction(format!("class index {} out of range", index)))
}

fn prefix(context: &str, err: SibylError) -> SibylError {
    match err {
        SibylError::InvalidModel(msg) => SibylError::InvalidModel(format!("{}: {}", context, msg)),
        other => other,
    }
}
