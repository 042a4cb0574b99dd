//! Serialized model artifacts.
//!
//! An artifact is a [`ModelArtifact`] written either as JSON or as bincode.
//! The encoding is picked from the file extension: `.json` is JSON, anything
//! else is treated as bincode.

use super::{
    ClassLabels, DecisionTree, FeatureMatrix, LinearRegression, LogisticRegression, ModelInfo,
    PredictionValue, Predictor, RandomForest, TaskKind,
};
use crate::error::{Result, SibylError};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// On-disk encoding of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactEncoding {
    Json,
    Bincode,
}

impl ArtifactEncoding {
    /// Pick the encoding from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactEncoding::Json,
            _ => ArtifactEncoding::Bincode,
        }
    }
}

/// The estimator families an artifact can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    LinearRegression(LinearRegression),
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Estimator {
    /// Estimator family name.
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LinearRegression(_) => "linear_regression",
            Estimator::LogisticRegression(_) => "logistic_regression",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest(_) => "random_forest",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Estimator::LinearRegression(m) => m.n_features(),
            Estimator::LogisticRegression(m) => m.n_features(),
            Estimator::DecisionTree(m) => m.n_features,
            Estimator::RandomForest(m) => m.n_features,
        }
    }

    pub fn classes(&self) -> Option<&ClassLabels> {
        match self {
            Estimator::LinearRegression(_) => None,
            Estimator::LogisticRegression(m) => Some(&m.classes),
            Estimator::DecisionTree(m) => m.classes.as_ref(),
            Estimator::RandomForest(m) => m.classes.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Estimator::LinearRegression(m) => m.validate(),
            Estimator::LogisticRegression(m) => m.validate(),
            Estimator::DecisionTree(m) => m.validate(),
            Estimator::RandomForest(m) => m.validate(),
        }
    }

    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        match self {
            Estimator::LinearRegression(m) => m.predict(features),
            Estimator::LogisticRegression(m) => m.predict(features),
            Estimator::DecisionTree(m) => m.predict(features),
            Estimator::RandomForest(m) => m.predict(features),
        }
    }
}

/// A pre-trained model as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Optional human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional feature names, one per input column.
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// The estimator.
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Wrap an estimator with no extra metadata.
    pub fn new(estimator: Estimator) -> Self {
        Self {
            name: None,
            feature_names: Vec::new(),
            estimator,
        }
    }

    /// Set the model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the feature names.
    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.estimator.validate()?;

        if !self.feature_names.is_empty() && self.feature_names.len() != self.estimator.n_features() {
            return Err(SibylError::InvalidModel(format!(
                "{} feature names for {} features",
                self.feature_names.len(),
                self.estimator.n_features()
            )));
        }
        Ok(())
    }

    /// Decode an artifact from bytes.
    pub fn from_bytes(bytes: &[u8], encoding: ArtifactEncoding) -> Result<Self> {
        let decoded: Self = match encoding {
            ArtifactEncoding::Json => {
                serde_json::from_slice(bytes).map_err(|e| SibylError::ModelLoad(e.to_string()))
            }
            ArtifactEncoding::Bincode => {
                bincode::deserialize(bytes).map_err(|e| SibylError::ModelLoad(e.to_string()))
            }
        }?;
        Ok(decoded)
    }

    /// Encode an artifact to bytes.
    pub fn to_bytes(&self, encoding: ArtifactEncoding) -> Result<Vec<u8>> {
        let bytes = match encoding {
            ArtifactEncoding::Json => serde_json::to_vec_pretty(self)?,
            ArtifactEncoding::Bincode => bincode::serialize(self)?,
        };
        Ok(bytes)
    }

    /// Read, decode and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SibylError::ModelNotFound(path.to_path_buf()),
            _ => SibylError::ModelLoad(format!("{}: {}", path.display(), e)),
        })?;

        let artifact = Self::from_bytes(&bytes, ArtifactEncoding::from_path(path))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Encode and write an artifact file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes(ArtifactEncoding::from_path(path))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Predictor for ModelArtifact {
    fn n_features(&self) -> usize {
        self.estimator.n_features()
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<PredictionValue>> {
        self.estimator.predict(features)
    }

    fn describe(&self) -> ModelInfo {
        let classes = self.estimator.classes();
        ModelInfo {
            name: self.name.clone(),
            kind: self.estimator.kind().to_string(),
            task: if classes.is_some() {
                TaskKind::Classification
            } else {
                TaskKind::Regression
            },
            n_features: self.estimator.n_features(),
            feature_names: self.feature_names.clone(),
            classes: classes.map(ClassLabels::to_values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample_artifact() -> ModelArtifact {
        ModelArtifact::new(Estimator::DecisionTree(DecisionTree::classifier(
            2,
            ClassLabels::Int(vec![1, 2]),
            vec![Node::split(0, 0.5, 1, 2), Node::leaf(0.0), Node::leaf(1.0)],
        )))
        .with_name("usage-tree")
        .with_feature_names(["app_usage", "screen_on"])
    }

    #[test]
    fn test_encoding_from_path() {
        assert_eq!(
            ArtifactEncoding::from_path(&PathBuf::from("model.json")),
            ArtifactEncoding::Json
        );
        assert_eq!(
            ArtifactEncoding::from_path(&PathBuf::from("model.JSON")),
            ArtifactEncoding::Json
        );
        assert_eq!(
            ArtifactEncoding::from_path(&PathBuf::from("model.bin")),
            ArtifactEncoding::Bincode
        );
        assert_eq!(
            ArtifactEncoding::from_path(&PathBuf::from("model")),
            ArtifactEncoding::Bincode
        );
    }

    #[test]
    fn test_json_layout() {
        let json = r#"{
            "name": "tiny",
            "estimator": {"linear_regression": {"coef": [1.0, 2.0], "intercept": 0.5}}
        }"#;
        let artifact = ModelArtifact::from_bytes(json.as_bytes(), ArtifactEncoding::Json).unwrap();
        assert_eq!(artifact.name.as_deref(), Some("tiny"));
        assert!(artifact.feature_names.is_empty());
        assert_eq!(artifact.n_features(), 2);
        assert_eq!(artifact.describe().task, TaskKind::Regression);
    }

    #[test]
    fn test_json_and_bincode_agree() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("model.json");
        let bin_path = dir.path().join("model.bin");

        let artifact = sample_artifact();
        artifact.save(&json_path).unwrap();
        artifact.save(&bin_path).unwrap();

        let from_json = ModelArtifact::load(&json_path).unwrap();
        let from_bin = ModelArtifact::load(&bin_path).unwrap();
        assert_eq!(from_json, from_bin);

        let row = FeatureMatrix::from_row(vec![0.9, 0.1]).unwrap();
        assert_eq!(from_json.predict(&row).unwrap(), vec![PredictionValue::Int(2)]);
        assert_eq!(from_bin.predict(&row).unwrap(), vec![PredictionValue::Int(2)]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(SibylError::ModelNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, [0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(SibylError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_feature_name_count_is_validated() {
        let artifact = sample_artifact().with_feature_names(["only_one"]);
        assert!(matches!(
            artifact.validate(),
            Err(SibylError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_describe() {
        let info = sample_artifact().describe();
        assert_eq!(info.kind, "decision_tree");
        assert_eq!(info.task, TaskKind::Classification);
        assert_eq!(info.n_features, 2);
        assert_eq!(info.name.as_deref(), Some("usage-tree"));
        assert_eq!(
            info.classes,
            Some(vec![PredictionValue::Int(1), PredictionValue::Int(2)])
        );
    }
}
