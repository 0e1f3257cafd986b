//! JSON model artifacts exported by the training run.
//!
//! The artifact carries its own metadata next to the estimator. Everything
//! is checked once at load time so inference is a pure read.

use crate::domain::model::{EngineeredFeatures, ModelMetadata, FEATURE_NAMES};
use crate::domain::ports::Regressor;
use crate::utils::error::{Result, StrengthError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TARGET: &str = "Concrete compressive strength(MPa, megapascals)";

/// Decision tree node, sklearn convention: go left when `x <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn evaluate(&self, x: &[f64]) -> Result<f64> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x.get(*feature_idx).ok_or_else(|| {
                        StrengthError::inference(format!(
                            "split references feature {} but only {} features were supplied",
                            feature_idx,
                            x.len()
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }

    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        match self {
            TreeNode::Leaf { value } if !value.is_finite() => {
                Err(format!("leaf value {} is not finite", value))
            }
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if *feature_idx >= n_features {
                    return Err(format!(
                        "split feature index {} out of range (model has {} features)",
                        feature_idx, n_features
                    ));
                }
                if threshold.is_nan() {
                    return Err("split threshold is NaN".to_string());
                }
                left.check(n_features)?;
                right.check(n_features)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Averaged regression trees (random forest / extra trees).
    Forest { trees: Vec<TreeNode> },
    /// Gradient boosted trees.
    Boosted {
        base_score: f64,
        learning_rate: f64,
        trees: Vec<TreeNode>,
    },
}

impl Estimator {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        match self {
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != n_features {
                    return Err(format!(
                        "expected {} coefficients, found {}",
                        n_features,
                        coefficients.len()
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear parameters must be finite".to_string());
                }
                Ok(())
            }
            Estimator::Forest { trees } => Self::check_trees(trees, n_features),
            Estimator::Boosted {
                base_score,
                learning_rate,
                trees,
            } => {
                if !base_score.is_finite() || !learning_rate.is_finite() {
                    return Err("base_score and learning_rate must be finite".to_string());
                }
                Self::check_trees(trees, n_features)
            }
        }
    }

    fn check_trees(trees: &[TreeNode], n_features: usize) -> std::result::Result<(), String> {
        if trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.check(n_features).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn evaluate(&self, x: &[f64]) -> Result<f64> {
        match self {
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != x.len() {
                    return Err(StrengthError::inference(format!(
                        "linear model expects {} features, got {}",
                        coefficients.len(),
                        x.len()
                    )));
                }
                Ok(intercept + coefficients.iter().zip(x).map(|(c, v)| c * v).sum::<f64>())
            }
            Estimator::Forest { trees } => {
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.evaluate(x)?;
                }
                Ok(sum / trees.len() as f64)
            }
            Estimator::Boosted {
                base_score,
                learning_rate,
                trees,
            } => {
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.evaluate(x)?;
                }
                Ok(base_score + learning_rate * sum)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub model_version: String,
    pub training_date: String,
    #[serde(default = "default_target")]
    pub target: String,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_importances: BTreeMap<String, f64>,
    pub estimator: Estimator,
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl ModelArtifact {
    fn check(&self) -> std::result::Result<(), String> {
        if self.feature_names.len() != FEATURE_NAMES.len()
            || self.feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return Err(format!(
                "feature_names must be exactly [{}], found [{}]",
                FEATURE_NAMES.join(", "),
                self.feature_names.join(", ")
            ));
        }
        if let Some(unknown) = self
            .feature_importances
            .keys()
            .find(|k| !FEATURE_NAMES.contains(&k.as_str()))
        {
            return Err(format!("feature_importances names unknown feature {}", unknown));
        }
        self.estimator.check(FEATURE_NAMES.len())
    }
}

/// A model artifact loaded from disk, shared read-only across requests.
#[derive(Debug, Clone)]
pub struct ArtifactModel {
    artifact: ModelArtifact,
    source: String,
}

impl ArtifactModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        if !path.exists() {
            return Err(StrengthError::model_load(&source, "model file not found"));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StrengthError::model_load(&source, format!("unreadable: {}", e)))?;

        let model = Self::from_json_str(&content, &source)?;
        tracing::info!(
            path = %source,
            model_type = %model.artifact.model_type,
            model_version = %model.artifact.model_version,
            "Successfully loaded model"
        );
        Ok(model)
    }

    pub fn from_json_str(content: &str, source: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content)
            .map_err(|e| StrengthError::model_load(source, format!("invalid model artifact: {}", e)))?;
        Self::from_artifact(artifact, source)
    }

    pub fn from_artifact(artifact: ModelArtifact, source: &str) -> Result<Self> {
        artifact
            .check()
            .map_err(|reason| StrengthError::model_load(source, reason))?;
        Ok(Self {
            artifact,
            source: source.to_string(),
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Regressor for ArtifactModel {
    fn predict(&self, features: &EngineeredFeatures) -> Result<f64> {
        let x = features.to_vector();
        let value = self.artifact.estimator.evaluate(&x)?;
        if !value.is_finite() {
            return Err(StrengthError::inference(format!(
                "model produced a non-finite prediction ({})",
                value
            )));
        }
        Ok(value)
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            model_type: self.artifact.model_type.clone(),
            model_version: self.artifact.model_version.clone(),
            training_date: self.artifact.training_date.clone(),
            features_used: self.artifact.feature_names.len(),
            target: self.artifact.target.clone(),
            performance_metrics: self.artifact.performance_metrics.clone(),
        }
    }

    fn feature_importances(&self) -> BTreeMap<String, f64> {
        self.artifact.feature_importances.clone()
    }
}
