use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::ModelError;
use crate::model::encoder::{one_hot, TargetEncoder};
use crate::model::trees::{DecisionTree, Node, ObliviousTree, MAX_TREE_DEPTH};

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk model artifact: a versioned envelope around one of the supported
/// model formats. Produced by the offline training pipeline.
#[derive(Debug, Deserialize)]
pub struct Artifact {
    pub schema_version: u32,
    #[serde(flatten)]
    pub model: Model,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    TreeEnsemble(TreeEnsemble),
    Pipeline(Pipeline),
}

/// How the target was transformed before training. The service applies the
/// inverse so responses are always in salary units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    #[default]
    None,
    Log1p,
}

impl TargetTransform {
    pub fn invert(self, raw: f64) -> f64 {
        match self {
            TargetTransform::None => raw,
            TargetTransform::Log1p => raw.exp_m1(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetTransform::None => "none",
            TargetTransform::Log1p => "log1p",
        }
    }
}

/// Gradient-boosted oblivious trees over target-statistic encoded
/// categorical features (the CatBoost model family).
#[derive(Debug, Deserialize)]
pub struct TreeEnsemble {
    pub features: Vec<String>,
    #[serde(default)]
    pub target_transform: TargetTransform,
    pub encoders: HashMap<String, TargetEncoder>,
    #[serde(default)]
    pub bias: f64,
    pub trees: Vec<ObliviousTree>,
}

impl TreeEnsemble {
    pub fn predict(&self, row: &HashMap<&str, &str>) -> f64 {
        let encoded: Vec<f64> = self
            .features
            .iter()
            .map(|name| {
                let value = row.get(name.as_str()).copied().unwrap_or("");
                // presence checked at load time
                self.encoders[name.as_str()].encode(value)
            })
            .collect();

        let raw = self.bias
            + self
                .trees
                .iter()
                .map(|tree| tree.score(&encoded))
                .sum::<f64>();
        self.target_transform.invert(raw)
    }

    fn validate(&self) -> Result<(), ModelError> {
        validate_features(&self.features)?;
        for name in &self.features {
            if !self.encoders.contains_key(name) {
                return Err(ModelError::Invalid(format!(
                    "feature `{name}` has no encoder"
                )));
            }
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("model has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.splits.is_empty() {
                return Err(ModelError::Invalid(format!("tree {i} has no splits")));
            }
            if tree.splits.len() > MAX_TREE_DEPTH {
                return Err(ModelError::Invalid(format!(
                    "tree {i} is deeper than {MAX_TREE_DEPTH} levels"
                )));
            }
            if tree.leaves.len() != 1 << tree.splits.len() {
                return Err(ModelError::Invalid(format!(
                    "tree {i} has {} leaves for depth {}",
                    tree.leaves.len(),
                    tree.splits.len()
                )));
            }
            for split in &tree.splits {
                if split.feature >= self.features.len() {
                    return Err(ModelError::Invalid(format!(
                        "tree {i} splits on unknown feature index {}",
                        split.feature
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One-hot encoding followed by an averaged forest of binary regression
/// trees (the sklearn pipeline model family).
#[derive(Debug, Deserialize)]
pub struct Pipeline {
    pub features: Vec<String>,
    #[serde(default)]
    pub target_transform: TargetTransform,
    pub vocabulary: HashMap<String, Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl Pipeline {
    pub fn predict(&self, row: &HashMap<&str, &str>) -> f64 {
        let x = one_hot(&self.features, &self.vocabulary, row);
        let total: f64 = self.trees.iter().map(|tree| tree.score(&x)).sum();
        // trees is non-empty after validation
        let raw = total / self.trees.len() as f64;
        self.target_transform.invert(raw)
    }

    fn validate(&self) -> Result<(), ModelError> {
        validate_features(&self.features)?;
        for name in &self.features {
            if !self.vocabulary.contains_key(name) {
                return Err(ModelError::Invalid(format!(
                    "feature `{name}` has no vocabulary"
                )));
            }
        }
        let width: usize = self
            .features
            .iter()
            .map(|name| self.vocabulary[name.as_str()].len())
            .sum();
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("model has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {i} has no nodes")));
            }
            for (at, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= width {
                        return Err(ModelError::Invalid(format!(
                            "tree {i} node {at} tests column {feature} but the one-hot vector has {width}"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= at || child >= tree.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {i} node {at} has out-of-order child {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Artifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ModelError::SchemaVersion {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        match &self.model {
            Model::TreeEnsemble(model) => model.validate(),
            Model::Pipeline(model) => model.validate(),
        }
    }
}

fn validate_features(features: &[String]) -> Result<(), ModelError> {
    if features.is_empty() {
        return Err(ModelError::Invalid("model declares no input features".into()));
    }
    let mut seen = HashSet::new();
    for name in features {
        if !seen.insert(name.as_str()) {
            return Err(ModelError::Invalid(format!(
                "feature `{name}` is declared twice"
            )));
        }
    }
    Ok(())
}
