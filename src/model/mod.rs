mod artifact;
mod encoder;
mod trees;

pub use artifact::{Artifact, Model, Pipeline, TargetTransform, TreeEnsemble, SCHEMA_VERSION};
pub use encoder::TargetEncoder;
pub use trees::{DecisionTree, Node, ObliviousTree, Split, MAX_TREE_DEPTH};

use std::collections::HashMap;
use std::path::Path;

use crate::error::ModelError;

/// A trained salary model, loaded once at startup and shared read-only
/// across request handlers for the lifetime of the process.
#[derive(Debug)]
pub struct SalaryModel {
    artifact: Artifact,
}

impl SalaryModel {
    /// Deserialize and validate an artifact from disk. Any error here is
    /// fatal to the caller: the server must not come up without a working
    /// model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse an artifact from its JSON text. Split out of [`Self::load`] so
    /// tests can build models without touching the filesystem.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: Artifact = serde_json::from_str(raw)?;
        artifact.validate()?;
        Ok(SalaryModel { artifact })
    }

    /// Ordered list of input fields this model requires on every request.
    pub fn features(&self) -> &[String] {
        match &self.artifact.model {
            Model::TreeEnsemble(model) => &model.features,
            Model::Pipeline(model) => &model.features,
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.artifact.model {
            Model::TreeEnsemble(_) => "tree_ensemble",
            Model::Pipeline(_) => "pipeline",
        }
    }

    pub fn target_transform(&self) -> TargetTransform {
        match &self.artifact.model {
            Model::TreeEnsemble(model) => model.target_transform,
            Model::Pipeline(model) => model.target_transform,
        }
    }

    /// Predict the mean salary for one row of categorical inputs. Unseen
    /// category values take the model's unknown-category fallback, so this
    /// never fails on odd input.
    pub fn point_estimate(&self, row: &HashMap<&str, &str>) -> f64 {
        match &self.artifact.model {
            Model::TreeEnsemble(model) => model.predict(row),
            Model::Pipeline(model) => model.predict(row),
        }
    }
}
