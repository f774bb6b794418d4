use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Classifier, DecisionTreeModel, LogisticModel, SoftVotingEnsemble};
use crate::workflows::origination::features::SchemaVersion;

/// Serialized classifier as written by the training toolchain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub model: ModelSpec,
}

/// Estimator description, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Logistic(LogisticModel),
    DecisionTree(DecisionTreeModel),
    SoftVoting {
        estimators: Vec<ModelSpec>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
}

impl ModelSpec {
    /// Build the estimator, checking it against the column count of `schema`.
    pub fn build(&self, schema: SchemaVersion) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        let column_count = schema.schema().columns().len();

        match self {
            ModelSpec::Logistic(model) => {
                model.validate().map_err(ModelLoadError::InvalidModel)?;
                if model.coefficients.len() != column_count {
                    return Err(ModelLoadError::ColumnMismatch {
                        schema,
                        expected: column_count,
                        found: model.coefficients.len(),
                    });
                }
                Ok(Arc::new(model.clone()))
            }
            ModelSpec::DecisionTree(tree) => {
                if let Some(max_feature) = tree.max_feature() {
                    if max_feature >= column_count {
                        return Err(ModelLoadError::ColumnMismatch {
                            schema,
                            expected: column_count,
                            found: max_feature + 1,
                        });
                    }
                }
                tree.validate().map_err(ModelLoadError::InvalidModel)?;
                Ok(Arc::new(tree.clone()))
            }
            ModelSpec::SoftVoting {
                estimators,
                weights,
            } => {
                if estimators.is_empty() {
                    return Err(ModelLoadError::InvalidModel(
                        "soft voting ensemble has no estimators".to_string(),
                    ));
                }

                let weights = match weights {
                    Some(weights) if weights.len() != estimators.len() => {
                        return Err(ModelLoadError::InvalidModel(format!(
                            "soft voting ensemble has {} weights for {} estimators",
                            weights.len(),
                            estimators.len()
                        )));
                    }
                    Some(weights) => weights.clone(),
                    None => vec![1.0; estimators.len()],
                };
                if weights
                    .iter()
                    .any(|weight| !weight.is_finite() || *weight < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(ModelLoadError::InvalidModel(
                        "soft voting weights must be non-negative with a positive sum".to_string(),
                    ));
                }

                let mut members = Vec::with_capacity(estimators.len());
                for (estimator, weight) in estimators.iter().zip(weights) {
                    members.push((estimator.build(schema)?, weight));
                }

                Ok(Arc::new(SoftVotingEnsemble::weighted(members)))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            ModelSpec::Logistic(_) => "logistic".to_string(),
            ModelSpec::DecisionTree(_) => "decision_tree".to_string(),
            ModelSpec::SoftVoting { estimators, .. } => {
                format!("soft_voting[{}]", estimators.len())
            }
        }
    }
}

/// A classifier ready to serve, with the metadata reported by the service.
#[derive(Clone)]
pub struct LoadedModel {
    pub name: String,
    pub version: Option<String>,
    pub kind: String,
    pub schema: SchemaVersion,
    pub classifier: Arc<dyn Classifier>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("kind", &self.kind)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl ModelArtifact {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn into_loaded(self, schema: SchemaVersion) -> Result<LoadedModel, ModelLoadError> {
        let classifier = self.model.build(schema)?;
        Ok(LoadedModel {
            kind: self.model.describe(),
            name: self.name,
            version: self.version,
            schema,
            classifier,
        })
    }
}

/// Load the classifier artifact once at startup.
///
/// A missing file is not an error: the decision engine runs without a model and
/// rejects every application until one is deployed.
pub fn load_classifier(
    path: &Path,
    schema: SchemaVersion,
) -> Result<Option<LoadedModel>, ModelLoadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "classifier artifact not found; decisions fall back to rejection"
            );
            return Ok(None);
        }
        Err(source) => {
            return Err(ModelLoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let artifact = ModelArtifact::from_json(&contents).map_err(|source| ModelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = artifact.into_loaded(schema)?;

    info!(
        name = %loaded.name,
        version = loaded.version.as_deref().unwrap_or("unversioned"),
        kind = %loaded.kind,
        %schema,
        "classifier artifact loaded"
    );

    Ok(Some(loaded))
}

/// Failure raised while loading a classifier artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read classifier artifact {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("classifier artifact {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("classifier expects {found} columns but schema {schema} provides {expected}")]
    ColumnMismatch {
        schema: SchemaVersion,
        expected: usize,
        found: usize,
    },
    #[error("invalid classifier: {0}")]
    InvalidModel(String),
}
