//! Binary approval classifiers and the artifact loader that builds them.
//!
//! Every estimator answers the same two questions: which class a feature vector
//! belongs to and how much probability mass lands on approval. Implementations
//! are immutable once constructed and shared across requests behind an `Arc`.

mod artifact;
mod ensemble;
mod logistic;
mod tree;

pub use artifact::{load_classifier, LoadedModel, ModelArtifact, ModelLoadError, ModelSpec};
pub use ensemble::SoftVotingEnsemble;
pub use logistic::LogisticModel;
pub use tree::{DecisionTreeModel, TreeNode};

use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

/// Probability at or above which an estimator votes for approval.
pub const APPROVAL_THRESHOLD: f64 = 0.5;

/// Class predicted by a binary classifier; `Approve` is class 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    Reject,
    Approve,
}

impl ClassLabel {
    /// Non-finite probabilities never approve.
    pub fn from_probability(probability: f64) -> Self {
        if probability.is_finite() && probability >= APPROVAL_THRESHOLD {
            ClassLabel::Approve
        } else {
            ClassLabel::Reject
        }
    }
}

/// Pre-trained binary classifier over a fixed feature layout.
pub trait Classifier: Send + Sync {
    /// Probability assigned to class 1 (approval).
    fn predict_probability(&self, features: &FeatureVector) -> f64;

    fn predict(&self, features: &FeatureVector) -> ClassLabel {
        ClassLabel::from_probability(self.predict_probability(features))
    }
}
