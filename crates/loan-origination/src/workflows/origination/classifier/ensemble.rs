use std::sync::Arc;

use super::Classifier;
use crate::workflows::origination::features::FeatureVector;

/// Averages approval probabilities across member estimators before voting.
pub struct SoftVotingEnsemble {
    members: Vec<(Arc<dyn Classifier>, f64)>,
}

impl SoftVotingEnsemble {
    /// Equal-weight ensemble.
    pub fn new(members: Vec<Arc<dyn Classifier>>) -> Self {
        Self {
            members: members.into_iter().map(|member| (member, 1.0)).collect(),
        }
    }

    pub fn weighted(members: Vec<(Arc<dyn Classifier>, f64)>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Classifier for SoftVotingEnsemble {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let (weighted_sum, total_weight) = self.members.iter().fold(
            (0.0, 0.0),
            |(sum, total), (member, weight)| {
                (
                    sum + weight * member.predict_probability(features),
                    total + weight,
                )
            },
        );

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }
}
