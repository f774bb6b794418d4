use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::workflows::origination::features::FeatureVector;

/// Flattened tree node. Splits send `value <= threshold` to `left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probability: f64,
    },
}

/// Single decision tree whose leaves carry the approval probability.
///
/// Node 0 is the root and children always sit after their parent, which keeps
/// traversal acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTreeModel {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Structural checks only; column bounds are checked against the active
    /// schema when the artifact is built.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("decision tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {index} points at invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { probability } => {
                    if !(0.0..=1.0).contains(probability) {
                        return Err(format!(
                            "leaf {index} probability {probability} outside [0, 1]"
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Largest column index referenced by any split.
    pub(crate) fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .max()
    }
}

impl Classifier for DecisionTreeModel {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { probability }) => return *probability,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features.value_at(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => break,
            }
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit_stump() -> DecisionTreeModel {
        DecisionTreeModel::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 650.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { probability: 0.2 },
            TreeNode::Leaf { probability: 0.9 },
        ])
    }

    fn credit(score: f64) -> FeatureVector {
        FeatureVector::from_columns(vec![("credit_score", score)])
    }

    #[test]
    fn routes_threshold_values_left() {
        let tree = credit_stump();
        assert_eq!(tree.predict_probability(&credit(650.0)), 0.2);
        assert_eq!(tree.predict_probability(&credit(651.0)), 0.9);
    }

    #[test]
    fn validate_rejects_backward_edges() {
        let tree = DecisionTreeModel::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { probability: 0.5 },
        ]);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn max_feature_reports_widest_split() {
        assert!(credit_stump().validate().is_ok());
        assert_eq!(credit_stump().max_feature(), Some(0));
        assert_eq!(
            DecisionTreeModel::new(vec![TreeNode::Leaf { probability: 0.4 }]).max_feature(),
            None
        );
    }

    #[test]
    fn cyclic_trees_built_in_code_do_not_hang() {
        let tree = DecisionTreeModel::new(vec![TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
        }]);
        assert_eq!(tree.predict_probability(&credit(1.0)), 0.0);
    }
}
