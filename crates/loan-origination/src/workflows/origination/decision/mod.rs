mod metrics;
pub(crate) mod rationale;

pub use metrics::{MetricName, RiskMetrics};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classifier::{ClassLabel, Classifier, LoadedModel};
use super::domain::{ApplicationRecord, ValidationResult};
use super::features::{FeatureSchema, SchemaVersion};

/// Final approve/reject outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionLabel {
    Approved,
    Rejected,
}

impl DecisionLabel {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionLabel::Approved => "Approved",
            DecisionLabel::Rejected => "Rejected",
        }
    }
}

impl From<ClassLabel> for DecisionLabel {
    fn from(value: ClassLabel) -> Self {
        match value {
            ClassLabel::Approve => DecisionLabel::Approved,
            ClassLabel::Reject => DecisionLabel::Rejected,
        }
    }
}

/// Decision with its rationale trail and display metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub label: DecisionLabel,
    pub rationale: Vec<String>,
    pub metrics: RiskMetrics,
    pub remarks: String,
}

impl DecisionResult {
    fn new(label: DecisionLabel, rationale: Vec<String>, metrics: RiskMetrics) -> Self {
        let remarks = rationale::remarks(label, &rationale);
        Self {
            label,
            rationale,
            metrics,
            remarks,
        }
    }

    /// Rejection carrying the validator's reasons instead of model output.
    /// Remarks are the validator's own " | "-joined summary.
    pub fn validation_rejected(validation: &ValidationResult) -> Self {
        if validation.violations.is_empty() {
            return Self::new(
                DecisionLabel::Rejected,
                vec![rationale::VALIDATION_FAILED.to_string()],
                RiskMetrics::empty(),
            );
        }

        Self {
            label: DecisionLabel::Rejected,
            rationale: validation.violations.clone(),
            metrics: RiskMetrics::empty(),
            remarks: validation.remarks(),
        }
    }

    fn model_unavailable() -> Self {
        Self::new(
            DecisionLabel::Rejected,
            vec![rationale::MODEL_UNAVAILABLE.to_string()],
            RiskMetrics::empty(),
        )
    }
}

/// Stateless decision stage over an optional, shared classifier.
///
/// The feature schema must be the one the classifier was trained on; nothing at
/// runtime can detect a mismatch.
pub struct DecisionEngine {
    schema: Arc<dyn FeatureSchema>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl DecisionEngine {
    pub fn new(schema: Arc<dyn FeatureSchema>, classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self { schema, classifier }
    }

    pub fn from_loaded(schema: SchemaVersion, model: Option<&LoadedModel>) -> Self {
        Self::new(
            schema.schema(),
            model.map(|loaded| Arc::clone(&loaded.classifier)),
        )
    }

    pub fn schema(&self) -> &dyn FeatureSchema {
        self.schema.as_ref()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Decide a validated application. Never fails: a failed validation or a
    /// missing classifier both produce a rejection.
    pub fn decide(&self, record: &ApplicationRecord, validation: &ValidationResult) -> DecisionResult {
        if !validation.is_valid {
            debug!(
                violations = validation.violations.len(),
                "decision requested for an application that failed validation"
            );
            return DecisionResult::validation_rejected(validation);
        }

        let Some(classifier) = &self.classifier else {
            warn!("decision model unavailable; rejecting application");
            return DecisionResult::model_unavailable();
        };

        let features = self.schema.build(record);
        let raw_probability = classifier.predict_probability(&features);
        let probability = metrics::clamp_unit(raw_probability);
        // A classifier emitting a non-finite probability cannot approve.
        let label = if raw_probability.is_finite() {
            DecisionLabel::from(classifier.predict(&features))
        } else {
            DecisionLabel::Rejected
        };
        let approval_percent = probability * 100.0;

        let label_confidence = match label {
            DecisionLabel::Approved => probability,
            DecisionLabel::Rejected => 1.0 - probability,
        };

        let mut reasons = vec![rationale::headline(label, approval_percent)];
        reasons.extend(rationale::secondary(label, self.schema.version(), record));

        let metrics = metrics::compute(&record.financials, label_confidence);

        debug!(
            label = label.label(),
            probability,
            schema = %self.schema.version(),
            reasons = reasons.len(),
            "classifier decision"
        );

        DecisionResult::new(label, reasons, metrics)
    }
}
