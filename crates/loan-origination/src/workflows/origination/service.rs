use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use super::classifier::{load_classifier, Classifier, LoadedModel, ModelLoadError};
use super::decision::{DecisionEngine, DecisionLabel, DecisionResult, RiskMetrics};
use super::domain::{ApplicationId, ApplicationRecord, RawApplication, ValidationResult};
use super::features::SchemaVersion;
use super::intake::IntakeNormalizer;
use super::validation::ApplicationValidator;
use crate::config::DecisionConfig;

/// Pipeline composing intake, validation, and the decision engine.
pub struct LoanOriginationService {
    normalizer: IntakeNormalizer,
    validator: ApplicationValidator,
    engine: Arc<DecisionEngine>,
    model: Option<ModelSummary>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("APP-{}-{id:04}", Local::now().format("%y%m%d")))
}

impl LoanOriginationService {
    pub fn new(schema: SchemaVersion, model: Option<LoadedModel>) -> Self {
        let engine = DecisionEngine::from_loaded(schema, model.as_ref());
        Self {
            normalizer: IntakeNormalizer,
            validator: ApplicationValidator::new(schema),
            engine: Arc::new(engine),
            model: model.map(|loaded| ModelSummary {
                name: loaded.name,
                version: loaded.version,
                kind: loaded.kind,
            }),
        }
    }

    /// Build around an in-process classifier, bypassing artifact loading.
    pub fn with_classifier(schema: SchemaVersion, classifier: Option<Arc<dyn Classifier>>) -> Self {
        let model = classifier.as_ref().map(|_| ModelSummary {
            name: "in-process".to_string(),
            version: None,
            kind: "custom".to_string(),
        });
        Self {
            normalizer: IntakeNormalizer,
            validator: ApplicationValidator::new(schema),
            engine: Arc::new(DecisionEngine::new(schema.schema(), classifier)),
            model,
        }
    }

    /// Load the configured artifact once and assemble the pipeline around it.
    pub fn from_config(config: &DecisionConfig) -> Result<Self, ModelLoadError> {
        let model = load_classifier(&config.model_path, config.feature_schema)?;
        Ok(Self::new(config.feature_schema, model))
    }

    /// Run one application through the pipeline. Validation failures stop
    /// before the classifier is consulted.
    pub fn process(&self, raw: &RawApplication) -> OriginationOutcome {
        let record = self.normalizer.normalize(raw);
        let validation = self.validator.validate(&record);
        let application_id = next_application_id();

        let (stage, decision) = if validation.is_valid {
            (
                PipelineStage::Decision,
                self.engine.decide(&record, &validation),
            )
        } else {
            (
                PipelineStage::Validation,
                DecisionResult::validation_rejected(&validation),
            )
        };

        info!(
            application_id = %application_id.0,
            stage = stage.label(),
            decision = decision.label.label(),
            "application processed"
        );

        OriginationOutcome {
            application_id,
            stage,
            record,
            validation,
            decision,
        }
    }

    pub fn model_status(&self) -> ModelStatusView {
        let schema = self.engine.schema();
        ModelStatusView {
            schema: schema.version(),
            columns: schema.columns().to_vec(),
            loaded: self.engine.has_classifier(),
            model: self.model.clone(),
        }
    }
}

/// Pipeline stage that produced the final outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validation,
    Decision,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            PipelineStage::Validation => "validation",
            PipelineStage::Decision => "decision",
        }
    }
}

/// Everything the pipeline learned about one application.
#[derive(Debug, Clone)]
pub struct OriginationOutcome {
    pub application_id: ApplicationId,
    pub stage: PipelineStage,
    pub record: ApplicationRecord,
    pub validation: ValidationResult,
    pub decision: DecisionResult,
}

impl OriginationOutcome {
    pub fn status_view(&self) -> OriginationView {
        OriginationView {
            application_id: self.application_id.clone(),
            status: self.decision.label,
            stage: self.stage,
            remarks: self.decision.remarks.clone(),
            rationale: self.decision.rationale.clone(),
            metrics: self.decision.metrics.clone(),
        }
    }
}

/// Response body returned to the origination front end.
#[derive(Debug, Clone, Serialize)]
pub struct OriginationView {
    pub application_id: ApplicationId,
    pub status: DecisionLabel,
    pub stage: PipelineStage,
    pub remarks: String,
    pub rationale: Vec<String>,
    pub metrics: RiskMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub kind: String,
}

/// Which schema is active and whether a classifier backs it.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatusView {
    pub schema: SchemaVersion,
    pub columns: Vec<&'static str>,
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSummary>,
}
