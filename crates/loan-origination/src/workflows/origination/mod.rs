//! Loan application origination: intake normalization, rule validation, and the
//! classifier-backed decision engine.
//!
//! Stages form a strict pipeline. A failed validation short-circuits before the
//! classifier runs; a missing classifier degrades every decision to a rejection.

pub mod classifier;
pub mod decision;
pub mod domain;
pub mod features;
pub mod intake;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use classifier::{
    load_classifier, ClassLabel, Classifier, DecisionTreeModel, LoadedModel, LogisticModel,
    ModelArtifact, ModelLoadError, ModelSpec, SoftVotingEnsemble, TreeNode,
};
pub use decision::{DecisionEngine, DecisionLabel, DecisionResult, MetricName, RiskMetrics};
pub use domain::{
    ApplicantIdentity, ApplicationId, ApplicationRecord, EmploymentStatus, FinancialProfile,
    HousingStatus, LoanTerm, RawApplication, SupportingDocuments, ValidationResult,
};
pub use features::{
    DocumentPresenceSchema, FeatureSchema, FeatureVector, FinancialProfileSchema, SchemaVersion,
};
pub use intake::IntakeNormalizer;
pub use router::origination_router;
pub use service::{
    LoanOriginationService, ModelStatusView, ModelSummary, OriginationOutcome, OriginationView,
    PipelineStage,
};
pub use validation::ApplicationValidator;
