use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::origination::classifier::{ClassLabel, Classifier};
use crate::workflows::origination::decision::DecisionEngine;
use crate::workflows::origination::domain::{ApplicationRecord, RawApplication};
use crate::workflows::origination::features::{FeatureVector, SchemaVersion};
use crate::workflows::origination::intake::IntakeNormalizer;
use crate::workflows::origination::service::LoanOriginationService;

/// Classifier returning a fixed class and approval probability.
pub(super) struct StubClassifier {
    label: ClassLabel,
    probability: f64,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn new(label: ClassLabel, probability: f64) -> Arc<Self> {
        Arc::new(Self {
            label,
            probability,
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn approving(probability: f64) -> Arc<Self> {
        Self::new(ClassLabel::Approve, probability)
    }

    pub(super) fn rejecting(probability: f64) -> Arc<Self> {
        Self::new(ClassLabel::Reject, probability)
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn predict_probability(&self, _features: &FeatureVector) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probability
    }

    fn predict(&self, _features: &FeatureVector) -> ClassLabel {
        self.label
    }
}

/// Records every feature vector it is asked to score.
#[derive(Default)]
pub(super) struct RecordingClassifier {
    seen: std::sync::Mutex<Vec<FeatureVector>>,
}

impl RecordingClassifier {
    pub(super) fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().expect("recording mutex poisoned").clone()
    }
}

impl Classifier for RecordingClassifier {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        self.seen
            .lock()
            .expect("recording mutex poisoned")
            .push(features.clone());
        0.75
    }
}

pub(super) fn raw(value: Value) -> RawApplication {
    serde_json::from_value(value).expect("raw application is a JSON object")
}

/// Well-qualified applicant: employed homeowner with a small loan.
pub(super) fn strong_application() -> RawApplication {
    raw(json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane@dt.com",
        "annual_income": 150000,
        "loan_amount": 10000,
        "credit_score": 750,
        "employment_status": 2,
        "housing_status": 2,
        "loan_term": 12
    }))
}

/// Unemployed renter asking for three times their income.
pub(super) fn weak_application() -> RawApplication {
    raw(json!({
        "first_name": "John",
        "last_name": "Smith",
        "email": "john@dt.com",
        "annual_income": "25000",
        "loan_amount": "80000",
        "credit_score": "400",
        "employment_status": "0",
        "housing_status": "0",
        "loan_term": "60"
    }))
}

/// Document-presence generation submission with both proofs attached.
pub(super) fn documented_application() -> RawApplication {
    raw(json!({
        "first_name": "Ada",
        "last_name": "Byron",
        "email": "ada@dt.com",
        "annual_income": 98000,
        "loan_amount": 12000,
        "credit_score": 735,
        "identity_doc_name": "passport.pdf",
        "income_doc_name": "paystub.png"
    }))
}

pub(super) fn record(raw: &RawApplication) -> ApplicationRecord {
    IntakeNormalizer.normalize(raw)
}

pub(super) fn loaded<C: Classifier + 'static>(classifier: Arc<C>) -> Option<Arc<dyn Classifier>> {
    let shared: Arc<dyn Classifier> = classifier;
    Some(shared)
}

pub(super) fn engine_with(
    schema: SchemaVersion,
    classifier: Option<Arc<dyn Classifier>>,
) -> DecisionEngine {
    DecisionEngine::new(schema.schema(), classifier)
}

pub(super) fn service_with(classifier: Arc<dyn Classifier>) -> LoanOriginationService {
    LoanOriginationService::with_classifier(SchemaVersion::FinancialProfile, Some(classifier))
}

pub(super) fn contains_text(lines: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    lines.iter().any(|line| line.to_lowercase().contains(&needle))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
