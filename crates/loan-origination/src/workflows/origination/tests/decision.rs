use std::sync::Arc;

use super::common::*;
use crate::workflows::origination::classifier::Classifier;
use crate::workflows::origination::decision::{DecisionLabel, MetricName};
use crate::workflows::origination::domain::ValidationResult;
use crate::workflows::origination::features::{FeatureVector, SchemaVersion};
use serde_json::json;

fn passing() -> ValidationResult {
    ValidationResult::from_violations(Vec::new())
}

const APPROVAL_FRAMED: &[&str] = &[
    "stable employment",
    "excellent credit",
    "complete supporting documentation",
    "approved application",
];

const REJECTION_FRAMED: &[&str] = &[
    "lack of current employment",
    "too risky",
    "debt-to-income",
    "missing proof",
    "rejected application",
];

#[test]
fn approves_strong_applicant_with_homeownership_rationale() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::approving(0.92)),
    );

    let result = engine.decide(&record(&strong_application()), &passing());

    assert_eq!(result.label, DecisionLabel::Approved);
    assert!(result.rationale[0].contains("92.0%"));
    assert!(contains_text(
        &result.rationale,
        "stable employment and homeownership"
    ));
    assert!(!contains_text(&result.rationale, "excellent credit"));
    assert_eq!(result.metrics.get(MetricName::CreditScore), Some(0.82));
    assert_eq!(result.metrics.get(MetricName::Confidence), Some(0.92));
    assert_eq!(result.metrics.get(MetricName::EmploymentScore), Some(1.0));
    assert!(result.remarks.starts_with("Loan origination approved! "));
    assert!(result.remarks.ends_with(result.rationale.last().expect("rationale")));
}

#[test]
fn rejects_weak_applicant_with_itemized_risks() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::rejecting(0.10)),
    );

    let result = engine.decide(&record(&weak_application()), &passing());

    assert_eq!(result.label, DecisionLabel::Rejected);
    assert!(result.rationale[0].contains("90.0%"));
    assert_eq!(result.rationale.len(), 4);
    assert!(contains_text(&result.rationale[1..], "lack of current employment"));
    assert!(contains_text(&result.rationale[2..], "too risky"));
    assert!(contains_text(
        &result.rationale[3..],
        "debt-to-income ratio exceeds acceptable thresholds"
    ));
    assert_eq!(result.metrics.get(MetricName::DtiScore), Some(0.0));
    assert_eq!(result.metrics.get(MetricName::EmploymentScore), Some(0.0));
    assert_eq!(result.metrics.get(MetricName::Confidence), Some(0.9));
    assert!(result.remarks.starts_with("Loan request failed. "));
}

#[test]
fn missing_classifier_always_rejects_without_metrics() {
    let engine = engine_with(SchemaVersion::FinancialProfile, None);

    for application in [strong_application(), weak_application()] {
        let result = engine.decide(&record(&application), &passing());

        assert_eq!(result.label, DecisionLabel::Rejected);
        assert!(result.remarks.contains("System Error"));
        assert!(result.metrics.is_empty());
        assert_eq!(result.rationale.len(), 1);
    }
}

#[test]
fn credit_metric_spans_floor_to_ceiling() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::approving(0.7)),
    );

    let floor = engine.decide(
        &record(&strong_application().with("credit_score", 300)),
        &passing(),
    );
    let ceiling = engine.decide(
        &record(&strong_application().with("credit_score", 850)),
        &passing(),
    );

    assert_eq!(floor.metrics.get(MetricName::CreditScore), Some(0.0));
    assert_eq!(ceiling.metrics.get(MetricName::CreditScore), Some(1.0));
}

#[test]
fn failed_validation_never_reaches_the_classifier() {
    let stub = StubClassifier::approving(0.99);
    let engine = engine_with(SchemaVersion::FinancialProfile, loaded(stub.clone()));
    let validation = ValidationResult::from_violations(vec![
        "Invalid loan term selected.".to_string(),
    ]);

    let result = engine.decide(&record(&strong_application()), &validation);

    assert_eq!(stub.calls(), 0);
    assert_eq!(result.label, DecisionLabel::Rejected);
    assert_eq!(result.rationale, vec!["Invalid loan term selected.".to_string()]);
    assert!(result.metrics.is_empty());
}

#[test]
fn excellent_credit_rationale_applies_without_homeownership() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::approving(0.81)),
    );
    let application = strong_application().with("housing_status", 0);

    let result = engine.decide(&record(&application), &passing());

    assert!(contains_text(&result.rationale, "excellent credit history"));
    assert!(!contains_text(&result.rationale, "homeownership"));
}

#[test]
fn rationale_never_contradicts_the_label() {
    let cases = [
        (StubClassifier::approving(0.55), weak_application()),
        (StubClassifier::rejecting(0.45), strong_application()),
        (StubClassifier::approving(0.97), strong_application()),
        (StubClassifier::rejecting(0.02), weak_application()),
    ];

    for (stub, application) in cases {
        let engine = engine_with(SchemaVersion::FinancialProfile, loaded(stub));
        let result = engine.decide(&record(&application), &passing());

        let forbidden = match result.label {
            DecisionLabel::Approved => REJECTION_FRAMED,
            DecisionLabel::Rejected => APPROVAL_FRAMED,
        };
        for phrase in forbidden {
            assert!(
                !contains_text(&result.rationale, phrase),
                "{:?} decision carried '{phrase}': {:?}",
                result.label,
                result.rationale
            );
        }
    }
}

#[test]
fn credit_metric_is_monotonic_in_credit_score() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::approving(0.6)),
    );

    let mut previous = f64::NEG_INFINITY;
    for score in (250..=900).step_by(25) {
        let result = engine.decide(
            &record(&strong_application().with("credit_score", score)),
            &passing(),
        );
        let metric = result
            .metrics
            .get(MetricName::CreditScore)
            .expect("credit metric");
        assert!(metric >= previous, "credit metric fell at {score}");
        previous = metric;
    }
}

#[test]
fn dti_metric_never_rises_with_loan_amount() {
    let engine = engine_with(
        SchemaVersion::FinancialProfile,
        loaded(StubClassifier::rejecting(0.3)),
    );

    let mut previous = f64::INFINITY;
    for loan_amount in (0..=120_000).step_by(5_000) {
        let result = engine.decide(
            &record(&strong_application().with("loan_amount", loan_amount)),
            &passing(),
        );
        let metric = result.metrics.get(MetricName::DtiScore).expect("dti metric");
        assert!(metric <= previous, "dti metric rose at {loan_amount}");
        previous = metric;
    }
}

struct Misbehaving(f64);

impl Classifier for Misbehaving {
    fn predict_probability(&self, _features: &FeatureVector) -> f64 {
        self.0
    }
}

#[test]
fn metrics_stay_within_unit_interval_for_extreme_inputs() {
    let applications = [
        raw(json!({ "annual_income": 0.5, "loan_amount": 1e12, "credit_score": -40 })),
        raw(json!({ "annual_income": 1e12, "loan_amount": -5, "credit_score": 10_000 })),
        strong_application(),
    ];

    for probability in [f64::NAN, -3.0, 7.5, 0.5] {
        let engine = engine_with(
            SchemaVersion::FinancialProfile,
            loaded(Arc::new(Misbehaving(probability))),
        );
        for application in &applications {
            let result = engine.decide(&record(application), &passing());
            assert_eq!(result.metrics.len(), 4);
            for (name, value) in result.metrics.iter() {
                assert!(
                    (0.0..=1.0).contains(&value),
                    "{name:?} = {value} for probability {probability}"
                );
            }
        }
    }
}

#[test]
fn non_finite_probabilities_never_approve() {
    for probability in [f64::INFINITY, f64::NAN] {
        let engine = engine_with(
            SchemaVersion::FinancialProfile,
            loaded(Arc::new(Misbehaving(probability))),
        );

        let result = engine.decide(&record(&strong_application()), &passing());

        assert_eq!(result.label, DecisionLabel::Rejected, "probability {probability}");
        assert!(result.rationale[0].starts_with("Model rejected application"));
        assert!(result.rationale[0].contains("100.0%"));
        assert!(result.metrics.iter().all(|(_, value)| (0.0..=1.0).contains(&value)));
    }
}

#[test]
fn classifier_receives_financial_profile_columns_in_order() {
    let recorder = Arc::new(RecordingClassifier::default());
    let engine = engine_with(SchemaVersion::FinancialProfile, loaded(recorder.clone()));

    engine.decide(&record(&weak_application()), &passing());

    let seen = recorder.seen();
    let features = seen.first().expect("classifier consulted");
    assert_eq!(
        features.names().collect::<Vec<_>>(),
        vec![
            "annual_income",
            "loan_amount",
            "credit_score",
            "employment_status",
            "housing_status",
            "loan_term"
        ]
    );
    assert_eq!(
        features.values().collect::<Vec<_>>(),
        vec![25_000.0, 80_000.0, 400.0, 0.0, 0.0, 60.0]
    );
}

#[test]
fn document_schema_feeds_presence_flags() {
    let recorder = Arc::new(RecordingClassifier::default());
    let engine = engine_with(SchemaVersion::DocumentPresence, loaded(recorder.clone()));
    let application = documented_application().with("income_doc_name", "");

    engine.decide(&record(&application), &passing());

    let seen = recorder.seen();
    let features = seen.first().expect("classifier consulted");
    assert_eq!(features.len(), 5);
    assert_eq!(features.get("has_identity_doc"), Some(1.0));
    assert_eq!(features.get("has_income_proof"), Some(0.0));
    assert_eq!(features.get("employment_status"), None);
}

#[test]
fn document_schema_explains_missing_proofs() {
    let engine = engine_with(
        SchemaVersion::DocumentPresence,
        loaded(StubClassifier::rejecting(0.2)),
    );
    let application = raw(json!({
        "annual_income": 40000,
        "loan_amount": 30000,
        "credit_score": 610
    }));

    let result = engine.decide(&record(&application), &passing());

    assert!(contains_text(&result.rationale, "missing proof of identity"));
    assert!(contains_text(&result.rationale, "missing proof of income"));
    assert!(contains_text(&result.rationale, "too risky"));
    assert!(!contains_text(&result.rationale, "lack of current employment"));
}

#[test]
fn document_schema_credits_complete_documentation() {
    let engine = engine_with(
        SchemaVersion::DocumentPresence,
        loaded(StubClassifier::approving(0.88)),
    );

    let result = engine.decide(&record(&documented_application()), &passing());

    assert_eq!(result.label, DecisionLabel::Approved);
    assert!(contains_text(
        &result.rationale,
        "complete supporting documentation"
    ));
    assert!(contains_text(&result.rationale, "excellent credit history"));
}
