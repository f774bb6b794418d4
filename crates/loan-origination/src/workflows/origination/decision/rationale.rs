use crate::workflows::origination::domain::{ApplicationRecord, EmploymentStatus, HousingStatus};
use crate::workflows::origination::features::SchemaVersion;

use super::DecisionLabel;

pub(crate) const MODEL_UNAVAILABLE: &str = "System Error: decision model unavailable";
pub(crate) const VALIDATION_FAILED: &str = "Application failed validation.";

const APPROVED_PREAMBLE: &str = "Loan origination approved!";
const REJECTED_PREAMBLE: &str = "Loan request failed.";

const HIGH_DTI_RATIO: f64 = 0.4;
const RISKY_CREDIT_BELOW: i64 = 650;
const EXCELLENT_CREDIT_ABOVE: i64 = 700;

const ALL_SCHEMAS: &[SchemaVersion] = &[
    SchemaVersion::DocumentPresence,
    SchemaVersion::FinancialProfile,
];
const FINANCIAL_PROFILE_ONLY: &[SchemaVersion] = &[SchemaVersion::FinancialProfile];
const DOCUMENT_PRESENCE_ONLY: &[SchemaVersion] = &[SchemaVersion::DocumentPresence];

/// Display-only explanation attached after the headline when `applies` holds.
///
/// A rule only fires under its own label, so it can never argue against the
/// model's decision.
pub(crate) struct RationaleRule {
    pub(crate) label: DecisionLabel,
    pub(crate) schemas: &'static [SchemaVersion],
    pub(crate) applies: fn(&ApplicationRecord) -> bool,
    pub(crate) text: &'static str,
}

/// Evaluated top to bottom; emission order follows table order.
pub(crate) const RATIONALE_RULES: &[RationaleRule] = &[
    RationaleRule {
        label: DecisionLabel::Approved,
        schemas: FINANCIAL_PROFILE_ONLY,
        applies: stable_household,
        text: "Stable employment and homeownership strongly contributed to the decision.",
    },
    RationaleRule {
        label: DecisionLabel::Approved,
        schemas: ALL_SCHEMAS,
        applies: excellent_credit_without_stable_household,
        text: "Excellent credit history drove a favorable outcome.",
    },
    RationaleRule {
        label: DecisionLabel::Approved,
        schemas: DOCUMENT_PRESENCE_ONLY,
        applies: complete_documentation,
        text: "Complete supporting documentation strengthened the application.",
    },
    RationaleRule {
        label: DecisionLabel::Rejected,
        schemas: FINANCIAL_PROFILE_ONLY,
        applies: unemployed,
        text: "Lack of current employment flagged as high risk.",
    },
    RationaleRule {
        label: DecisionLabel::Rejected,
        schemas: ALL_SCHEMAS,
        applies: risky_credit,
        text: "Credit score is deemed too risky by the algorithm.",
    },
    RationaleRule {
        label: DecisionLabel::Rejected,
        schemas: ALL_SCHEMAS,
        applies: high_debt_to_income,
        text: "Debt-to-income ratio exceeds acceptable thresholds.",
    },
    RationaleRule {
        label: DecisionLabel::Rejected,
        schemas: DOCUMENT_PRESENCE_ONLY,
        applies: missing_identity_document,
        text: "Missing proof of identity weighed against the application.",
    },
    RationaleRule {
        label: DecisionLabel::Rejected,
        schemas: DOCUMENT_PRESENCE_ONLY,
        applies: missing_income_proof,
        text: "Missing proof of income weighed against the application.",
    },
];

/// Headline sentence quoting the confidence of the side the label landed on.
pub(crate) fn headline(label: DecisionLabel, approval_percent: f64) -> String {
    match label {
        DecisionLabel::Approved => {
            format!("Model approved application with {approval_percent:.1}% confidence.")
        }
        DecisionLabel::Rejected => format!(
            "Model rejected application (confidence: {:.1}%).",
            100.0 - approval_percent
        ),
    }
}

pub(crate) fn secondary(
    label: DecisionLabel,
    schema: SchemaVersion,
    record: &ApplicationRecord,
) -> Vec<String> {
    RATIONALE_RULES
        .iter()
        .filter(|rule| rule.label == label && rule.schemas.contains(&schema))
        .filter(|rule| (rule.applies)(record))
        .map(|rule| rule.text.to_string())
        .collect()
}

pub(crate) fn remarks(label: DecisionLabel, rationale: &[String]) -> String {
    let preamble = match label {
        DecisionLabel::Approved => APPROVED_PREAMBLE,
        DecisionLabel::Rejected => REJECTED_PREAMBLE,
    };

    if rationale.is_empty() {
        preamble.to_string()
    } else {
        format!("{preamble} {}", rationale.join(" "))
    }
}

fn stable_household(record: &ApplicationRecord) -> bool {
    record.financials.employment_status == Some(EmploymentStatus::Employed)
        && record.financials.housing_status == Some(HousingStatus::Own)
}

fn excellent_credit_without_stable_household(record: &ApplicationRecord) -> bool {
    record.financials.credit_score > EXCELLENT_CREDIT_ABOVE && !stable_household(record)
}

fn complete_documentation(record: &ApplicationRecord) -> bool {
    record.documents.has_identity_document() && record.documents.has_income_proof()
}

fn unemployed(record: &ApplicationRecord) -> bool {
    record.financials.employment_status == Some(EmploymentStatus::Unemployed)
}

fn risky_credit(record: &ApplicationRecord) -> bool {
    record.financials.credit_score < RISKY_CREDIT_BELOW
}

fn high_debt_to_income(record: &ApplicationRecord) -> bool {
    record.financials.debt_to_income() > HIGH_DTI_RATIO
}

fn missing_identity_document(record: &ApplicationRecord) -> bool {
    !record.documents.has_identity_document()
}

fn missing_income_proof(record: &ApplicationRecord) -> bool {
    !record.documents.has_income_proof()
}
