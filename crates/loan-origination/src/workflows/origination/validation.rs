use super::domain::{ApplicationRecord, ValidationResult};
use super::features::SchemaVersion;

const ACCEPTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Static business rules applied before any model is consulted.
///
/// Every rule runs; violations are reported in rule order.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationValidator {
    schema: SchemaVersion,
}

impl ApplicationValidator {
    pub fn new(schema: SchemaVersion) -> Self {
        Self { schema }
    }

    pub fn validate(&self, record: &ApplicationRecord) -> ValidationResult {
        let financials = &record.financials;
        let mut violations = Vec::new();

        if financials.annual_income <= 0.0 {
            violations.push("Annual income must be a valid positive amount.".to_string());
        }

        if financials.loan_amount <= 0.0 {
            violations.push("Requested loan amount must be positive.".to_string());
        }

        match self.schema {
            SchemaVersion::FinancialProfile => {
                if financials.loan_term.is_none() {
                    violations.push("Invalid loan term selected.".to_string());
                }
                if financials.employment_status.is_none() {
                    violations.push("Invalid employment status.".to_string());
                }
            }
            SchemaVersion::DocumentPresence => {
                if let Some(name) = &record.documents.identity_document {
                    if !has_accepted_extension(name) {
                        violations.push(format!(
                            "Identity document '{name}' must be a PDF or image file."
                        ));
                    }
                }
                if let Some(name) = &record.documents.income_proof {
                    if !has_accepted_extension(name) {
                        violations.push(format!(
                            "Income proof '{name}' must be a PDF or image file."
                        ));
                    }
                }
            }
        }

        ValidationResult::from_violations(violations)
    }
}

fn has_accepted_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| {
            ACCEPTED_DOCUMENT_EXTENSIONS
                .iter()
                .any(|accepted| extension.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}
