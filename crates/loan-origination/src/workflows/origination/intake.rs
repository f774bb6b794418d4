use serde_json::Value;

use super::domain::{
    ApplicantIdentity, ApplicationRecord, EmploymentStatus, FinancialProfile, HousingStatus,
    LoanTerm, RawApplication, SupportingDocuments,
};

/// Converts posted form fields into an `ApplicationRecord`.
///
/// Never fails: unparseable numbers fall back to zero and unrecognized codes are
/// left empty for the validator to report.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeNormalizer;

impl IntakeNormalizer {
    pub fn normalize(&self, raw: &RawApplication) -> ApplicationRecord {
        let applicant = ApplicantIdentity {
            first_name: text_field(raw, &["first_name"]),
            last_name: text_field(raw, &["last_name"]),
            email: text_field(raw, &["email"]),
        };

        let financials = FinancialProfile {
            annual_income: number_field(raw, "annual_income").unwrap_or(0.0),
            loan_amount: number_field(raw, "loan_amount").unwrap_or(0.0),
            credit_score: integer_field(raw, "credit_score").unwrap_or(0),
            employment_status: integer_field(raw, "employment_status")
                .and_then(EmploymentStatus::from_code),
            housing_status: integer_field(raw, "housing_status").and_then(HousingStatus::from_code),
            loan_term: integer_field(raw, "loan_term").and_then(LoanTerm::from_months),
        };

        let documents = SupportingDocuments {
            identity_document: text_field(raw, &["identity_document", "identity_doc_name"]),
            income_proof: text_field(raw, &["income_proof", "income_doc_name"]),
        };

        ApplicationRecord {
            applicant,
            financials,
            documents,
        }
    }
}

fn text_field(raw: &RawApplication, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(key)? {
        Value::String(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    })
}

fn number_field(raw: &RawApplication, key: &str) -> Option<f64> {
    let parsed = match raw.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(value) => parse_number(value),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

fn integer_field(raw: &RawApplication, key: &str) -> Option<i64> {
    match raw.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(value) => {
            let trimmed = value.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| parse_number(trimmed).and_then(truncate))
        }
        _ => None,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '$' | '_'))
        .collect();
    cleaned.parse::<f64>().ok()
}

fn truncate(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() < i64::MAX as f64).then(|| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_strips_currency_formatting() {
        assert_eq!(parse_number(" $150,000.50 "), Some(150_000.5));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn truncate_rejects_non_finite_values() {
        assert_eq!(truncate(712.9), Some(712));
        assert_eq!(truncate(f64::NAN), None);
        assert_eq!(truncate(f64::INFINITY), None);
    }
}
