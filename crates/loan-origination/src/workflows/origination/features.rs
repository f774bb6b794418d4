use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::ApplicationRecord;

/// Training schema generations a classifier artifact can be paired with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// First generation keyed on supporting-document presence.
    DocumentPresence,
    /// Second generation keyed on employment, housing, and term.
    #[default]
    FinancialProfile,
}

impl SchemaVersion {
    pub const fn label(self) -> &'static str {
        match self {
            SchemaVersion::DocumentPresence => "document_presence",
            SchemaVersion::FinancialProfile => "financial_profile",
        }
    }

    pub fn schema(self) -> Arc<dyn FeatureSchema> {
        match self {
            SchemaVersion::DocumentPresence => Arc::new(DocumentPresenceSchema),
            SchemaVersion::FinancialProfile => Arc::new(FinancialProfileSchema),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature schema '{0}'")]
pub struct UnknownSchemaError(pub String);

impl FromStr for SchemaVersion {
    type Err = UnknownSchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "document_presence" | "v1" => Ok(Self::DocumentPresence),
            "financial_profile" | "v2" => Ok(Self::FinancialProfile),
            other => Err(UnknownSchemaError(other.to_string())),
        }
    }
}

/// Named feature values in the exact column order a classifier was trained on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<(&'static str, f64)>,
}

impl FeatureVector {
    pub fn from_columns(columns: Vec<(&'static str, f64)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.columns.iter().map(|(_, value)| *value)
    }

    /// Value at a column position; out-of-range positions read as 0.
    pub fn value_at(&self, index: usize) -> f64 {
        self.columns.get(index).map(|(_, value)| *value).unwrap_or(0.0)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| *value)
    }
}

/// Strategy that turns a record into the feature layout of one schema generation.
pub trait FeatureSchema: Send + Sync {
    fn version(&self) -> SchemaVersion;
    fn columns(&self) -> &'static [&'static str];
    fn build(&self, record: &ApplicationRecord) -> FeatureVector;
}

const DOCUMENT_PRESENCE_COLUMNS: &[&str] = &[
    "annual_income",
    "loan_amount",
    "credit_score",
    "has_identity_doc",
    "has_income_proof",
];

const FINANCIAL_PROFILE_COLUMNS: &[&str] = &[
    "annual_income",
    "loan_amount",
    "credit_score",
    "employment_status",
    "housing_status",
    "loan_term",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPresenceSchema;

impl FeatureSchema for DocumentPresenceSchema {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::DocumentPresence
    }

    fn columns(&self) -> &'static [&'static str] {
        DOCUMENT_PRESENCE_COLUMNS
    }

    fn build(&self, record: &ApplicationRecord) -> FeatureVector {
        let financials = &record.financials;
        let values = [
            financials.annual_income,
            financials.loan_amount,
            financials.credit_score as f64,
            flag(record.documents.has_identity_document()),
            flag(record.documents.has_income_proof()),
        ];
        zip_columns(DOCUMENT_PRESENCE_COLUMNS, &values)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialProfileSchema;

impl FeatureSchema for FinancialProfileSchema {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::FinancialProfile
    }

    fn columns(&self) -> &'static [&'static str] {
        FINANCIAL_PROFILE_COLUMNS
    }

    fn build(&self, record: &ApplicationRecord) -> FeatureVector {
        let financials = &record.financials;
        let values = [
            financials.annual_income,
            financials.loan_amount,
            financials.credit_score as f64,
            financials
                .employment_status
                .map(|status| f64::from(status.code()))
                .unwrap_or(0.0),
            financials
                .housing_status
                .map(|status| f64::from(status.code()))
                .unwrap_or(0.0),
            financials
                .loan_term
                .map(|term| f64::from(term.months()))
                .unwrap_or(0.0),
        ];
        zip_columns(FINANCIAL_PROFILE_COLUMNS, &values)
    }
}

fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

fn zip_columns(columns: &'static [&'static str], values: &[f64]) -> FeatureVector {
    FeatureVector::from_columns(
        columns
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect(),
    )
}
