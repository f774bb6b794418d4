use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for processed applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Loosely-typed applicant input as posted by the origination front end.
///
/// Values may be JSON numbers or numeric strings; nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawApplication(pub BTreeMap<String, serde_json::Value>);

impl RawApplication {
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// Identity fields carried through the pipeline without any invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Unemployed,
    SelfEmployed,
    Employed,
}

impl EmploymentStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unemployed),
            1 => Some(Self::SelfEmployed),
            2 => Some(Self::Employed),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Unemployed => 0,
            Self::SelfEmployed => 1,
            Self::Employed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    Rent,
    Mortgage,
    Own,
}

impl HousingStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Rent),
            1 => Some(Self::Mortgage),
            2 => Some(Self::Own),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Rent => 0,
            Self::Mortgage => 1,
            Self::Own => 2,
        }
    }
}

/// Repayment terms offered by the origination desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanTerm {
    Months12,
    Months36,
    Months60,
}

impl LoanTerm {
    pub fn from_months(months: i64) -> Option<Self> {
        match months {
            12 => Some(Self::Months12),
            36 => Some(Self::Months36),
            60 => Some(Self::Months60),
            _ => None,
        }
    }

    pub const fn months(self) -> u16 {
        match self {
            Self::Months12 => 12,
            Self::Months36 => 36,
            Self::Months60 => 60,
        }
    }
}

/// Financial profile scored by the classifier.
///
/// Coded fields hold `None` when the submitted value was missing or outside its
/// domain so validation can itemize the problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub annual_income: f64,
    pub loan_amount: f64,
    pub credit_score: i64,
    pub employment_status: Option<EmploymentStatus>,
    pub housing_status: Option<HousingStatus>,
    pub loan_term: Option<LoanTerm>,
}

impl FinancialProfile {
    /// Loan amount over income, with income floored at 1.
    pub fn debt_to_income(&self) -> f64 {
        self.loan_amount / self.annual_income.max(1.0)
    }
}

/// File names of the supporting documents attached at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingDocuments {
    pub identity_document: Option<String>,
    pub income_proof: Option<String>,
}

impl SupportingDocuments {
    pub fn has_identity_document(&self) -> bool {
        self.identity_document.is_some()
    }

    pub fn has_income_proof(&self) -> bool {
        self.income_proof.is_some()
    }
}

/// Typed application produced by intake normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub applicant: ApplicantIdentity,
    pub financials: FinancialProfile,
    pub documents: SupportingDocuments,
}

/// Outcome of the static business rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<String>,
}

pub(crate) const VALIDATION_SUCCESS_MESSAGE: &str =
    "All data and documents validated successfully.";

impl ValidationResult {
    pub fn from_violations(violations: Vec<String>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    pub fn remarks(&self) -> String {
        if self.violations.is_empty() {
            VALIDATION_SUCCESS_MESSAGE.to_string()
        } else {
            self.violations.join(" | ")
        }
    }
}
