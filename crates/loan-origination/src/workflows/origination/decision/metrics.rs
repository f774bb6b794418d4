use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::origination::domain::FinancialProfile;

/// Debt-to-income ratio at which the DTI score bottoms out.
const DTI_ZERO_SCORE_RATIO: f64 = 0.6;
const CREDIT_SCORE_FLOOR: f64 = 300.0;
const CREDIT_SCORE_CEILING: f64 = 850.0;
const EMPLOYMENT_CODE_MAX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    DtiScore,
    CreditScore,
    EmploymentScore,
    Confidence,
}

/// Display metrics on [0, 1], rounded to two decimals. Empty when no model ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskMetrics(BTreeMap<MetricName, f64>);

impl RiskMetrics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: MetricName) -> Option<f64> {
        self.0.get(&name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        self.0.iter().map(|(name, value)| (*name, *value))
    }
}

/// `label_confidence` is the probability of the side matching the final label.
pub(crate) fn compute(financials: &FinancialProfile, label_confidence: f64) -> RiskMetrics {
    let mut values = BTreeMap::new();
    values.insert(MetricName::DtiScore, round2(dti_score(financials)));
    values.insert(
        MetricName::CreditScore,
        round2(credit_score_norm(financials.credit_score)),
    );
    values.insert(
        MetricName::EmploymentScore,
        round2(employment_score(financials)),
    );
    values.insert(MetricName::Confidence, round2(clamp_unit(label_confidence)));
    RiskMetrics(values)
}

pub(crate) fn dti_score(financials: &FinancialProfile) -> f64 {
    clamp_unit(1.0 - financials.debt_to_income() / DTI_ZERO_SCORE_RATIO)
}

pub(crate) fn credit_score_norm(credit_score: i64) -> f64 {
    clamp_unit(
        (credit_score as f64 - CREDIT_SCORE_FLOOR) / (CREDIT_SCORE_CEILING - CREDIT_SCORE_FLOOR),
    )
}

fn employment_score(financials: &FinancialProfile) -> f64 {
    financials
        .employment_status
        .map(|status| f64::from(status.code()) / EMPLOYMENT_CODE_MAX)
        .unwrap_or(0.0)
}

/// Non-finite values map to 0.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if !value.is_finite() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
