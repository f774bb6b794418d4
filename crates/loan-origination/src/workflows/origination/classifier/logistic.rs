use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::workflows::origination::features::FeatureVector;

/// Single logistic-regression estimator with optional per-column standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub offsets: Vec<f64>,
    #[serde(default)]
    pub scales: Vec<f64>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            offsets: Vec::new(),
            scales: Vec::new(),
        }
    }

    pub fn with_standardization(mut self, offsets: Vec<f64>, scales: Vec<f64>) -> Self {
        self.offsets = offsets;
        self.scales = scales;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let width = self.coefficients.len();
        if width == 0 {
            return Err("logistic model has no coefficients".to_string());
        }
        if !self.offsets.is_empty() && self.offsets.len() != width {
            return Err(format!(
                "logistic model has {} offsets for {width} coefficients",
                self.offsets.len()
            ));
        }
        if !self.scales.is_empty() && self.scales.len() != width {
            return Err(format!(
                "logistic model has {} scales for {width} coefficients",
                self.scales.len()
            ));
        }
        let all_finite = std::iter::once(self.intercept)
            .chain(self.coefficients.iter().copied())
            .chain(self.offsets.iter().copied())
            .chain(self.scales.iter().copied())
            .all(f64::is_finite);
        if !all_finite {
            return Err("logistic model parameters must be finite".to_string());
        }
        if self.scales.iter().any(|scale| *scale == 0.0) {
            return Err("logistic model scales must be non-zero".to_string());
        }
        Ok(())
    }

    fn standardize(&self, index: usize, value: f64) -> f64 {
        let offset = self.offsets.get(index).copied().unwrap_or(0.0);
        let scale = self
            .scales
            .get(index)
            .copied()
            .filter(|scale| *scale != 0.0)
            .unwrap_or(1.0);
        (value - offset) / scale
    }
}

impl Classifier for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let logit = self
            .coefficients
            .iter()
            .enumerate()
            .fold(self.intercept, |acc, (index, coefficient)| {
                acc + coefficient * self.standardize(index, features.value_at(index))
            });
        sigmoid(logit)
    }
}

fn sigmoid(logit: f64) -> f64 {
    if logit >= 0.0 {
        1.0 / (1.0 + (-logit).exp())
    } else {
        let exp = logit.exp();
        exp / (1.0 + exp)
    }
}
