use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::tolerance::default_fee_ratio;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid matching policy: {0}")]
    Invalid(String),
}

/// Thresholds that drive the two-tier matcher.
///
/// Text thresholds are strict lower bounds on a 0–100 similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Text score an exact-amount candidate must exceed.
    pub exact_text_threshold: u8,
    /// Text score a near-amount candidate must exceed before the judge is asked.
    pub fee_text_threshold: u8,
    /// Largest accepted shortfall or overage as a fraction of the invoice total.
    pub fee_tolerance: Decimal,
    /// Upper bound on a single judge call.
    pub judge_timeout_secs: u64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            exact_text_threshold: 50,
            fee_text_threshold: 60,
            fee_tolerance: default_fee_ratio(),
            judge_timeout_secs: 30,
        }
    }
}

impl MatchPolicy {
    pub fn from_toml(s: &str) -> Result<Self, PolicyError> {
        let policy: MatchPolicy = toml::from_str(s)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.exact_text_threshold > 100 || self.fee_text_threshold > 100 {
            return Err(PolicyError::Invalid(
                "text thresholds must be between 0 and 100".to_string(),
            ));
        }
        if self.fee_tolerance < Decimal::ZERO || self.fee_tolerance > Decimal::ONE {
            return Err(PolicyError::Invalid(format!(
                "fee_tolerance {} must be between 0 and 1",
                self.fee_tolerance
            )));
        }
        if self.judge_timeout_secs == 0 {
            return Err(PolicyError::Invalid(
                "judge_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs)
    }
}
