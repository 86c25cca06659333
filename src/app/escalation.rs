//! Which new listings deserve an individual alert on top of the batch.

use rust_decimal::Decimal;

use crate::app::config::EscalationConfig;
use crate::domain::Odd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    min_odd_value: Decimal,
    min_freebet: Decimal,
}

impl EscalationPolicy {
    pub fn new(min_odd_value: Decimal, min_freebet: Decimal) -> Self {
        Self {
            min_odd_value,
            min_freebet,
        }
    }

    /// `odd_value >= min_odd_value` or `freebet >= min_freebet`.
    pub fn is_escalated(&self, odd: &Odd) -> bool {
        odd.odd_value() >= self.min_odd_value || odd.freebet() >= self.min_freebet
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        EscalationConfig::default().into()
    }
}

impl From<&EscalationConfig> for EscalationPolicy {
    fn from(config: &EscalationConfig) -> Self {
        Self::new(config.min_odd_value, config.min_freebet)
    }
}

impl From<EscalationConfig> for EscalationPolicy {
    fn from(config: EscalationConfig) -> Self {
        Self::from(&config)
    }
}
