use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hard per-order limits applied before anything reaches an exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLimits {
    /// Largest single-order volume (in market currency) a broker will pass
    /// through to the venue.
    pub max_order_volume: Decimal,
}

impl OrderLimits {
    pub fn new(max_order_volume: Decimal) -> Self {
        Self { max_order_volume }
    }
}

impl Default for OrderLimits {
    /// Deliberately small; deployments are expected to configure their own
    /// ceiling rather than trade on this one.
    fn default() -> Self {
        Self {
            max_order_volume: Decimal::TEN,
        }
    }
}
