use crate::limits::OrderLimits;
use rust_decimal::Decimal;
use tracing::error;

/// A local precondition violation. Never produced by venue-side failures;
/// hitting one means the caller or its configuration is wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskViolation {
    #[error("order volume {requested} exceeds the configured maximum {max}")]
    OrderVolumeExceeded { requested: Decimal, max: Decimal },
}

/// Reject any order larger than the configured per-order ceiling.
pub fn check_order_volume(amount: Decimal, limits: &OrderLimits) -> Result<(), RiskViolation> {
    if amount > limits.max_order_volume {
        error!(
            requested = %amount,
            max = %limits.max_order_volume,
            "risk alert: order volume over the configured maximum"
        );
        return Err(RiskViolation::OrderVolumeExceeded {
            requested: amount,
            max: limits.max_order_volume,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn volume_at_or_under_the_limit_passes() {
        let limits = OrderLimits::new(dec!(100));
        assert!(check_order_volume(dec!(100), &limits).is_ok());
        assert!(check_order_volume(dec!(99.5), &limits).is_ok());
        assert!(check_order_volume(Decimal::ZERO, &limits).is_ok());
    }

    #[test]
    fn volume_over_the_limit_is_rejected_with_both_amounts() {
        let limits = OrderLimits::new(dec!(100));
        let err = check_order_volume(dec!(150), &limits).unwrap_err();
        assert_eq!(
            err,
            RiskViolation::OrderVolumeExceeded {
                requested: dec!(150),
                max: dec!(100),
            }
        );
    }
}
