//! Cash flow value types.

use serde::{Deserialize, Serialize};

/// A single dated cash flow.
///
/// Coupon interest and principal redemption are carried separately so the
/// instruments can report them independently; valuation always discounts
/// the combined [`net_amount`](CashFlow::net_amount).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date as a serial day number.
    pub date: f64,
    /// Interest amount.
    pub amount: f64,
    /// Principal amount.
    pub principal: f64,
}

impl CashFlow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: f64, amount: f64, principal: f64) -> Self {
        Self {
            date,
            amount,
            principal,
        }
    }

    /// Total amount paid on the date: interest plus principal.
    #[must_use]
    pub fn net_amount(&self) -> f64 {
        self.amount + self.principal
    }
}

/// An ordered list of cash flows.
pub type CashFlowStream = Vec<CashFlow>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_net_amount() {
        let flow = CashFlow::new(45000.0, 2.75, 100.0);
        assert_relative_eq!(flow.net_amount(), 102.75);
    }

    #[test]
    fn test_coupon_only_flow() {
        let flow = CashFlow::new(45000.0, 2.75, 0.0);
        assert_relative_eq!(flow.net_amount(), 2.75);
    }
}
