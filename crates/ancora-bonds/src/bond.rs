//! A single fixed-income instrument.

use std::fmt;

use nalgebra::DVector;

use ancora_core::{is_unset_price, CashFlow, CashFlowStream, DAYS_PER_YEAR, UNSET_PRICE};
use ancora_curves::AnchorCurve;
use ancora_math::differentiation::DifferenceScheme;

use crate::{SharedCoefficients, SharedCurve};

/// A bond held for curve fitting.
///
/// The static reference fields come from the instrument source; the live
/// fields (quotes, weight, indicator flags) change through the engine's
/// update protocol. The bond values itself against the shared curve and
/// coefficient handles installed by the engine, and its
/// [`model_clean_price`](Bond::model_clean_price) is the scalar function of
/// the parameter vector that the least-squares objective is built from.
#[derive(Debug, Clone)]
pub struct Bond {
    /// Identity key the instrument was requested under.
    request_key: String,
    /// Short display name.
    pub short_name: String,
    /// Annual coupon, in percent of face.
    pub coupon: f64,
    /// Issue date as a serial day number.
    pub issue_date: f64,
    /// Maturity date as a serial day number.
    pub maturity: f64,
    /// Settlement date as a serial day number.
    pub settlement_date: f64,
    /// Valuation date as a serial day number.
    pub as_of: f64,
    /// Days between trade and settlement.
    pub days_to_settle: u32,
    /// Amount outstanding, in currency units.
    pub amount_outstanding: f64,
    /// Accrued interest at settlement.
    pub accrued_interest: f64,
    /// Bid price; the unset sentinel until a quote arrives.
    pub bid: f64,
    /// Ask price; the unset sentinel until a quote arrives.
    pub ask: f64,
    /// Residual weight in the objective.
    pub weight: f64,
    /// Benchmark indicator.
    pub benchmark: bool,
    /// Cheapest-to-deliver indicator.
    pub ctd: bool,
    /// Market yield at the bid.
    pub yield_bid: f64,
    /// Market yield at the ask.
    pub yield_ask: f64,
    /// Market yield at the mid.
    pub yield_mid: f64,
    /// Yield implied by the model price; refreshed after each fit.
    pub model_yield_mid: f64,
    /// Model clean price at the latest fitted parameters.
    pub model_price: f64,
    cash_flows: CashFlowStream,
    curve: Option<SharedCurve>,
    coefficients: Option<SharedCoefficients>,
}

impl Bond {
    /// Creates a bond with unset quotes and unit weight.
    #[must_use]
    pub fn new(request_key: impl Into<String>) -> Self {
        Self {
            request_key: request_key.into(),
            short_name: String::new(),
            coupon: 0.0,
            issue_date: 0.0,
            maturity: 0.0,
            settlement_date: 0.0,
            as_of: 0.0,
            days_to_settle: 0,
            amount_outstanding: 0.0,
            accrued_interest: 0.0,
            bid: UNSET_PRICE,
            ask: UNSET_PRICE,
            weight: 1.0,
            benchmark: false,
            ctd: false,
            yield_bid: 0.0,
            yield_ask: 0.0,
            yield_mid: 0.0,
            model_yield_mid: 0.0,
            model_price: 0.0,
            cash_flows: CashFlowStream::new(),
            curve: None,
            coefficients: None,
        }
    }

    /// The identity key the instrument was requested under.
    #[must_use]
    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// The bond's cash flows.
    #[must_use]
    pub fn cash_flows(&self) -> &CashFlowStream {
        &self.cash_flows
    }

    /// Replaces the bond's cash flows.
    pub fn set_cash_flows(&mut self, cash_flows: CashFlowStream) {
        self.cash_flows = cash_flows;
    }

    /// Appends a cash flow.
    pub fn push_cash_flow(&mut self, cash_flow: CashFlow) {
        self.cash_flows.push(cash_flow);
    }

    /// Installs the shared curve handle this bond is valued against.
    pub fn set_curve(&mut self, curve: SharedCurve) {
        self.curve = Some(curve);
    }

    /// Installs the shared regression coefficients handle.
    pub fn set_coefficients(&mut self, coefficients: SharedCoefficients) {
        self.coefficients = Some(coefficients);
    }

    /// The shared curve handle, when installed.
    #[must_use]
    pub fn curve(&self) -> Option<&SharedCurve> {
        self.curve.as_ref()
    }

    // =========================================================================
    // QUOTE-DERIVED VALUES
    // =========================================================================

    /// Mid price: average of bid and ask.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.ask + self.bid) / 2.0
    }

    /// Quoted bid/ask spread.
    #[must_use]
    pub fn bid_ask_spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Invoice price at the bid: bid plus accrued interest.
    #[must_use]
    pub fn invoice_price_bid(&self) -> f64 {
        self.bid + self.accrued_interest
    }

    /// Invoice price at the ask: ask plus accrued interest.
    #[must_use]
    pub fn invoice_price_ask(&self) -> f64 {
        self.ask + self.accrued_interest
    }

    /// Invoice price at the mid.
    #[must_use]
    pub fn invoice_price_mid(&self) -> f64 {
        (self.invoice_price_ask() + self.invoice_price_bid()) / 2.0
    }

    /// False while either side of the quote is still the unset sentinel.
    #[must_use]
    pub fn has_fittable_values(&self) -> bool {
        !is_unset_price(self.ask) && !is_unset_price(self.bid)
    }

    // =========================================================================
    // DATE-DERIVED VALUES
    // =========================================================================

    /// Year fraction from settlement to the valuation date.
    #[must_use]
    pub fn issue_date_year_fraction(&self) -> f64 {
        (self.as_of - self.settlement_date) / DAYS_PER_YEAR
    }

    /// Year fraction from the valuation date to maturity.
    #[must_use]
    pub fn maturity_year_fraction(&self) -> f64 {
        (self.maturity - self.as_of) / DAYS_PER_YEAR
    }

    // =========================================================================
    // MODEL VALUES
    // =========================================================================

    /// Pushes the regression slice of `parameters` into the shared
    /// coefficients.
    ///
    /// The first curve-length entries belong to the curve and are left to
    /// its owner; anything beyond is scattered into the active regression
    /// terms, keeping every bond sharing the handle in agreement with the
    /// trial point the solver is probing.
    pub fn apply_parameters(&self, parameters: &DVector<f64>) {
        let Some(curve) = &self.curve else {
            return;
        };

        let curve_len = curve.read().len();

        if parameters.len() > curve_len {
            if let Some(coefficients) = &self.coefficients {
                coefficients
                    .write()
                    .apply_solver_output(parameters.as_slice(), curve_len);
            }
        }
    }

    /// Model clean price at the given parameter vector.
    ///
    /// Discounted cash flows are quoted per ten thousand of face, so the
    /// clean price is `npv / 10000 - accrued`, plus the regression
    /// adjustment when coefficients are attached.
    #[must_use]
    pub fn model_clean_price(&self, parameters: &DVector<f64>) -> f64 {
        if self.curve.is_none() {
            return f64::NAN;
        }

        self.apply_parameters(parameters);

        let base = self.net_present_value(parameters) / 10000.0 - self.accrued_interest;

        let Some(coefficients) = &self.coefficients else {
            return base;
        };

        let coefficients = coefficients.read();

        base + (self.amount_outstanding / 1.0e9) * coefficients.amount_outstanding()
            + self.issue_date_year_fraction() * coefficients.issue_date_year_fraction()
            + f64::from(u8::from(self.benchmark)) * coefficients.benchmark()
            + f64::from(u8::from(self.ctd)) * coefficients.ctd()
            + self.bid_ask_spread() * coefficients.bid_ask_spread()
    }

    /// Net present value of the cash flows against a curve rebuilt from the
    /// bond's own anchor dates and the curve-length prefix of `parameters`.
    #[must_use]
    pub fn net_present_value(&self, parameters: &DVector<f64>) -> f64 {
        let Some(curve) = &self.curve else {
            return f64::NAN;
        };

        let dates = curve.read().dates().to_vec();

        if parameters.len() < dates.len() {
            return f64::NAN;
        }

        let values = parameters.as_slice()[..dates.len()].to_vec();
        let Ok(trial_curve) = AnchorCurve::new(dates, values) else {
            return f64::NAN;
        };

        self.cash_flows
            .iter()
            .map(|flow| flow.net_amount() * trial_curve.discount_factor(flow.date))
            .sum()
    }

    /// Weighted pricing error at the given parameters.
    #[must_use]
    pub fn objective_value(&self, parameters: &DVector<f64>) -> f64 {
        (self.model_clean_price(parameters) - self.mid()) * self.weight
    }

    /// Gradient of the model clean price with respect to the parameters.
    #[must_use]
    pub fn gradient(
        &self,
        parameters: &DVector<f64>,
        scheme: &dyn DifferenceScheme,
    ) -> DVector<f64> {
        let mut price = |p: &DVector<f64>| self.model_clean_price(p);
        scheme.gradient(&mut price, parameters)
    }

    /// Richness/cheapness versus the fitted curve, in basis points of
    /// yield: positive when the bond yields more than the curve at its
    /// maturity.
    #[must_use]
    pub fn cheapness(&self) -> f64 {
        let Some(curve) = &self.curve else {
            return f64::NAN;
        };

        (self.model_yield_mid - curve.read().yield_at(self.maturity)) * 100.0
    }

    /// Spread of the market invoice price over the model price.
    #[must_use]
    pub fn market_to_model_price_spread(&self) -> f64 {
        self.invoice_price_mid() - self.model_price
    }

    /// Spread of the market mid yield over the model yield.
    #[must_use]
    pub fn market_to_model_yield_spread(&self) -> f64 {
        self.yield_mid - self.model_yield_mid
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: T={}, P={}, P+AI={}, Y={}, NPV={}",
            self.request_key,
            self.maturity,
            self.mid(),
            self.invoice_price_mid(),
            self.yield_mid,
            self.model_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancora_math::differentiation::ForwardDifference;
    use approx::assert_relative_eq;
    use parking_lot::RwLock;
    use std::sync::Arc;

    use crate::RegressionCoefficients;

    fn shared_flat_curve() -> SharedCurve {
        Arc::new(RwLock::new(AnchorCurve::flat(
            vec![45000.0, 45365.0, 46095.0],
            0.5,
        )))
    }

    fn zero_coupon_bond(key: &str, maturity: f64) -> Bond {
        let mut bond = Bond::new(key);
        bond.maturity = maturity;
        bond.as_of = 45000.0;
        bond.settlement_date = 45002.0;
        bond.set_cash_flows(vec![CashFlow::new(maturity, 0.0, 1_000_000.0)]);
        bond.set_curve(shared_flat_curve());
        bond
    }

    #[test]
    fn test_mid_and_spread() {
        let mut bond = Bond::new("B1");
        bond.bid = 99.0;
        bond.ask = 100.0;

        assert_relative_eq!(bond.mid(), 99.5);
        assert_relative_eq!(bond.bid_ask_spread(), 1.0);
    }

    #[test]
    fn test_has_fittable_values() {
        let mut bond = Bond::new("B1");
        assert!(!bond.has_fittable_values());

        bond.bid = 99.0;
        assert!(!bond.has_fittable_values());

        bond.ask = 100.0;
        assert!(bond.has_fittable_values());
    }

    #[test]
    fn test_npv_discounts_with_trial_parameters() {
        let bond = zero_coupon_bond("B1", 45365.0);
        let parameters = DVector::from_vec(vec![1.0, 1.0, 1.0]);

        // flat 1% curve, ~one year: df = exp(-1 * 1 * yf / 100)
        let yf = (45365.0 - 45000.0) / DAYS_PER_YEAR;
        let expected = 1_000_000.0 * (-1.0 * yf / 100.0).exp();

        assert_relative_eq!(
            bond.net_present_value(&parameters),
            expected,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_model_clean_price_without_coefficients() {
        let mut bond = zero_coupon_bond("B1", 45365.0);
        bond.accrued_interest = 0.4;

        let parameters = DVector::from_vec(vec![0.5, 0.5, 0.5]);
        let expected = bond.net_present_value(&parameters) / 10000.0 - 0.4;

        assert_relative_eq!(bond.model_clean_price(&parameters), expected);
    }

    #[test]
    fn test_model_clean_price_applies_regression_terms() {
        let mut bond = zero_coupon_bond("B1", 45365.0);
        bond.bid = 99.0;
        bond.ask = 100.0;
        bond.amount_outstanding = 2.0e9;
        bond.benchmark = true;

        let coefficients = Arc::new(RwLock::new(RegressionCoefficients::from_flags(&[
            true, true, false, false, false,
        ])));
        bond.set_coefficients(coefficients.clone());

        // three curve slots + two active coefficient slots
        let parameters = DVector::from_vec(vec![0.5, 0.5, 0.5, 0.02, 0.03]);
        let price = bond.model_clean_price(&parameters);

        // the scatter happened through the shared handle
        assert_relative_eq!(coefficients.read().amount_outstanding(), 0.02);
        assert_relative_eq!(coefficients.read().benchmark(), 0.03);

        let base = bond.net_present_value(&parameters) / 10000.0;
        let expected = base + 2.0 * 0.02 + 1.0 * 0.03;
        assert_relative_eq!(price, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_objective_value_is_weighted_error() {
        let mut bond = zero_coupon_bond("B1", 45365.0);
        bond.bid = 99.0;
        bond.ask = 100.0;
        bond.weight = 2.0;

        let parameters = DVector::from_vec(vec![0.5, 0.5, 0.5]);
        let expected = (bond.model_clean_price(&parameters) - 99.5) * 2.0;

        assert_relative_eq!(bond.objective_value(&parameters), expected);
    }

    #[test]
    fn test_gradient_moves_with_curve_parameters() {
        let bond = zero_coupon_bond("B1", 45365.0);
        let parameters = DVector::from_vec(vec![0.5, 0.5, 0.5]);

        let scheme = ForwardDifference::default();
        let gradient = bond.gradient(&parameters, &scheme);

        assert_eq!(gradient.len(), 3);
        // raising yields lowers the price, and the one-year knot dominates
        assert!(gradient[1] < 0.0);
        assert!(gradient[1].abs() > gradient[2].abs());
    }

    #[test]
    fn test_model_price_without_curve_is_nan() {
        let bond = Bond::new("B1");
        let parameters = DVector::from_vec(vec![0.5]);
        assert!(bond.model_clean_price(&parameters).is_nan());
    }
}
