//! Price-to-yield conversion on a bond's own cash flows.

use ancora_bonds::{Bond, BondError, BondResult};
use ancora_core::DAYS_PER_YEAR;
use ancora_math::solvers::newton::{newton_raphson_numerical, RootConfig};

/// Initial guess for the yield solve, in percent.
const YIELD_GUESS: f64 = 5.0;

/// Solves the flat continuously-compounded yield, in percent, that reprices
/// the bond's cash flows to the given clean price.
///
/// Year fractions run from the settlement date on a 365.25-day year; the
/// target is the invoice amount `(price + accrued) * 10000`, matching the
/// scale the model price is quoted on.
///
/// # Errors
///
/// Fails when the bond has no cash flows or the Newton iteration does not
/// converge.
pub fn yield_from_price(bond: &Bond, clean_price: f64) -> BondResult<f64> {
    if bond.cash_flows().is_empty() {
        return Err(BondError::MissingCashFlows {
            ticker: bond.request_key().to_string(),
        });
    }

    let settlement = bond.settlement_date;
    let target = (clean_price + bond.accrued_interest) * 10000.0;
    let flows: Vec<(f64, f64)> = bond
        .cash_flows()
        .iter()
        .map(|flow| ((flow.date - settlement) / DAYS_PER_YEAR, flow.net_amount()))
        .collect();

    let price_error = |y: f64| {
        flows
            .iter()
            .map(|(yf, amount)| amount * (-y * yf / 100.0).exp())
            .sum::<f64>()
            - target
    };

    newton_raphson_numerical(price_error, YIELD_GUESS, &RootConfig::default())
        .map_err(|e| BondError::yield_solve_failed(bond.request_key(), e.to_string()))
}

/// Fills the bond's market yield fields from its observed prices.
///
/// Each side is solved only when its price is set; the mid yield needs both
/// sides.
pub fn fill_market_yields(bond: &mut Bond) -> BondResult<()> {
    if !ancora_core::is_unset_price(bond.bid) {
        bond.yield_bid = yield_from_price(bond, bond.bid)?;
    }

    if !ancora_core::is_unset_price(bond.ask) {
        bond.yield_ask = yield_from_price(bond, bond.ask)?;
    }

    if bond.has_fittable_values() {
        bond.yield_mid = yield_from_price(bond, bond.mid())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancora_core::CashFlow;
    use approx::assert_relative_eq;

    fn sample_bond() -> Bond {
        let mut bond = Bond::new("B1");
        bond.settlement_date = 45000.0;
        bond.set_cash_flows(vec![
            CashFlow::new(45365.25, 25_000.0, 0.0),
            CashFlow::new(45730.5, 25_000.0, 1_000_000.0),
        ]);
        bond
    }

    #[test]
    fn test_yield_round_trips_through_price() {
        let bond = sample_bond();

        // price the flows at a known 3% flat yield, then recover it
        let y = 3.0;
        let npv: f64 = bond
            .cash_flows()
            .iter()
            .map(|flow| {
                let yf = (flow.date - bond.settlement_date) / DAYS_PER_YEAR;
                flow.net_amount() * (-y * yf / 100.0).exp()
            })
            .sum();
        let clean_price = npv / 10000.0 - bond.accrued_interest;

        let solved = yield_from_price(&bond, clean_price).unwrap();
        assert_relative_eq!(solved, y, epsilon = 1e-6);
    }

    #[test]
    fn test_no_cash_flows_is_an_error() {
        let bond = Bond::new("B1");
        assert!(yield_from_price(&bond, 100.0).is_err());
    }

    #[test]
    fn test_fill_market_yields_respects_unset_sides() {
        let mut bond = sample_bond();
        bond.bid = 101.0;

        fill_market_yields(&mut bond).unwrap();

        assert!(bond.yield_bid != 0.0);
        assert_eq!(bond.yield_ask, 0.0);
        assert_eq!(bond.yield_mid, 0.0);
    }
}
