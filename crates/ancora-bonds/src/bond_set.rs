//! The keyed bond collection and its least-squares objective.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use ancora_math::differentiation::{DifferenceScheme, ForwardDifference};
use ancora_math::solvers::ObjectiveFunction;

use crate::{Bond, SharedCoefficients, SharedCurve};

/// A set of bonds keyed by request key, aggregated into one objective.
///
/// Insertion ignores duplicate keys; iteration order is the map's and is
/// not guaranteed stable across mutations, only across the repeated
/// residual/Jacobian evaluations of a single solve (the set is not mutated
/// while a solve holds it).
pub struct BondSet {
    bonds: HashMap<String, Bond>,
    scheme: Box<dyn DifferenceScheme>,
}

impl Default for BondSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BondSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BondSet")
            .field("bonds", &self.bonds.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BondSet {
    /// Creates an empty set with forward-difference gradients.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bonds: HashMap::new(),
            scheme: Box::new(ForwardDifference::default()),
        }
    }

    /// Creates an empty set with a custom gradient scheme.
    #[must_use]
    pub fn with_scheme(scheme: Box<dyn DifferenceScheme>) -> Self {
        Self {
            bonds: HashMap::new(),
            scheme,
        }
    }

    /// Number of bonds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// True when the set holds no bonds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// True when a bond is held under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.bonds.contains_key(key)
    }

    /// Adds a bond under its request key; duplicate keys are ignored.
    pub fn insert(&mut self, bond: Bond) {
        self.bonds
            .entry(bond.request_key().to_string())
            .or_insert(bond);
    }

    /// The bond held under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Bond> {
        self.bonds.get(key)
    }

    /// Mutable access to the bond held under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Bond> {
        self.bonds.get_mut(key)
    }

    /// Removes every bond whose key is absent from `tickers`.
    pub fn keep(&mut self, tickers: &[String]) {
        self.bonds.retain(|key, _| tickers.iter().any(|t| t == key));
    }

    /// Removes every bond.
    pub fn clear(&mut self) {
        self.bonds.clear();
    }

    /// Iterates over the bonds in map order.
    pub fn iter(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.values()
    }

    /// Iterates mutably over the bonds in map order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bond> {
        self.bonds.values_mut()
    }

    /// The request keys currently held.
    #[must_use]
    pub fn request_keys(&self) -> Vec<String> {
        self.bonds.keys().cloned().collect()
    }

    /// Broadcasts a parameter vector to every bond.
    pub fn apply_parameters(&self, parameters: &DVector<f64>) {
        for bond in self.bonds.values() {
            bond.apply_parameters(parameters);
        }
    }

    /// Installs the shared curve handle on every bond.
    pub fn set_curve(&mut self, curve: &SharedCurve) {
        for bond in self.bonds.values_mut() {
            bond.set_curve(curve.clone());
        }
    }

    /// Installs the shared coefficients handle on every bond.
    pub fn set_coefficients(&mut self, coefficients: &SharedCoefficients) {
        for bond in self.bonds.values_mut() {
            bond.set_coefficients(coefficients.clone());
        }
    }
}

impl ObjectiveFunction for BondSet {
    /// Half the sum of squared weighted pricing errors.
    fn value(&self, parameters: &DVector<f64>) -> f64 {
        let sum: f64 = self
            .bonds
            .values()
            .map(|bond| {
                let error = bond.objective_value(parameters);
                error * error
            })
            .sum();

        0.5 * sum
    }

    fn residuals(&self, parameters: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.bonds.len(),
            self.bonds
                .values()
                .map(|bond| bond.objective_value(parameters)),
        )
    }

    fn jacobian(&self, parameters: &DVector<f64>) -> DMatrix<f64> {
        let mut jacobian = DMatrix::zeros(self.bonds.len(), parameters.len());

        for (i, bond) in self.bonds.values().enumerate() {
            jacobian
                .row_mut(i)
                .copy_from(&bond.gradient(parameters, self.scheme.as_ref()).transpose());
        }

        jacobian
    }

    fn residual_count(&self) -> usize {
        self.bonds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancora_core::CashFlow;
    use ancora_curves::AnchorCurve;
    use approx::assert_relative_eq;
    use parking_lot::RwLock;
    use std::sync::Arc;

    fn bond_with_quote(key: &str, bid: f64, ask: f64) -> Bond {
        let mut bond = Bond::new(key);
        bond.bid = bid;
        bond.ask = ask;
        bond.maturity = 45365.0;
        bond.set_cash_flows(vec![CashFlow::new(45365.0, 0.0, 1_000_000.0)]);
        bond
    }

    fn set_with_curve(bonds: Vec<Bond>) -> BondSet {
        let curve: SharedCurve =
            Arc::new(RwLock::new(AnchorCurve::flat(vec![45000.0, 45730.0], 0.5)));

        let mut set = BondSet::new();
        for bond in bonds {
            set.insert(bond);
        }
        set.set_curve(&curve);
        set
    }

    #[test]
    fn test_insert_ignores_duplicate_keys() {
        let mut set = BondSet::new();

        let mut first = Bond::new("B1");
        first.coupon = 4.0;
        set.insert(first);

        let mut second = Bond::new("B1");
        second.coupon = 9.0;
        set.insert(second);

        assert_eq!(set.len(), 1);
        assert_relative_eq!(set.get("B1").unwrap().coupon, 4.0);
    }

    #[test]
    fn test_keep_prunes_dropped_tickers() {
        let mut set = set_with_curve(vec![
            bond_with_quote("B1", 99.0, 100.0),
            bond_with_quote("B2", 100.0, 101.0),
            bond_with_quote("B3", 101.0, 102.0),
        ]);

        set.keep(&["B1".to_string(), "B3".to_string()]);

        assert_eq!(set.len(), 2);
        assert!(set.contains_key("B1"));
        assert!(!set.contains_key("B2"));
        assert!(set.contains_key("B3"));
    }

    #[test]
    fn test_objective_value_is_half_sum_of_squares() {
        let set = set_with_curve(vec![
            bond_with_quote("B1", 99.0, 100.0),
            bond_with_quote("B2", 100.0, 101.0),
        ]);

        let parameters = DVector::from_vec(vec![0.5, 0.5]);
        let residuals = set.residuals(&parameters);
        let expected = 0.5 * residuals.norm_squared();

        assert_relative_eq!(set.value(&parameters), expected, epsilon = 1e-12);
        assert_eq!(residuals.len(), 2);
    }

    #[test]
    fn test_jacobian_shape_matches_set() {
        let set = set_with_curve(vec![
            bond_with_quote("B1", 99.0, 100.0),
            bond_with_quote("B2", 100.0, 101.0),
            bond_with_quote("B3", 101.0, 102.0),
        ]);

        let parameters = DVector::from_vec(vec![0.5, 0.5]);
        let jacobian = set.jacobian(&parameters);

        assert_eq!(jacobian.nrows(), 3);
        assert_eq!(jacobian.ncols(), 2);
        // a yield bump moves every model price
        assert!(jacobian.iter().any(|v| v.abs() > 0.0));
    }

    #[test]
    fn test_apply_parameters_broadcasts_regression_slice() {
        let mut set = set_with_curve(vec![bond_with_quote("B1", 99.0, 100.0)]);

        let coefficients: SharedCoefficients = Arc::new(RwLock::new(
            crate::RegressionCoefficients::from_flags(&[false, false, false, true, false]),
        ));
        set.set_coefficients(&coefficients);

        set.apply_parameters(&DVector::from_vec(vec![0.5, 0.5, 0.125]));

        assert_relative_eq!(coefficients.read().bid_ask_spread(), 0.125);
    }

    #[test]
    fn test_broadcast_handles_reach_every_bond() {
        let mut set = set_with_curve(vec![bond_with_quote("B1", 99.0, 100.0)]);

        let coefficients: SharedCoefficients = Arc::new(RwLock::new(
            crate::RegressionCoefficients::from_flags(&[true, false, false, false, false]),
        ));
        set.set_coefficients(&coefficients);

        let parameters = DVector::from_vec(vec![0.5, 0.5, 0.07]);
        let _ = set.value(&parameters);

        // evaluating at a longer vector scattered the extra slot
        assert_relative_eq!(coefficients.read().amount_outstanding(), 0.07);
    }
}
