//! Error types for the fitting engine.

use thiserror::Error;

use ancora_bonds::BondError;
use ancora_curves::CurveError;
use ancora_math::MathError;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in the fitting engine.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// The engine has not been initialised yet.
    #[error("Engine not initialised")]
    NotInitialised,

    /// An update referenced a ticker the collection does not hold.
    #[error("Unknown ticker: {ticker}")]
    UnknownTicker {
        /// The missing ticker.
        ticker: String,
    },

    /// A snapshot's parallel lists disagree in length.
    #[error("Snapshot field {field} has {got} entries, expected {expected}")]
    SnapshotLengthMismatch {
        /// Which list is malformed.
        field: &'static str,
        /// Expected number of entries (one per ticker).
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// The update queue is no longer accepting items.
    #[error("Update queue disconnected")]
    QueueDisconnected,

    /// Instrument-layer failure.
    #[error(transparent)]
    Bond(#[from] BondError),

    /// Curve-layer failure.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Numerical failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl EngineError {
    /// Creates an unknown-ticker error.
    #[must_use]
    pub fn unknown_ticker(ticker: impl Into<String>) -> Self {
        Self::UnknownTicker {
            ticker: ticker.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::unknown_ticker("GILT29");
        assert!(format!("{}", err).contains("GILT29"));
    }

    #[test]
    fn test_bond_error_converts() {
        let err: EngineError = BondError::instrument_not_found("X").into();
        assert!(matches!(err, EngineError::Bond(_)));
    }
}
