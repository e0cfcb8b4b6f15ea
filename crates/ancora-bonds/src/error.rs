//! Error types for instrument operations.

use thiserror::Error;

/// A specialized Result type for instrument operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur working with instruments and their sources.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// The source has no instrument under the requested key.
    #[error("Instrument not found: {ticker}")]
    InstrumentNotFound {
        /// The requested instrument key.
        ticker: String,
    },

    /// An instrument carries no cash flows to value.
    #[error("Instrument {ticker} has no cash flows")]
    MissingCashFlows {
        /// The instrument key.
        ticker: String,
    },

    /// A yield could not be backed out of a price.
    #[error("Yield solve failed for {ticker}: {reason}")]
    YieldSolveFailed {
        /// The instrument key.
        ticker: String,
        /// Why the solve failed.
        reason: String,
    },

    /// The source itself failed (I/O, malformed records, ...).
    #[error("Instrument source error: {reason}")]
    SourceFailure {
        /// Description of the failure.
        reason: String,
    },
}

impl BondError {
    /// Creates an instrument-not-found error.
    #[must_use]
    pub fn instrument_not_found(ticker: impl Into<String>) -> Self {
        Self::InstrumentNotFound {
            ticker: ticker.into(),
        }
    }

    /// Creates a yield-solve failure error.
    #[must_use]
    pub fn yield_solve_failed(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::YieldSolveFailed {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Creates a source failure error.
    #[must_use]
    pub fn source_failure(reason: impl Into<String>) -> Self {
        Self::SourceFailure {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BondError::instrument_not_found("GB00B16NNR78");
        assert!(format!("{}", err).contains("GB00B16NNR78"));
    }
}
