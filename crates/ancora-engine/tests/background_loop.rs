//! Behavior of the background fit loop: queue ordering, stop semantics,
//! fatal errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ancora_bonds::Bond;
use ancora_core::CashFlow;
use ancora_data::StaticInstrumentSource;
use ancora_engine::{BondFitter, FitterState, MarketSnapshot};

const AS_OF: f64 = 45000.0;

fn zero_coupon(key: &str, maturity: f64) -> Bond {
    let mut bond = Bond::new(key);
    bond.maturity = maturity;
    bond.settlement_date = AS_OF + 2.0;
    bond.set_cash_flows(vec![CashFlow::new(maturity, 0.0, 1_000_000.0)]);
    bond
}

fn snapshot_for(tickers: &[&str], bids: Vec<f64>, asks: Vec<f64>) -> MarketSnapshot {
    MarketSnapshot {
        tickers: tickers.iter().map(|t| (*t).to_string()).collect(),
        benchmark_flags: vec![false; tickers.len()],
        ctd_flags: vec![false; tickers.len()],
        weights: vec![1.0; tickers.len()],
        bids,
        asks,
        as_of: AS_OF,
        calculate_yields: false,
        anchor_dates: vec![AS_OF, AS_OF + 1825.0],
        coeff_flags: vec![false; 5],
    }
}

fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    predicate()
}

#[test]
fn test_queued_bids_apply_in_order() {
    let source = Arc::new(
        StaticInstrumentSource::new().with_instrument(zero_coupon("B1", AS_OF + 365.0)),
    );
    let fitter = BondFitter::with_defaults(source);

    // one bond against two knots: every pass reports under-determined, but
    // the queue is still drained by the loop thread
    fitter
        .initialise(&snapshot_for(&["B1"], vec![99.0], vec![100.0]))
        .unwrap();
    assert!(fitter.start());

    for bid in [98.0, 97.0, 96.5] {
        let changed = fitter
            .update(&snapshot_for(&["B1"], vec![bid], vec![100.0]))
            .unwrap();
        // queued price patches alone do not count as a direct change
        assert!(!changed);
    }

    // the last enqueued bid wins: spread = 100 - 96.5
    let drained = wait_until(Duration::from_secs(5), || {
        fitter
            .bid_ask_spread()
            .first()
            .is_some_and(|spread| (spread - 3.5).abs() < 1e-9)
    });
    assert!(drained, "queue not drained, spread {:?}", fitter.bid_ask_spread());

    assert!(fitter.loop_count() >= 1);
    assert!(fitter.stop());
}

#[test]
fn test_loop_fits_after_update() {
    let source = Arc::new(
        StaticInstrumentSource::new()
            .with_instrument(zero_coupon("B1", AS_OF + 365.0))
            .with_instrument(zero_coupon("B2", AS_OF + 730.0))
            .with_instrument(zero_coupon("B3", AS_OF + 1460.0)),
    );
    let fitter = BondFitter::with_defaults(source);

    fitter
        .initialise(&snapshot_for(
            &["B1", "B2", "B3"],
            vec![99.0, 100.0, 101.0],
            vec![100.0, 101.0, 102.0],
        ))
        .unwrap();
    assert!(fitter.start());

    // a weight change applies directly and wakes the loop
    let mut snapshot = snapshot_for(
        &["B1", "B2", "B3"],
        vec![99.0, 100.0, 101.0],
        vec![100.0, 101.0, 102.0],
    );
    snapshot.weights[0] = 2.0;
    assert!(fitter.update(&snapshot).unwrap());

    let fitted = wait_until(Duration::from_secs(10), || {
        fitter.solver_result_available()
    });
    assert!(fitted, "loop never fitted, status: {}", fitter.status());
    assert!(fitter.cost().is_finite());
    assert_eq!(fitter.fitted_anchor_yields().len(), 2);

    assert!(fitter.stop());
    assert_eq!(fitter.state(), FitterState::Stopped);
}

#[test]
fn test_stale_queue_item_is_fatal() {
    let source = Arc::new(
        StaticInstrumentSource::new()
            .with_instrument(zero_coupon("B1", AS_OF + 365.0))
            .with_instrument(zero_coupon("B2", AS_OF + 730.0)),
    );
    let fitter = BondFitter::with_defaults(source);

    fitter
        .initialise(&snapshot_for(
            &["B1", "B2"],
            vec![99.0, 100.0],
            vec![100.0, 101.0],
        ))
        .unwrap();

    // queue a bid for B2, then drop B2 before the loop ever runs
    fitter
        .update(&snapshot_for(
            &["B1", "B2"],
            vec![99.0, 98.5],
            vec![100.0, 101.0],
        ))
        .unwrap();
    fitter
        .update(&snapshot_for(&["B1"], vec![99.0], vec![100.0]))
        .unwrap();

    assert!(fitter.start());

    let died = wait_until(Duration::from_secs(5), || {
        fitter.state() == FitterState::Stopped
    });
    assert!(died, "loop should terminate on a stale queue item");

    let message = fitter.last_error_message().expect("fatal error recorded");
    assert!(message.contains("B2"), "unexpected error: {message}");
    assert!(!fitter.solver_result_available());

    // an explicit start is required, and possible, after a fatal stop
    assert!(fitter.start());
    assert!(fitter.stop());
}

#[test]
fn test_stop_without_start_is_clean() {
    let source = Arc::new(
        StaticInstrumentSource::new().with_instrument(zero_coupon("B1", AS_OF + 365.0)),
    );
    let fitter = BondFitter::with_defaults(source);

    assert_eq!(fitter.state(), FitterState::Stopped);
    assert!(fitter.stop());
}
