//! The background bond fitter.
//!
//! [`BondFitter`] owns the instrument set, the anchor curve, the regression
//! coefficients and one dedicated background thread that re-solves the
//! least-squares fit whenever something changed. Foreground callers push
//! [`MarketSnapshot`] updates and read published results; neither ever
//! waits on a fit in progress.
//!
//! # Concurrency model
//!
//! Single writer, many readers. Live bid prices are only ever mutated by
//! the loop thread, which drains a command channel in enqueue order; every
//! other published field sits behind its own small lock so each read
//! accessor takes exactly one lock and returns a copy. Stopping is
//! cooperative: the loop finishes any in-flight solve before it observes
//! the stop signal, and [`BondFitter::stop`] waits on a deadline rather
//! than polling.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use nalgebra::DVector;
use parking_lot::{Condvar, Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use ancora_bonds::{
    Bond, BondSet, InstrumentSource, RegressionCoefficients, SharedCoefficients, SharedCurve,
    COEFF_SEED,
};
use ancora_core::QUOTE_DIFF_EPSILON;
use ancora_curves::AnchorCurve;
use ancora_math::solvers::{LeastSquaresSolver, LevenbergMarquardt, SolverResult};

use crate::error::{EngineError, EngineResult};
use crate::snapshot::{
    changed_flag_indices, changed_indices, changed_string_indices, flags_changed, MarketSnapshot,
};

/// Configuration for the bond fitter.
#[derive(Debug, Clone)]
pub struct FitterConfig {
    /// Seed yield given to every anchor knot on (re)initialisation.
    pub curve_seed: f64,
    /// How long [`BondFitter::stop`] waits for the loop to terminate.
    pub stop_timeout: Duration,
    /// Capacity of the pending-update queue.
    pub queue_capacity: usize,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            curve_seed: 0.5,
            stop_timeout: Duration::from_secs(1),
            queue_capacity: 1024,
        }
    }
}

impl FitterConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stop deadline.
    #[must_use]
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    /// Sets the pending-update queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

/// Lifecycle state of the background loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitterState {
    /// No loop thread is running.
    Stopped,
    /// The loop thread is processing updates.
    Running,
    /// A stop has been requested and the loop has not yet confirmed it.
    Stopping,
}

/// Work items drained by the loop thread.
enum FitCommand {
    /// Patch one bond's bid price.
    BidPrice {
        /// Request key of the owning bond.
        key: String,
        /// The new bid.
        bid: f64,
    },
    /// Something outside the queue changed; refit.
    Refit,
}

/// State shared between the foreground handle and the loop thread.
///
/// Each field that readers touch is guarded on its own, so a status poll
/// never contends with a solve that holds the collection.
struct FitterShared {
    source: Arc<dyn InstrumentSource>,
    solver: Box<dyn LeastSquaresSolver>,
    config: FitterConfig,
    bonds: Mutex<BondSet>,
    curve: SharedCurve,
    coefficients: SharedCoefficients,
    solver_result: Mutex<Option<SolverResult>>,
    status_message: Mutex<String>,
    last_error: Mutex<Option<String>>,
    last_fit_time: Mutex<DateTime<Utc>>,
    last_fit_length: Mutex<Duration>,
    loop_count: AtomicU64,
    receiver: Receiver<FitCommand>,
    state: Mutex<FitterState>,
    state_changed: Condvar,
}

impl FitterShared {
    /// Body of the background thread.
    fn run_loop(&self, control: Receiver<()>) {
        info!("fit loop started");

        match self.loop_body(&control) {
            Ok(()) => info!("fit loop stopped"),
            Err(e) => {
                error!(error = %e, "fit loop terminated");
                *self.last_error.lock() = Some(e.to_string());
                *self.solver_result.lock() = None;
            }
        }

        let mut state = self.state.lock();
        *state = FitterState::Stopped;
        self.state_changed.notify_all();
    }

    fn loop_body(&self, control: &Receiver<()>) -> EngineResult<()> {
        loop {
            crossbeam_channel::select! {
                recv(&self.receiver) -> message => {
                    let Ok(command) = message else {
                        return Ok(());
                    };

                    let mut changed = false;
                    self.apply_command(command, &mut changed)?;

                    while let Ok(next) = self.receiver.try_recv() {
                        self.apply_command(next, &mut changed)?;
                    }

                    if control.try_recv().is_ok() {
                        return Ok(());
                    }

                    if changed {
                        self.loop_count.fetch_add(1, Ordering::Relaxed);
                        self.fit();
                    }
                }
                recv(control) -> _ => return Ok(()),
            }
        }
    }

    /// Applies one queued command. Queue items are the only path that
    /// mutates live bid prices, which keeps the loop thread their sole
    /// writer.
    fn apply_command(&self, command: FitCommand, changed: &mut bool) -> EngineResult<()> {
        match command {
            FitCommand::BidPrice { key, bid } => {
                let mut bonds = self.bonds.lock();
                let bond = bonds
                    .get_mut(&key)
                    .ok_or_else(|| EngineError::unknown_ticker(&key))?;
                bond.bid = bid;
                *changed = true;
            }
            FitCommand::Refit => *changed = true,
        }

        Ok(())
    }

    /// Runs one solve and publishes the outcome.
    fn fit(&self) {
        let started = Instant::now();

        let curve_len = self.curve.read().len();
        let active = self.coefficients.read().available();
        let parameter_count = curve_len + active;

        let mut initial = DVector::from_element(parameter_count, COEFF_SEED);
        for i in 0..curve_len {
            initial[i] = self.config.curve_seed;
        }

        let mut bonds = self.bonds.lock();
        let instrument_count = bonds.len();

        if instrument_count < parameter_count {
            warn!(
                instruments = instrument_count,
                parameters = parameter_count,
                "under-determined system, skipping solve"
            );
            *self.solver_result.lock() = None;
            *self.status_message.lock() = format!(
                "not enough instruments to find solution {instrument_count} < {parameter_count}"
            );
            drop(bonds);
            self.record_fit_clock(started);
            return;
        }

        *self.status_message.lock() = "Fitting".to_string();

        match self.solver.estimate(&*bonds, initial) {
            Ok(result) => self.publish_fit(&mut bonds, result, curve_len),
            Err(e) => {
                warn!(error = %e, "solver failed");
                *self.solver_result.lock() = None;
                *self.status_message.lock() = e.to_string();
            }
        }

        drop(bonds);
        self.record_fit_clock(started);
    }

    /// Pushes a converged solve into the curve, the coefficients and the
    /// per-bond model values.
    fn publish_fit(&self, bonds: &mut BondSet, result: SolverResult, curve_len: usize) {
        let write_back = if result.parameters.len() < curve_len {
            Err(ancora_curves::CurveError::solver_output_mismatch(
                curve_len,
                result.parameters.len(),
            ))
        } else {
            self.curve
                .write()
                .apply_solver_output(&result.parameters.as_slice()[..curve_len])
        };

        // the knot set can be swapped while a solve is in flight; a stale
        // result is discarded rather than force-fitted
        if let Err(e) = write_back {
            warn!(error = %e, "discarding stale solver output");
            *self.solver_result.lock() = None;
            *self.status_message.lock() = e.to_string();
            return;
        }

        self.coefficients
            .write()
            .apply_solver_output(result.parameters.as_slice(), curve_len);

        for bond in bonds.iter_mut() {
            let model_price = bond.model_clean_price(&result.parameters);
            bond.model_price = model_price;
        }

        match self.source.model_yields(bonds) {
            Ok(()) => {
                debug!(
                    cost = result.value,
                    iterations = result.iterations,
                    "fit complete"
                );
                *self.solver_result.lock() = Some(result);
            }
            Err(e) => {
                warn!(error = %e, "model yield refresh failed");
                *self.solver_result.lock() = None;
                *self.status_message.lock() = e.to_string();
            }
        }
    }

    fn record_fit_clock(&self, started: Instant) {
        *self.last_fit_time.lock() = Utc::now();
        *self.last_fit_length.lock() = started.elapsed();
    }
}

/// The incremental curve fitting engine.
///
/// Owns a [`BondSet`], an [`AnchorCurve`] and [`RegressionCoefficients`],
/// and continuously re-fits them to a changing market snapshot on a
/// background thread.
///
/// # Example
///
/// ```rust,ignore
/// let fitter = BondFitter::with_defaults(source);
/// fitter.initialise(&snapshot)?;
/// fitter.start();
/// // ... push updates, read cost/status/yields ...
/// fitter.update(&next_snapshot)?;
/// fitter.stop();
/// ```
pub struct BondFitter {
    shared: Arc<FitterShared>,
    sender: Sender<FitCommand>,
    control: Mutex<Option<Sender<()>>>,
    inputs: Mutex<Option<MarketSnapshot>>,
    initialised: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BondFitter {
    /// Creates a fitter over an instrument source and a solver.
    #[must_use]
    pub fn new(
        source: Arc<dyn InstrumentSource>,
        solver: Box<dyn LeastSquaresSolver>,
        config: FitterConfig,
    ) -> Self {
        let (sender, receiver) = bounded(config.queue_capacity);

        let shared = Arc::new(FitterShared {
            source,
            solver,
            config,
            bonds: Mutex::new(BondSet::new()),
            curve: Arc::new(RwLock::new(AnchorCurve::flat(Vec::new(), 0.0))),
            coefficients: Arc::new(RwLock::new(RegressionCoefficients::new())),
            solver_result: Mutex::new(None),
            status_message: Mutex::new(String::new()),
            last_error: Mutex::new(None),
            last_fit_time: Mutex::new(Utc::now()),
            last_fit_length: Mutex::new(Duration::ZERO),
            loop_count: AtomicU64::new(0),
            receiver,
            state: Mutex::new(FitterState::Stopped),
            state_changed: Condvar::new(),
        });

        Self {
            shared,
            sender,
            control: Mutex::new(None),
            inputs: Mutex::new(None),
            initialised: AtomicBool::new(false),
            worker: Mutex::new(None),
        }
    }

    /// Creates a fitter with the bundled Levenberg-Marquardt solver.
    #[must_use]
    pub fn with_defaults(source: Arc<dyn InstrumentSource>) -> Self {
        Self::new(
            source,
            Box::new(LevenbergMarquardt::new()),
            FitterConfig::default(),
        )
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Current lifecycle state of the background loop.
    #[must_use]
    pub fn state(&self) -> FitterState {
        *self.shared.state.lock()
    }

    /// Spawns the background fit loop. Returns false when it is already
    /// running.
    pub fn start(&self) -> bool {
        {
            let mut state = self.shared.state.lock();
            if *state != FitterState::Stopped {
                return false;
            }
            *state = FitterState::Running;
        }

        let (control_sender, control_receiver) = bounded(1);
        *self.control.lock() = Some(control_sender);

        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("ancora-fit-loop".to_string())
            .spawn(move || shared.run_loop(control_receiver));

        match spawned {
            Ok(handle) => {
                *self.worker.lock() = Some(handle);
                true
            }
            Err(e) => {
                error!(error = %e, "failed to spawn fit loop");
                *self.shared.state.lock() = FitterState::Stopped;
                *self.control.lock() = None;
                false
            }
        }
    }

    /// Signals the loop to stop and waits, bounded by the configured
    /// deadline. Returns false when the loop did not confirm in time; an
    /// in-flight solve is never interrupted.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.shared.state.lock();
            match *state {
                FitterState::Stopped => return true,
                FitterState::Running => *state = FitterState::Stopping,
                FitterState::Stopping => {}
            }
        }

        if let Some(control) = self.control.lock().as_ref() {
            let _ = control.try_send(());
        }

        let deadline = Instant::now() + self.shared.config.stop_timeout;
        let mut state = self.shared.state.lock();
        while *state != FitterState::Stopped {
            if self
                .shared
                .state_changed
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
        }
        let stopped = *state == FitterState::Stopped;
        drop(state);

        if stopped {
            if let Some(handle) = self.worker.lock().take() {
                let _ = handle.join();
            }
            *self.control.lock() = None;
        }

        stopped
    }

    // =========================================================================
    // INITIALISE / UPDATE
    // =========================================================================

    /// Builds the instrument set, the curve and the coefficients from
    /// scratch. Must run before [`update`](Self::update) is accepted.
    pub fn initialise(&self, snapshot: &MarketSnapshot) -> EngineResult<()> {
        snapshot.validate()?;
        info!(instruments = snapshot.tickers.len(), "initialising");

        *self.shared.solver_result.lock() = None;

        {
            let mut bonds = self.shared.bonds.lock();
            bonds.clear();

            for (i, ticker) in snapshot.tickers.iter().enumerate() {
                *self.shared.status_message.lock() =
                    format!("Initialising bond {} - {}", i + 1, ticker);
                let bond = self.build_bond(snapshot, i)?;
                bonds.insert(bond);
            }

            *self.shared.status_message.lock() = "Initialising anchor curve".to_string();
            self.shared
                .curve
                .write()
                .reinitialize(snapshot.anchor_dates.clone(), self.shared.config.curve_seed);
            bonds.set_curve(&self.shared.curve);

            *self.shared.status_message.lock() = "Initialising coefficients".to_string();
            self.shared
                .coefficients
                .write()
                .update_flags(&snapshot.coeff_flags);
            bonds.set_coefficients(&self.shared.coefficients);
        }

        *self.inputs.lock() = Some(snapshot.clone());
        self.initialised.store(true, Ordering::Release);

        Ok(())
    }

    /// Applies an incremental snapshot, category by category, and reports
    /// whether anything changed.
    ///
    /// Bid price changes are queued for the loop thread rather than applied
    /// here; everything else is applied directly. A rejected coefficient
    /// switch ("No benchmarks set" / "No CTDs set") reports no change and
    /// leaves the coefficients untouched, although categories already
    /// processed stay committed.
    pub fn update(&self, snapshot: &MarketSnapshot) -> EngineResult<bool> {
        if !self.initialised.load(Ordering::Acquire) {
            *self.shared.status_message.lock() = "Not initialised".to_string();
            return Ok(false);
        }

        snapshot.validate()?;

        let mut inputs = self.inputs.lock();
        let Some(previous) = inputs.as_mut() else {
            return Ok(false);
        };

        let mut updated = false;

        // ticker set: an as-of change or any positional difference
        // rebuilds the membership
        let ticker_set_changed = previous.as_of != snapshot.as_of
            || previous.tickers.len() != snapshot.tickers.len()
            || !changed_string_indices(&previous.tickers, &snapshot.tickers).is_empty();

        if ticker_set_changed {
            debug!("ticker set changed");
            let mut bonds = self.shared.bonds.lock();

            for (i, ticker) in snapshot.tickers.iter().enumerate() {
                if !bonds.contains_key(ticker) {
                    let mut bond = self.build_bond(snapshot, i)?;
                    bond.set_curve(self.shared.curve.clone());
                    bond.set_coefficients(self.shared.coefficients.clone());
                    bonds.insert(bond);
                }
            }

            bonds.keep(&snapshot.tickers);
            drop(bonds);

            previous.tickers = snapshot.tickers.clone();
            previous.benchmark_flags = snapshot.benchmark_flags.clone();
            previous.ctd_flags = snapshot.ctd_flags.clone();
            previous.weights = snapshot.weights.clone();
            previous.bids = snapshot.bids.clone();
            previous.asks = snapshot.asks.clone();
            previous.as_of = snapshot.as_of;

            updated = true;
        }

        // anchor dates: reseed the curve wholesale
        if previous.anchor_dates.len() != snapshot.anchor_dates.len()
            || !changed_indices(
                &previous.anchor_dates,
                &snapshot.anchor_dates,
                QUOTE_DIFF_EPSILON,
            )
            .is_empty()
        {
            debug!("anchor dates changed");
            self.shared
                .curve
                .write()
                .reinitialize(snapshot.anchor_dates.clone(), self.shared.config.curve_seed);
            previous.anchor_dates = snapshot.anchor_dates.clone();
            updated = true;
        }

        // bid prices: queued, applied only by the loop thread
        let bid_changes = changed_indices(&previous.bids, &snapshot.bids, QUOTE_DIFF_EPSILON);
        if !bid_changes.is_empty() {
            for &i in &bid_changes {
                self.sender
                    .send(FitCommand::BidPrice {
                        key: snapshot.tickers[i].clone(),
                        bid: snapshot.bids[i],
                    })
                    .map_err(|_| EngineError::QueueDisconnected)?;
            }
            previous.bids = snapshot.bids.clone();
        }

        // benchmark flags: applied under the collection lock
        let benchmark_changes =
            changed_flag_indices(&previous.benchmark_flags, &snapshot.benchmark_flags);
        if !benchmark_changes.is_empty() {
            let mut bonds = self.shared.bonds.lock();
            for &i in &benchmark_changes {
                let ticker = &snapshot.tickers[i];
                let bond = bonds
                    .get_mut(ticker)
                    .ok_or_else(|| EngineError::unknown_ticker(ticker))?;
                bond.benchmark = snapshot.benchmark_flags[i];
            }
            drop(bonds);
            previous.benchmark_flags = snapshot.benchmark_flags.clone();
            updated = true;
        }

        // CTD flags
        let ctd_changes = changed_flag_indices(&previous.ctd_flags, &snapshot.ctd_flags);
        if !ctd_changes.is_empty() {
            let mut bonds = self.shared.bonds.lock();
            for &i in &ctd_changes {
                let ticker = &snapshot.tickers[i];
                let bond = bonds
                    .get_mut(ticker)
                    .ok_or_else(|| EngineError::unknown_ticker(ticker))?;
                bond.ctd = snapshot.ctd_flags[i];
            }
            drop(bonds);
            previous.ctd_flags = snapshot.ctd_flags.clone();
            updated = true;
        }

        // weights
        let weight_changes =
            changed_indices(&previous.weights, &snapshot.weights, QUOTE_DIFF_EPSILON);
        if !weight_changes.is_empty() {
            let mut bonds = self.shared.bonds.lock();
            for &i in &weight_changes {
                let ticker = &snapshot.tickers[i];
                let bond = bonds
                    .get_mut(ticker)
                    .ok_or_else(|| EngineError::unknown_ticker(ticker))?;
                bond.weight = snapshot.weights[i];
            }
            drop(bonds);
            previous.weights = snapshot.weights.clone();
            updated = true;
        }

        // regression switch vector, guarded on indicator availability
        if flags_changed(&previous.coeff_flags, &snapshot.coeff_flags) {
            let probe = RegressionCoefficients::from_flags(&snapshot.coeff_flags);

            {
                let bonds = self.shared.bonds.lock();

                if probe.benchmark_on() && !bonds.iter().any(|bond| bond.benchmark) {
                    *self.shared.solver_result.lock() = None;
                    *self.shared.status_message.lock() = "No benchmarks set".to_string();
                    return Ok(false);
                }

                if probe.ctd_on() && !bonds.iter().any(|bond| bond.ctd) {
                    *self.shared.solver_result.lock() = None;
                    *self.shared.status_message.lock() = "No CTDs set".to_string();
                    return Ok(false);
                }
            }

            debug!("coefficient switches changed");
            self.shared
                .coefficients
                .write()
                .update_flags(&snapshot.coeff_flags);
            self.shared.curve.write().reseed(self.shared.config.curve_seed);
            previous.coeff_flags = snapshot.coeff_flags.clone();
            updated = true;
        }

        if updated {
            self.sender
                .send(FitCommand::Refit)
                .map_err(|_| EngineError::QueueDisconnected)?;
        }

        Ok(updated)
    }

    /// Builds one bond from the source and the snapshot row at `index`.
    /// Curve and coefficient handles are installed by the caller.
    fn build_bond(&self, snapshot: &MarketSnapshot, index: usize) -> EngineResult<Bond> {
        let ticker = &snapshot.tickers[index];
        let mut bond = self.shared.source.fetch_instrument(ticker)?;

        bond.as_of = snapshot.as_of;
        bond.bid = snapshot.bids[index];
        bond.ask = snapshot.asks[index];
        bond.benchmark = snapshot.benchmark_flags[index];
        bond.ctd = snapshot.ctd_flags[index];
        bond.weight = snapshot.weights[index];

        if snapshot.calculate_yields {
            self.shared.source.market_yields(&mut bond)?;
        }

        Ok(bond)
    }

    /// Runs one fit on the calling thread.
    ///
    /// The background loop calls the same routine; exposing it lets callers
    /// fit synchronously without starting the loop.
    pub fn fit(&self) {
        self.shared.fit();
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    /// Objective value of the latest available solve, zero when none.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.shared
            .solver_result
            .lock()
            .as_ref()
            .map_or(0.0, |r| r.value)
    }

    /// Iteration count of the latest available solve, zero when none.
    #[must_use]
    pub fn evals(&self) -> usize {
        self.shared
            .solver_result
            .lock()
            .as_ref()
            .map_or(0, |r| r.iterations)
    }

    /// True when a solve has completed and its result is published.
    #[must_use]
    pub fn solver_result_available(&self) -> bool {
        self.shared.solver_result.lock().is_some()
    }

    /// A copy of the latest converged parameter vector.
    #[must_use]
    pub fn fitted_parameters(&self) -> Option<Vec<f64>> {
        self.shared
            .solver_result
            .lock()
            .as_ref()
            .map(|r| r.parameters.as_slice().to_vec())
    }

    /// A copy of the current anchor knot yields.
    #[must_use]
    pub fn fitted_anchor_yields(&self) -> Vec<f64> {
        self.shared.curve.read().values().to_vec()
    }

    /// A copy of the regression coefficient values, in fixed term order.
    #[must_use]
    pub fn coefficients(&self) -> Vec<f64> {
        self.shared.coefficients.read().values().to_vec()
    }

    /// The solver status when a result is available, else the progress or
    /// rejection message.
    #[must_use]
    pub fn status(&self) -> String {
        if let Some(result) = self.shared.solver_result.lock().as_ref() {
            return result.status.to_string();
        }

        self.shared.status_message.lock().clone()
    }

    /// Message of the error that terminated the loop, if any.
    #[must_use]
    pub fn last_error_message(&self) -> Option<String> {
        self.shared.last_error.lock().clone()
    }

    /// Wall-clock timestamp of the most recent fit attempt.
    #[must_use]
    pub fn last_fit_time(&self) -> DateTime<Utc> {
        *self.shared.last_fit_time.lock()
    }

    /// Duration of the most recent fit attempt.
    #[must_use]
    pub fn last_fit_length(&self) -> Duration {
        *self.shared.last_fit_length.lock()
    }

    /// Number of loop passes that ran a fit.
    #[must_use]
    pub fn loop_count(&self) -> u64 {
        self.shared.loop_count.load(Ordering::Relaxed)
    }

    /// Number of bonds currently held.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shared.bonds.lock().len()
    }

    /// Model clean price of one bond, zero when the ticker is unknown.
    #[must_use]
    pub fn model_clean_price(&self, ticker: &str) -> f64 {
        self.shared
            .bonds
            .lock()
            .get(ticker)
            .map_or(0.0, |bond| bond.model_price)
    }

    /// Model clean price per bond, in collection order.
    #[must_use]
    pub fn model_clean_prices(&self) -> Vec<f64> {
        self.shared
            .bonds
            .lock()
            .iter()
            .map(|bond| bond.model_price)
            .collect()
    }

    /// Amount outstanding per bond, in billions.
    #[must_use]
    pub fn amount_outstanding_in_billions(&self) -> Vec<f64> {
        self.shared
            .bonds
            .lock()
            .iter()
            .map(|bond| bond.amount_outstanding / 1.0e9)
            .collect()
    }

    /// Quoted bid/ask spread per bond.
    #[must_use]
    pub fn bid_ask_spread(&self) -> Vec<f64> {
        self.shared
            .bonds
            .lock()
            .iter()
            .map(Bond::bid_ask_spread)
            .collect()
    }

    /// Richness/cheapness versus the fitted curve, per bond.
    #[must_use]
    pub fn cheapness(&self) -> Vec<f64> {
        self.shared.bonds.lock().iter().map(Bond::cheapness).collect()
    }

    /// Maturity date per bond, as serial day numbers.
    #[must_use]
    pub fn maturity(&self) -> Vec<f64> {
        self.shared
            .bonds
            .lock()
            .iter()
            .map(|bond| bond.maturity)
            .collect()
    }

    /// Model yield per bond.
    #[must_use]
    pub fn model_yield(&self) -> Vec<f64> {
        self.shared
            .bonds
            .lock()
            .iter()
            .map(|bond| bond.model_yield_mid)
            .collect()
    }
}
