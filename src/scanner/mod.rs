//! Scanner module - the collision run orchestrator.
//!
//! Dispatches probe targets to a bounded pool of tokio tasks and aggregates
//! their completions. Tasks never touch shared state: each one sends a
//! completion event over a channel, and a single consumer owns the run
//! counters and the result collection.

pub mod probe;
pub mod protocol;
pub mod rate_limiter;
pub mod title;
pub mod traits;

use crate::error::{ValidationError, ValidationResult};
use crate::types::ProbeTarget;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub use probe::{HttpProber, ProbeConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};
pub use protocol::{schemes_for, Scheme};
pub use rate_limiter::RateLimiter;
pub use traits::{CollisionResult, Prober};

/// Smallest accepted concurrency.
pub const MIN_CONCURRENCY: usize = 1;
/// Largest accepted concurrency.
pub const MAX_CONCURRENCY: usize = 1000;
/// Default upper bound on one target's probe, independent of request timeouts.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cooperative stop flag shared between the caller and a run.
///
/// Checked before each dispatch; in-flight probes are left to finish or time
/// out on their own.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that no further targets be dispatched.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receiver of run events.
///
/// Called only from the run's single consumer, never concurrently.
pub trait ResultSink {
    /// A target produced collision evidence.
    fn on_result(&mut self, _result: &CollisionResult) {}

    /// A target finished, with or without a result.
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

impl ResultSink for () {}

/// Progress of the current or last run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    pub total: usize,
    pub completed: usize,
    pub running: bool,
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Targets generated for the run.
    pub total: usize,
    /// Targets actually dispatched.
    pub attempted: usize,
    /// Targets that produced a result.
    pub found: usize,
    /// Whether dispatch ended early because of a stop request.
    pub stopped: bool,
}

/// Configuration for a collision run.
#[derive(Debug, Clone)]
pub struct ScanJobConfig {
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Ceiling on one target's probe.
    pub attempt_timeout: Duration,
    /// Dispatches per second, 0 for unlimited.
    pub rate_limit: u32,
}

impl Default for ScanJobConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            rate_limit: 0,
        }
    }
}

impl ScanJobConfig {
    /// Set the concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-target ceiling.
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Set the rate limit.
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    /// Check the concurrency bounds and the attempt ceiling.
    pub fn validate(&self) -> ValidationResult<()> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ValidationError::Concurrency {
                value: self.concurrency,
                min: MIN_CONCURRENCY,
                max: MAX_CONCURRENCY,
            });
        }
        if self.attempt_timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout {
                name: "attempt timeout",
            });
        }
        Ok(())
    }
}

/// Completion event sent from a probe task to the consumer.
struct Completion {
    target: ProbeTarget,
    result: Option<CollisionResult>,
}

/// Orchestrates collision runs over a prober.
pub struct CollisionScanner<P> {
    prober: Arc<P>,
    config: ScanJobConfig,
    state: RunState,
    results: Vec<CollisionResult>,
}

impl<P: Prober + 'static> CollisionScanner<P> {
    /// Create a scanner, rejecting out-of-range concurrency.
    pub fn new(prober: P, config: ScanJobConfig) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self {
            prober: Arc::new(prober),
            config,
            state: RunState::default(),
            results: Vec::new(),
        })
    }

    /// Progress counters of the current or last run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Results retained since the last [`clear`](Self::clear).
    pub fn results(&self) -> &[CollisionResult] {
        &self.results
    }

    /// Take the retained results, leaving the collection empty.
    pub fn take_results(&mut self) -> Vec<CollisionResult> {
        std::mem::take(&mut self.results)
    }

    /// Empty the result collection and reset the counters.
    pub fn clear(&mut self) {
        self.results.clear();
        self.state = RunState::default();
    }

    /// Probe every target, at most `concurrency` at a time.
    ///
    /// Targets are dispatched in order until they run out or `stop` is
    /// raised; the call returns once every dispatched probe has reported.
    /// Individual probe failures never fail the run.
    pub async fn run<S: ResultSink>(
        &mut self,
        targets: Vec<ProbeTarget>,
        sink: &mut S,
        stop: &StopSignal,
    ) -> RunSummary {
        let total = targets.len();
        let concurrency = self.config.concurrency;
        let attempt_timeout = self.config.attempt_timeout;
        let limiter = RateLimiter::new(self.config.rate_limit);

        self.state = RunState {
            total,
            completed: 0,
            running: true,
        };
        info!(total, concurrency, "starting collision run");

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (tx, mut rx) = mpsc::channel::<Completion>(concurrency);
        let prober = Arc::clone(&self.prober);

        let dispatch = async move {
            let mut attempted = 0;

            for target in targets {
                if stop.is_stopped() {
                    break;
                }

                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };
                if let Some(limiter) = &limiter {
                    limiter.wait().await;
                }

                // Stop may have arrived while waiting for a free slot
                if stop.is_stopped() {
                    break;
                }

                attempted += 1;
                let tx = tx.clone();
                let prober = Arc::clone(&prober);

                tokio::spawn(async move {
                    let result = match timeout(attempt_timeout, prober.probe(&target)).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(
                                probe = %target,
                                ceiling_ms = attempt_timeout.as_millis() as u64,
                                "probe exceeded attempt ceiling"
                            );
                            None
                        }
                    };

                    // The receiver lives until every sender is gone
                    let _ = tx.send(Completion { target, result }).await;
                    drop(permit);
                });
            }

            attempted
        };

        let state = &mut self.state;
        let results = &mut self.results;

        let consume = async {
            let mut found = 0;

            while let Some(Completion { target, result }) = rx.recv().await {
                state.completed += 1;
                sink.on_progress(state.completed, state.total);

                if let Some(result) = result {
                    debug!(probe = %target, status = result.status_code, "collision found");
                    found += 1;
                    sink.on_result(&result);
                    results.push(result);
                }
            }

            found
        };

        let (attempted, found) = tokio::join!(dispatch, consume);

        self.state.running = false;
        let summary = RunSummary {
            total,
            attempted,
            found,
            stopped: attempted < total && stop.is_stopped(),
        };

        info!(
            attempted = summary.attempted,
            found = summary.found,
            stopped = summary.stopped,
            "collision run finished"
        );

        summary
    }
}
