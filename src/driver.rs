// src/driver.rs

//! Background layout solver. One worker thread per layout runs the minimizer loop
//! and publishes every accepted iterate to a mutex-protected position vector; the
//! owning side polls snapshots for display, may request cancellation, and joins the
//! thread once the done flag is up. The flags are cooperative: cancellation is
//! polled once per outer iteration and never interrupts an in-progress line search.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::linesearch::SearchStatus;
use crate::minimize::Minimizer;
use crate::objective::{GraphObjective, LinkInfo};

/// Half-width of the uniform range the initial free coordinates are drawn from.
const INITIAL_SPREAD: f64 = 0.5;

/// Knobs for one layout computation.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Explicit RNG seed for a reproducible initial layout; entropy-seeded when
    /// absent.
    pub seed: Option<u64>,
    /// Outer iteration cap.
    pub max_iterations: usize,
    /// Convergence threshold on the squared gradient norm.
    pub tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            seed: None,
            max_iterations: 200,
            tolerance: 1e-6,
        }
    }
}

/// Sets the done flag when dropped, so it is set on every exit path out of the
/// worker, panics included, so the owner can always observe completion and join.
struct DoneGuard(Arc<AtomicBool>);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Handle to a running (or finished) layout computation.
pub struct LayoutDriver {
    shared: Arc<Mutex<Vec<f64>>>,
    cancel: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
    iterations: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
    node_count: usize,
}

impl LayoutDriver {
    /// Seed a random initial layout for `node_count` nodes (node 0 pinned at the
    /// origin, so 2*(N-1) free scalars) and spawn the solve thread.
    pub fn start(node_count: usize, links: Vec<LinkInfo>, config: LayoutConfig) -> Self {
        let dim = 2 * node_count.saturating_sub(1);
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let initial: Vec<f64> = (0..dim)
            .map(|_| rng.gen_range(-INITIAL_SPREAD..INITIAL_SPREAD))
            .collect();

        let shared = Arc::new(Mutex::new(initial));
        let cancel = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        let iterations = Arc::new(AtomicUsize::new(0));

        let handle = {
            let shared = Arc::clone(&shared);
            let cancel = Arc::clone(&cancel);
            let done = Arc::clone(&done);
            let iterations = Arc::clone(&iterations);
            thread::spawn(move || {
                let _guard = DoneGuard(done);
                let objective = GraphObjective::new(node_count, links);
                solve_loop(&objective, &shared, &cancel, &iterations, &config);
            })
        };

        LayoutDriver {
            shared,
            cancel,
            done,
            iterations,
            handle: Some(handle),
            node_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Whether the solve loop has exited (converged, capped, cancelled, or failed).
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Outer iterations completed so far.
    pub fn iterations(&self) -> usize {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Request cooperative cancellation. Takes effect at the next outer iteration.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Snapshot of the free coordinate vector. Always a complete vector from some
    /// finished iteration (last-writer-wins; no guarantee which iteration).
    pub fn positions(&self) -> Vec<f64> {
        self.shared.lock().unwrap().clone()
    }

    /// Clone of the shared buffer handle, for consumers that want to poll without
    /// going through the driver.
    pub fn shared(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.shared)
    }

    /// Join the worker thread and return the final free coordinate vector. The
    /// worker sets the done flag on every exit path, so this never deadlocks.
    pub fn join(mut self) -> Vec<f64> {
        if let Some(handle) = self.handle.take() {
            // A worker panic already released the shared state via the done guard;
            // the last published positions are still the best available answer.
            let _ = handle.join();
        }
        self.shared.lock().unwrap().clone()
    }
}

fn solve_loop(
    objective: &GraphObjective,
    shared: &Mutex<Vec<f64>>,
    cancel: &AtomicBool,
    iterations: &AtomicUsize,
    config: &LayoutConfig,
) {
    let mut minimizer = Minimizer::new(objective, shared);

    for _ in 0..config.max_iterations {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        match minimizer.iterate() {
            SearchStatus::Success => {
                iterations.fetch_add(1, Ordering::Relaxed);
                if minimizer.grad_norm_squared() < config.tolerance {
                    break;
                }
            }
            // Round-off floor reached; keep the last good positions rather than
            // spinning against the iteration cap.
            SearchStatus::NoProgress => break,
        }
    }
}
