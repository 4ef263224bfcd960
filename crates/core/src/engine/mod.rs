//! Simulation engine boundary.
//!
//! This module defines the contract the orchestration layer requires of a
//! timing simulation engine. It provides:
//! 1. **Trait:** `SimulationEngine` with the four operations the core ever calls.
//! 2. **Handle:** `EngineHandle`, the token threaded through run and stats calls.
//! 3. **Events:** `TerminationEvent` carrying the cause and tick count of a run.
//! 4. **Snapshots:** `StatsSnapshot` of the engine's process-wide counters.
//!
//! The core never inspects engine internals beyond these operations; the
//! built-in deterministic engine lives in [`reference`].

pub mod reference;

use crate::error::EngineError;
use crate::system::HardwareModel;

pub use reference::ReferenceEngine;

/// Token identifying one instantiated topology inside an engine.
///
/// Statistics operations take the handle explicitly so the reset-before-reuse
/// discipline is visible at every call site rather than implied by ambient
/// engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u64);

/// Termination event reported when a blocking run returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvent {
    /// Cause string reported by the engine (normal exit, instruction limit, fault).
    pub cause: String,
    /// Ticks elapsed during the run.
    pub ticks: u64,
}

/// Snapshot of the engine's statistics counters.
///
/// Counters are process-wide and cumulative until reset; under the
/// orchestrator's dump-then-reset protocol a snapshot covers exactly one run.
/// The counter names mirror what the engine exposes on the core:
/// `commit.instructions`, `numCycles`, and the derived `commit.ipc`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Instructions committed (`commit.instructions`).
    pub instructions_committed: u64,
    /// Cycles elapsed (`numCycles`).
    pub cycles: u64,
}

impl StatsSnapshot {
    /// Instructions per cycle (`commit.ipc`); 0 when no cycles have elapsed.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_committed as f64 / self.cycles as f64
        }
    }
}

/// Contract between the orchestration layer and a timing simulation engine.
///
/// `run` is the single suspension point in the whole system: it blocks the
/// calling thread until the engine reports termination. No timeout is imposed
/// by this layer; the engine owns termination policy.
pub trait SimulationEngine {
    /// Instantiates an assembled topology, returning a handle for it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Rejected`] when the topology is not runnable
    /// (e.g., unreachable memory range, missing workload binding).
    fn instantiate(&mut self, model: &HardwareModel) -> Result<EngineHandle, EngineError>;

    /// Runs the instantiated topology to termination, blocking until done.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownHandle`] for a handle the engine does not
    /// know and [`EngineError::ModelReused`] when the handle already ran.
    fn run(&mut self, handle: &EngineHandle) -> Result<TerminationEvent, EngineError>;

    /// Dumps the current statistics counters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownHandle`] for an unrecognized handle.
    fn dump_stats(&mut self, handle: &EngineHandle) -> Result<StatsSnapshot, EngineError>;

    /// Resets the statistics counters to zero.
    ///
    /// Counters are process-wide, not per-model; callers reset after every
    /// extraction so no run observes a predecessor's counts. Reset is
    /// best-effort on unknown handles.
    fn reset_stats(&mut self, handle: &EngineHandle);
}
