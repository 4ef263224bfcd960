//! Run orchestrator: one hardware model, one run, one result.
//!
//! This module sequences a single run against the simulation engine. It performs:
//! 1. **Instantiation:** Hands the model to the engine and tracks the state machine
//!    `Built -> Instantiated -> Running -> Terminated -> StatsCollected`.
//! 2. **Execution:** Invokes the engine's blocking run call, the single suspension
//!    point in the whole system.
//! 3. **Stats protocol:** Dumps counters, extracts the run result, then resets the
//!    engine's process-wide counters so they never leak into the next run.

use tracing::debug;

use crate::engine::SimulationEngine;
use crate::error::EngineError;
use crate::stats::RunResult;
use crate::system::HardwareModel;

/// Lifecycle states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Model assembled, engine not yet involved.
    Built,
    /// Engine accepted the topology.
    Instantiated,
    /// Blocking run call in progress.
    Running,
    /// Engine reported a termination event.
    Terminated,
    /// Statistics extracted and counters reset.
    StatsCollected,
}

/// Orchestrates exactly one run of one hardware model.
///
/// The model is consumed when execution starts; a second `execute` call is
/// rejected with [`EngineError::ModelReused`] rather than producing counters
/// of undefined provenance.
#[derive(Debug)]
pub struct Run {
    state: RunState,
    model: Option<HardwareModel>,
}

impl Run {
    /// Wraps a freshly built model, ready to execute.
    pub fn new(model: HardwareModel) -> Self {
        Self {
            state: RunState::Built,
            model: Some(model),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drives the model through one complete run and extracts its result.
    ///
    /// The statistics reset is issued right after the dump, whether or not the
    /// dump succeeded: the engine's counters are process-wide, and a run that
    /// failed at extraction must still not contaminate its successor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelReused`] when called more than once, and
    /// propagates engine rejection of the topology or the run itself. After
    /// any error the model remains consumed; build a fresh model to retry.
    pub fn execute<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
    ) -> Result<RunResult, EngineError> {
        if self.state != RunState::Built {
            return Err(EngineError::ModelReused);
        }
        let model = self.model.take().ok_or(EngineError::ModelReused)?;

        let handle = engine.instantiate(&model)?;
        self.state = RunState::Instantiated;
        debug!(handle = handle.0, "model instantiated");

        self.state = RunState::Running;
        let event = engine.run(&handle)?;
        self.state = RunState::Terminated;
        debug!(cause = %event.cause, ticks = event.ticks, "run terminated");

        let dumped = engine.dump_stats(&handle);
        engine.reset_stats(&handle);
        let snapshot = dumped?;

        let result = RunResult::extract(&event, &snapshot);
        self.state = RunState::StatsCollected;
        Ok(result)
    }
}
