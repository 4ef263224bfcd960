//! Metric extraction and report rendering.
//!
//! This module turns a run's termination event and counter snapshot into the
//! record the driver collects. It provides:
//! 1. **Extraction:** `RunResult::extract`, a pure read of the named counters
//!    (`commit.instructions`, `numCycles`, `commit.ipc`) plus the termination
//!    cause and tick count surfaced by the orchestrator.
//! 2. **Reporting:** Human-readable rendering of a sweep's outcomes, one block
//!    per experiment, failure lines included.

use std::fmt::Write as _;

use serde::Serialize;

use crate::driver::ExperimentOutcome;
use crate::engine::{StatsSnapshot, TerminationEvent};

/// Performance record of exactly one run.
///
/// Immutable once extracted; the driver collects one per experiment in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Why the engine terminated the run.
    pub termination_cause: String,
    /// Ticks elapsed during the run.
    pub ticks_elapsed: u64,
    /// Instructions committed (`commit.instructions`).
    pub instructions_committed: u64,
    /// Cycles elapsed (`numCycles`).
    pub cycles_elapsed: u64,
    /// Instructions per cycle (`commit.ipc`).
    pub ipc: f64,
}

impl RunResult {
    /// Builds a run result from the engine's termination event and counter snapshot.
    ///
    /// Never fails under correct sequencing: unavailable counters surface as
    /// an engine error at dump time, before extraction is reached.
    pub fn extract(event: &TerminationEvent, snapshot: &StatsSnapshot) -> Self {
        Self {
            termination_cause: event.cause.clone(),
            ticks_elapsed: event.ticks,
            instructions_committed: snapshot.instructions_committed,
            cycles_elapsed: snapshot.cycles,
            ipc: snapshot.ipc(),
        }
    }
}

/// Renders a sweep's outcomes as a report table.
///
/// Each experiment contributes exactly one block: the five run quantities for
/// a success, or a labeled failure line. The format is a presentation concern;
/// the quantities themselves are the contract.
pub fn render_report(outcomes: &[ExperimentOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==========================================================");
    let _ = writeln!(out, "MICROARCHITECTURE EXPERIMENT REPORT");
    let _ = writeln!(out, "==========================================================");
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => {
                let _ = writeln!(out, "{}", outcome.name);
                let _ = writeln!(out, "  termination            {}", result.termination_cause);
                let _ = writeln!(out, "  ticks                  {}", result.ticks_elapsed);
                let _ = writeln!(
                    out,
                    "  commit.instructions    {}",
                    result.instructions_committed
                );
                let _ = writeln!(out, "  commit.ipc             {:.4}", result.ipc);
                let _ = writeln!(out, "  numCycles              {}", result.cycles_elapsed);
            }
            Err(error) => {
                let _ = writeln!(out, "{}", outcome.name);
                let _ = writeln!(out, "  FAILED                 {error}");
            }
        }
        let _ = writeln!(out, "----------------------------------------------------------");
    }
    out
}
