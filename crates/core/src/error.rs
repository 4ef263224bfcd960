//! Error taxonomy for experiment composition and orchestration.
//!
//! This module defines the failure types raised at each stage of an experiment. It provides:
//! 1. **Configuration:** `InvalidConfig` for parameter values outside the resolver's domain.
//! 2. **Assembly:** `WorkloadError` and `BuildError` for topology construction failures.
//! 3. **Execution:** `EngineError` for instantiation/run rejection and model reuse.
//! 4. **Planning:** `PlanError` for malformed experiment lists, raised before any run.
//! 5. **Umbrella:** `ExperimentError`, the per-experiment failure recorded by the driver.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Parameter values outside the CPU variant resolver's accepted domain.
///
/// Detected before any hardware model is built; never reaches the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidConfig {
    /// The issue width knob was zero; every pipeline stage must pass at least one instruction.
    #[error("issue width must be at least 1")]
    ZeroIssueWidth,

    /// The thread count knob was zero; a core always executes at least one thread context.
    #[error("thread count must be at least 1")]
    ZeroThreads,
}

/// Failure to resolve a workload path into an executable binding.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The workload file could not be read from disk.
    #[error("could not read workload '{path}': {source}")]
    NotFound {
        /// Path that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The workload file resolved but carries no executable bytes.
    #[error("workload '{0}' contains no executable text")]
    EmptyText(PathBuf),
}

/// Topology assembly failure; detected before instantiation.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Workload resolution failed during the binding step.
    #[error(transparent)]
    Workload(#[from] WorkloadError),

    /// A wiring step was attempted with no cores to wire.
    #[error("hardware model requires at least one core")]
    NoCores,

    /// A wiring step was attempted on a core configuration with a zero stage width.
    #[error("core configuration has a zero {0} width")]
    ZeroStageWidth(&'static str),
}

/// Instantiation or run rejected by the simulation engine, or a model reused across runs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected the topology at instantiation.
    #[error("engine rejected the topology: {0}")]
    Rejected(String),

    /// An operation referenced a handle the engine does not know.
    #[error("unknown engine handle {0}")]
    UnknownHandle(u64),

    /// A hardware model was driven through a second run.
    #[error("hardware model has already completed its run")]
    ModelReused,

    /// A statistics counter was unavailable at dump time.
    #[error("statistics counter '{0}' is unavailable")]
    CounterUnavailable(&'static str),
}

/// Malformed experiment plan supplied by the caller.
///
/// Raised by the driver before any experiment begins; plan validation is the
/// only fail-fast boundary in the system.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan names no experiments.
    #[error("experiment plan is empty")]
    Empty,

    /// Two experiments share a name; report records would be ambiguous.
    #[error("duplicate experiment name '{0}'")]
    DuplicateName(String),

    /// The plan-level workload path is empty.
    #[error("experiment plan has no workload path")]
    NoWorkload,

    /// The plan file could not be parsed.
    #[error("could not parse experiment plan: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Any failure recorded against a single experiment by the driver.
///
/// All three stages are recoverable at the driver boundary: a failing
/// experiment is recorded with its reason and the sweep continues.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// The resolver rejected the experiment parameters.
    #[error(transparent)]
    Config(#[from] InvalidConfig),

    /// The model builder could not assemble a topology.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The engine rejected or failed the run.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
