//! Micro-architecture experiment composition and orchestration library.
//!
//! This crate turns a small set of experiment parameters into complete,
//! internally consistent hardware models and drives them through a timing
//! simulation engine, one run per experiment:
//! 1. **Config:** Experiment knobs (CPU variant, issue width, threads, predictor)
//!    and their resolution into validated per-stage core configurations.
//! 2. **System:** Hardware topology assembly in strict dependency order
//!    (clock, bus, cores, memory controller, interrupts, workload, system port).
//! 3. **Engine:** The four-operation engine boundary plus a deterministic
//!    built-in reference engine.
//! 4. **Sim:** The run orchestrator and its dump-then-reset stats protocol.
//! 5. **Stats:** Per-run metric extraction and report rendering.
//! 6. **Driver:** Ordered experiment sweeps with per-experiment fault isolation.

/// Experiment parameters and CPU variant resolution.
pub mod config;
/// Experiment driver and plans.
pub mod driver;
/// Simulation engine boundary and the built-in reference engine.
pub mod engine;
/// Error taxonomy (config, build, engine, plan).
pub mod error;
/// Run orchestration.
pub mod sim;
/// Metric extraction and reporting.
pub mod stats;
/// Hardware model topology and assembly.
pub mod system;
/// Workload resolution and binding.
pub mod workload;

/// Experiment parameter set; start from `ExperimentSpec::default()` for the baseline pipeline.
pub use crate::config::ExperimentSpec;
/// Deterministic built-in engine; implements [`engine::SimulationEngine`].
pub use crate::engine::ReferenceEngine;
/// Assembled hardware topology; construct with [`system::ModelBuilder`].
pub use crate::system::HardwareModel;
