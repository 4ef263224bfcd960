//! Experiment configuration and CPU variant resolution.
//!
//! This module defines the parameter surface for a single experiment. It provides:
//! 1. **Defaults:** Baseline hardware constants (clock, bus, memory range, widths).
//! 2. **Knobs:** `ExperimentSpec` with CPU model, issue width, thread count, and predictor.
//! 3. **Resolution:** `ExperimentSpec::resolve`, mapping knobs to a validated `CoreConfig`
//!    with per-variant width rules.
//!
//! Experiment parameters are supplied as in-memory values or deserialized from a JSON
//! plan (see [`crate::driver::Plan`]); use `ExperimentSpec::default()` for the baseline
//! single-issue in-order pipeline.

use serde::Deserialize;

use crate::error::InvalidConfig;

/// Default configuration constants for experiment hardware models.
///
/// These values define the baseline topology when not explicitly overridden
/// through [`crate::system::ModelBuilder`] knobs.
pub mod defaults {
    /// Core clock frequency (1 GHz).
    ///
    /// Matches the source clock domain every assembled model is placed in.
    pub const CLOCK_HZ: u64 = 1_000_000_000;

    /// Core voltage (1.0 V); the voltage domain is nominal and never swept.
    pub const VOLTAGE: f64 = 1.0;

    /// Memory bus width in bytes (8 bytes = 64-bit bus).
    pub const BUS_WIDTH_BYTES: u64 = 8;

    /// Memory bus access latency in cycles.
    pub const BUS_LATENCY_CYCLES: u64 = 4;

    /// Base physical address of the memory controller's range.
    pub const MEM_BASE: u64 = 0;

    /// Capacity of the memory controller's address range (512 MiB).
    ///
    /// Workloads must fit inside this range or the engine rejects the model.
    pub const MEM_SIZE_BYTES: u64 = 512 * 1024 * 1024;

    /// Memory controller access latency in cycles.
    pub const MEM_LATENCY_CYCLES: u64 = 30;

    /// Default pipeline width (1 instruction per cycle).
    pub const ISSUE_WIDTH: usize = 1;

    /// Default hardware thread count per core.
    pub const NUM_THREADS: usize = 1;

    /// Default core count per model.
    pub const NUM_CORES: usize = 1;
}

/// CPU micro-architecture variants an experiment can select.
///
/// The set is closed: every variant has explicit configuration rules in
/// [`ExperimentSpec::resolve`], and an unrecognized tag in a plan file is a
/// parse error rather than a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CpuModel {
    /// Minimal in-order pipeline committing at most one instruction per cycle.
    ///
    /// Stage widths are fixed at 1 and the core is single-threaded; the
    /// multi-issue knobs do not apply to this variant.
    #[default]
    #[serde(alias = "MinorCPU")]
    SingleIssueInOrder,

    /// Superscalar out-of-order pipeline with configurable width and SMT.
    #[serde(alias = "DerivO3CPU")]
    MultiIssueOutOfOrder,
}

/// Branch prediction policies attachable to a core.
///
/// The predictor is opaque to this layer: it is carried through the resolved
/// configuration and into the hardware model, where the engine interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorKind {
    /// Static predictor (always predict not-taken).
    Static,
    /// Bi-modal predictor with choice tables.
    #[serde(alias = "BiModeBP")]
    BiMode,
    /// Global history predictor (gshare).
    GShare,
    /// Tournament predictor combining local and global predictors.
    Tournament,
    /// Perceptron-based neural predictor.
    Perceptron,
    /// Tagged Geometric History Length predictor.
    #[serde(alias = "TAGE")]
    Tage,
}

/// Immutable parameter set for one experiment.
///
/// Created by the caller per run and discarded after the run completes.
/// `num_threads > 1` and `issue_width > 1` are meaningful only for
/// [`CpuModel::MultiIssueOutOfOrder`]; other variants ignore them (see
/// [`ExperimentSpec::resolve`]).
///
/// # Examples
///
/// ```
/// use uarchlab_core::config::{CpuModel, ExperimentSpec};
///
/// let spec = ExperimentSpec {
///     cpu_model: CpuModel::MultiIssueOutOfOrder,
///     issue_width: 2,
///     num_threads: 2,
///     branch_predictor: None,
/// };
/// let config = spec.resolve().unwrap();
/// assert_eq!(config.fetch_width, 2);
/// assert_eq!(config.commit_width, 2);
/// assert_eq!(config.num_threads, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExperimentSpec {
    /// CPU micro-architecture variant to simulate.
    #[serde(default)]
    pub cpu_model: CpuModel,

    /// Hardware thread contexts per core (SMT degree).
    #[serde(default = "ExperimentSpec::default_num_threads")]
    pub num_threads: usize,

    /// Instructions each pipeline stage may process per cycle.
    #[serde(default = "ExperimentSpec::default_issue_width")]
    pub issue_width: usize,

    /// Branch predictor to attach, if any.
    #[serde(default)]
    pub branch_predictor: Option<PredictorKind>,
}

impl ExperimentSpec {
    /// Returns the default hardware thread count.
    fn default_num_threads() -> usize {
        defaults::NUM_THREADS
    }

    /// Returns the default issue width.
    fn default_issue_width() -> usize {
        defaults::ISSUE_WIDTH
    }

    /// Resolves the experiment knobs into a concrete per-stage configuration.
    ///
    /// Validation runs first for every variant: `issue_width` and
    /// `num_threads` must both be at least 1. The variant rules then apply:
    ///
    /// * [`CpuModel::SingleIssueInOrder`] pins all five stage widths and the
    ///   thread count to 1. Larger `issue_width`/`num_threads` inputs are
    ///   ignored rather than rejected; the minimal in-order pipeline has a
    ///   fixed-width datapath and the multi-issue knobs simply do not apply.
    /// * [`CpuModel::MultiIssueOutOfOrder`] sets all five stage widths to
    ///   `issue_width` and the thread count to `num_threads`.
    ///
    /// The branch predictor, if present, is attached regardless of variant.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`] when `issue_width` or `num_threads` is zero.
    pub fn resolve(&self) -> Result<CoreConfig, InvalidConfig> {
        if self.issue_width == 0 {
            return Err(InvalidConfig::ZeroIssueWidth);
        }
        if self.num_threads == 0 {
            return Err(InvalidConfig::ZeroThreads);
        }

        let (width, threads) = match self.cpu_model {
            CpuModel::SingleIssueInOrder => (1, 1),
            CpuModel::MultiIssueOutOfOrder => (self.issue_width, self.num_threads),
        };

        Ok(CoreConfig {
            fetch_width: width,
            decode_width: width,
            issue_width: width,
            execute_width: width,
            commit_width: width,
            num_threads: threads,
            branch_predictor: self.branch_predictor,
        })
    }
}

impl Default for ExperimentSpec {
    /// Baseline pipeline: single-issue in-order, one thread, no predictor.
    fn default() -> Self {
        Self {
            cpu_model: CpuModel::default(),
            num_threads: defaults::NUM_THREADS,
            issue_width: defaults::ISSUE_WIDTH,
            branch_predictor: None,
        }
    }
}

/// Concrete per-stage width assignment derived from an [`ExperimentSpec`].
///
/// Owned by the model builder during assembly and embedded into each core
/// instance; produced only by [`ExperimentSpec::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreConfig {
    /// Instructions fetched per cycle.
    pub fetch_width: usize,
    /// Instructions decoded per cycle.
    pub decode_width: usize,
    /// Instructions issued per cycle.
    pub issue_width: usize,
    /// Instructions executed per cycle.
    pub execute_width: usize,
    /// Instructions committed per cycle.
    pub commit_width: usize,
    /// Hardware thread contexts sharing the pipeline.
    pub num_threads: usize,
    /// Attached branch predictor, if any.
    pub branch_predictor: Option<PredictorKind>,
}
