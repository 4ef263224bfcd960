//! Experiment driver: plans, sweeps, and fault isolation.
//!
//! This module runs an ordered list of named experiments, each independently
//! resolved, built, and executed. It provides:
//! 1. **Plans:** `Plan` and `Experiment`, deserializable from JSON, with the
//!    standard four-experiment sweep as a constructor.
//! 2. **Validation:** Fail-fast rejection of malformed plans before any run.
//! 3. **Isolation:** A failing experiment is recorded against its entry and the
//!    sweep continues; declaration order is preserved in the output.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use crate::config::{CpuModel, ExperimentSpec, PredictorKind};
use crate::engine::SimulationEngine;
use crate::error::{ExperimentError, PlanError};
use crate::sim::Run;
use crate::stats::RunResult;
use crate::system::ModelBuilder;

/// One named experiment in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Experiment {
    /// Name the outcome is reported under.
    pub name: String,
    /// Experiment parameters.
    #[serde(flatten)]
    pub spec: ExperimentSpec,
}

/// An ordered experiment plan over one workload.
///
/// The plan is the only state shared across experiments, and it is immutable:
/// every run builds a fresh hardware model from its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Plan {
    /// Workload binary every experiment runs.
    pub workload: PathBuf,
    /// Experiments in declaration order.
    pub experiments: Vec<Experiment>,
}

impl Plan {
    /// The standard sweep: baseline pipeline, branch prediction, superscalar, SMT.
    pub fn standard(workload: impl Into<PathBuf>) -> Self {
        let experiments = vec![
            Experiment {
                name: String::from("baseline-pipeline"),
                spec: ExperimentSpec::default(),
            },
            Experiment {
                name: String::from("branch-prediction"),
                spec: ExperimentSpec {
                    branch_predictor: Some(PredictorKind::BiMode),
                    ..ExperimentSpec::default()
                },
            },
            Experiment {
                name: String::from("superscalar"),
                spec: ExperimentSpec {
                    cpu_model: CpuModel::MultiIssueOutOfOrder,
                    issue_width: 2,
                    ..ExperimentSpec::default()
                },
            },
            Experiment {
                name: String::from("smt"),
                spec: ExperimentSpec {
                    cpu_model: CpuModel::MultiIssueOutOfOrder,
                    issue_width: 2,
                    num_threads: 2,
                    ..ExperimentSpec::default()
                },
            },
        ];
        Self {
            workload: workload.into(),
            experiments,
        }
    }

    /// Parses and validates a plan from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Parse`] on malformed JSON and the validation
    /// errors documented on [`Plan::validate`].
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Checks the plan is runnable at all.
    ///
    /// This is the fail-fast boundary: errors here abort the whole sweep
    /// before any experiment begins, unlike per-experiment failures.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Empty`] for a plan with no experiments,
    /// [`PlanError::NoWorkload`] for an empty workload path, and
    /// [`PlanError::DuplicateName`] when two experiments share a name.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.experiments.is_empty() {
            return Err(PlanError::Empty);
        }
        if self.workload.as_os_str().is_empty() {
            return Err(PlanError::NoWorkload);
        }
        let mut seen = HashSet::new();
        for experiment in &self.experiments {
            if !seen.insert(experiment.name.as_str()) {
                return Err(PlanError::DuplicateName(experiment.name.clone()));
            }
        }
        Ok(())
    }
}

/// Outcome recorded for one experiment: its result or its failure reason.
#[derive(Debug)]
pub struct ExperimentOutcome {
    /// Experiment name, copied from the plan entry.
    pub name: String,
    /// Run result, or the error that stopped this experiment.
    pub result: Result<RunResult, ExperimentError>,
}

/// Runs every experiment in the plan, in order, against one engine.
///
/// Each entry is resolved, built, and run independently; a failure in one
/// experiment is recorded against that entry and does not abort the rest.
/// The output preserves declaration order regardless of individual failures.
///
/// # Errors
///
/// Returns [`PlanError`] only for a malformed plan, detected before any
/// experiment begins.
pub fn run_all<E: SimulationEngine>(
    engine: &mut E,
    plan: &Plan,
) -> Result<Vec<ExperimentOutcome>, PlanError> {
    plan.validate()?;

    let mut outcomes = Vec::with_capacity(plan.experiments.len());
    for experiment in &plan.experiments {
        info!(name = %experiment.name, "starting experiment");
        let result = run_one(engine, plan, experiment);
        if let Err(error) = &result {
            info!(name = %experiment.name, %error, "experiment failed");
        }
        outcomes.push(ExperimentOutcome {
            name: experiment.name.clone(),
            result,
        });
    }
    Ok(outcomes)
}

/// Resolves, builds, and runs a single experiment.
fn run_one<E: SimulationEngine>(
    engine: &mut E,
    plan: &Plan,
    experiment: &Experiment,
) -> Result<RunResult, ExperimentError> {
    let config = experiment.spec.resolve()?;
    let model = ModelBuilder::new().build(&config, &plan.workload)?;
    let mut run = Run::new(model);
    Ok(run.execute(engine)?)
}
