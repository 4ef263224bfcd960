//! Micro-architecture experiment runner CLI.
//!
//! This binary provides a single entry point for all experiment modes. It performs:
//! 1. **Single run:** Execute one experiment from command-line knobs.
//! 2. **Standard sweep:** The four-experiment sequence (baseline pipeline,
//!    branch prediction, superscalar, SMT) over one workload.
//! 3. **Plan run:** Execute a JSON experiment plan file.

use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use uarchlab_core::config::{CpuModel, ExperimentSpec, PredictorKind};
use uarchlab_core::driver::{self, Experiment, ExperimentOutcome, Plan};
use uarchlab_core::engine::ReferenceEngine;
use uarchlab_core::stats::render_report;

#[derive(Parser, Debug)]
#[command(
    name = "uarchlab",
    version,
    about = "Micro-architecture simulation experiment runner",
    long_about = "Compose a hardware model from experiment knobs, run it on the timing engine,\nand report instructions committed, cycles, and IPC per experiment.\n\nExamples:\n  uarchlab run -f workloads/hello.bin\n  uarchlab run -f workloads/hello.bin --cpu out-of-order --issue-width 2 --threads 2\n  uarchlab sweep -f workloads/hello.bin\n  uarchlab plan experiments.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single experiment from command-line knobs.
    Run {
        /// Workload binary to execute.
        #[arg(short = 'f', long)]
        workload: PathBuf,

        /// CPU micro-architecture variant.
        #[arg(long, value_enum, default_value_t = CpuArg::InOrder)]
        cpu: CpuArg,

        /// Instructions per cycle through each pipeline stage (out-of-order only).
        #[arg(long, default_value_t = 1)]
        issue_width: usize,

        /// Hardware thread contexts per core (out-of-order only).
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// Branch predictor to attach.
        #[arg(long, value_enum)]
        predictor: Option<PredictorArg>,

        /// Emit the outcomes as JSON instead of the report table.
        #[arg(long)]
        json: bool,
    },

    /// Run the standard four-experiment sweep over one workload.
    Sweep {
        /// Workload binary every experiment runs.
        #[arg(short = 'f', long)]
        workload: PathBuf,

        /// Emit the outcomes as JSON instead of the report table.
        #[arg(long)]
        json: bool,
    },

    /// Run an experiment plan from a JSON file.
    Plan {
        /// Plan file path.
        path: PathBuf,

        /// Emit the outcomes as JSON instead of the report table.
        #[arg(long)]
        json: bool,
    },
}

/// CPU variant selector on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum CpuArg {
    /// Single-issue in-order pipeline.
    InOrder,
    /// Multi-issue out-of-order pipeline.
    OutOfOrder,
}

impl From<CpuArg> for CpuModel {
    fn from(arg: CpuArg) -> Self {
        match arg {
            CpuArg::InOrder => Self::SingleIssueInOrder,
            CpuArg::OutOfOrder => Self::MultiIssueOutOfOrder,
        }
    }
}

/// Branch predictor selector on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum PredictorArg {
    Static,
    BiMode,
    GShare,
    Tournament,
    Perceptron,
    Tage,
}

impl From<PredictorArg> for PredictorKind {
    fn from(arg: PredictorArg) -> Self {
        match arg {
            PredictorArg::Static => Self::Static,
            PredictorArg::BiMode => Self::BiMode,
            PredictorArg::GShare => Self::GShare,
            PredictorArg::Tournament => Self::Tournament,
            PredictorArg::Perceptron => Self::Perceptron,
            PredictorArg::Tage => Self::Tage,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (plan, json) = match cli.command {
        Commands::Run {
            workload,
            cpu,
            issue_width,
            threads,
            predictor,
            json,
        } => {
            let spec = ExperimentSpec {
                cpu_model: cpu.into(),
                issue_width,
                num_threads: threads,
                branch_predictor: predictor.map(PredictorKind::from),
            };
            let plan = Plan {
                workload,
                experiments: vec![Experiment {
                    name: String::from("run"),
                    spec,
                }],
            };
            (plan, json)
        }
        Commands::Sweep { workload, json } => (Plan::standard(workload), json),
        Commands::Plan { path, json } => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Error reading plan {}: {}", path.display(), e);
                process::exit(1);
            });
            let plan = Plan::from_json(&text).unwrap_or_else(|e| {
                eprintln!("Error in plan {}: {}", path.display(), e);
                process::exit(1);
            });
            (plan, json)
        }
    };

    let mut engine = ReferenceEngine::new();
    let outcomes = match driver::run_all(&mut engine, &plan) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if json {
        println!("{}", outcomes_json(&outcomes));
    } else {
        print!("{}", render_report(&outcomes));
    }

    if outcomes.iter().any(|o| o.result.is_err()) {
        process::exit(1);
    }
}

/// Serializes outcomes as a JSON array; failures carry their reason string.
fn outcomes_json(outcomes: &[ExperimentOutcome]) -> String {
    let entries: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(result) => serde_json::json!({
                "name": outcome.name,
                "result": result,
            }),
            Err(error) => serde_json::json!({
                "name": outcome.name,
                "error": error.to_string(),
            }),
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| String::from("[]"))
}
