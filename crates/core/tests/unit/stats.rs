//! Tests for metric extraction and report rendering.

use pretty_assertions::assert_eq;

use uarchlab_core::driver::ExperimentOutcome;
use uarchlab_core::engine::{StatsSnapshot, TerminationEvent};
use uarchlab_core::error::{EngineError, ExperimentError};
use uarchlab_core::stats::{RunResult, render_report};

fn event() -> TerminationEvent {
    TerminationEvent {
        cause: String::from("exiting with last active thread context"),
        ticks: 154_000,
    }
}

fn snapshot() -> StatsSnapshot {
    StatsSnapshot {
        instructions_committed: 100,
        cycles: 154,
    }
}

#[test]
fn test_extract_reads_the_named_counters() {
    let result = RunResult::extract(&event(), &snapshot());
    assert_eq!(
        result.termination_cause,
        "exiting with last active thread context"
    );
    assert_eq!(result.ticks_elapsed, 154_000);
    assert_eq!(result.instructions_committed, 100);
    assert_eq!(result.cycles_elapsed, 154);
    assert!((result.ipc - 100.0 / 154.0).abs() < 1e-9);
}

#[test]
fn test_snapshot_ipc_is_zero_without_cycles() {
    let snapshot = StatsSnapshot::default();
    assert_eq!(snapshot.ipc(), 0.0);
}

#[test]
fn test_report_carries_all_five_quantities() {
    let outcome = ExperimentOutcome {
        name: String::from("baseline-pipeline"),
        result: Ok(RunResult::extract(&event(), &snapshot())),
    };
    let report = render_report(&[outcome]);
    assert!(report.contains("baseline-pipeline"));
    assert!(report.contains("exiting with last active thread context"));
    assert!(report.contains("154000"));
    assert!(report.contains("commit.instructions    100"));
    assert!(report.contains("commit.ipc             0.6494"));
    assert!(report.contains("numCycles              154"));
}

#[test]
fn test_report_labels_failures() {
    let outcome = ExperimentOutcome {
        name: String::from("smt"),
        result: Err(ExperimentError::Engine(EngineError::Rejected(
            String::from("topology has no cores"),
        ))),
    };
    let report = render_report(&[outcome]);
    assert!(report.contains("smt"));
    assert!(report.contains("FAILED"));
    assert!(report.contains("topology has no cores"));
}

#[test]
fn test_run_result_serializes_for_json_reports() {
    let result = RunResult::extract(&event(), &snapshot());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["instructions_committed"], 100);
    assert_eq!(json["cycles_elapsed"], 154);
    assert_eq!(json["ticks_elapsed"], 154_000);
}
