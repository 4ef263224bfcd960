//! Tests for the run orchestrator's state machine and stats protocol.

use pretty_assertions::assert_eq;

use crate::common::harness::{build_model, sample_workload};
use crate::common::mocks::engine::{Call, MockEngine};
use uarchlab_core::config::ExperimentSpec;
use uarchlab_core::error::EngineError;
use uarchlab_core::sim::{Run, RunState};

#[test]
fn test_protocol_order_instantiate_run_dump_reset() {
    let workload = sample_workload();
    let mut engine = MockEngine::new();
    let mut run = Run::new(build_model(&ExperimentSpec::default(), &workload));
    assert_eq!(run.state(), RunState::Built);

    let result = run.execute(&mut engine).unwrap();
    assert_eq!(run.state(), RunState::StatsCollected);
    assert_eq!(
        engine.calls,
        vec![
            Call::Instantiate,
            Call::Run(1),
            Call::DumpStats(1),
            Call::ResetStats(1),
        ]
    );

    assert_eq!(result.termination_cause, "workload exit");
    assert_eq!(result.ticks_elapsed, 125_000);
    assert_eq!(result.instructions_committed, 100);
    assert_eq!(result.cycles_elapsed, 125);
    assert!((result.ipc - 0.8).abs() < 1e-9);
}

#[test]
fn test_second_execute_is_rejected_without_engine_calls() {
    let workload = sample_workload();
    let mut engine = MockEngine::new();
    let mut run = Run::new(build_model(&ExperimentSpec::default(), &workload));
    let _ = run.execute(&mut engine).unwrap();

    let calls_after_first = engine.calls.len();
    assert!(matches!(
        run.execute(&mut engine),
        Err(EngineError::ModelReused)
    ));
    assert_eq!(engine.calls.len(), calls_after_first);
}

#[test]
fn test_reset_still_issued_when_dump_fails() {
    let workload = sample_workload();
    let mut engine = MockEngine::new();
    engine.fail_dump = true;
    let mut run = Run::new(build_model(&ExperimentSpec::default(), &workload));

    let error = run.execute(&mut engine).unwrap_err();
    assert!(matches!(error, EngineError::CounterUnavailable(_)));
    // The dump failed, the reset still happened.
    assert_eq!(
        engine.calls,
        vec![
            Call::Instantiate,
            Call::Run(1),
            Call::DumpStats(1),
            Call::ResetStats(1),
        ]
    );
    assert_eq!(run.state(), RunState::Terminated);
}

#[test]
fn test_instantiation_rejection_stops_before_run() {
    let workload = sample_workload();
    let mut engine = MockEngine::new();
    engine.reject_instantiate = Some(String::from("unreachable memory range"));
    let mut run = Run::new(build_model(&ExperimentSpec::default(), &workload));

    let error = run.execute(&mut engine).unwrap_err();
    assert!(matches!(error, EngineError::Rejected(_)));
    assert_eq!(engine.calls, vec![Call::Instantiate]);

    // The model was consumed; a retry needs a fresh model.
    assert!(matches!(
        run.execute(&mut engine),
        Err(EngineError::ModelReused)
    ));
}

#[test]
fn test_run_failure_propagates() {
    let workload = sample_workload();
    let mut engine = MockEngine::new();
    engine.fail_run = true;
    let mut run = Run::new(build_model(&ExperimentSpec::default(), &workload));

    assert!(run.execute(&mut engine).is_err());
    assert_eq!(run.state(), RunState::Running);
    assert_eq!(engine.calls, vec![Call::Instantiate, Call::Run(1)]);
}
