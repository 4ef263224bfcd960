//! Tests for the deterministic reference engine.

use pretty_assertions::assert_eq;

use crate::common::harness::{build_model, sample_workload};
use uarchlab_core::config::{CpuModel, ExperimentSpec};
use uarchlab_core::engine::reference::{CAUSE_INSTRUCTION_LIMIT, CAUSE_WORKLOAD_EXIT};
use uarchlab_core::engine::{EngineHandle, ReferenceEngine, SimulationEngine};
use uarchlab_core::error::EngineError;
use uarchlab_core::system::ModelBuilder;

#[test]
fn test_fixed_workload_and_model_are_deterministic() {
    let workload = sample_workload();
    let spec = ExperimentSpec {
        cpu_model: CpuModel::MultiIssueOutOfOrder,
        issue_width: 2,
        ..ExperimentSpec::default()
    };

    let mut first = ReferenceEngine::new();
    let handle = first.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = first.run(&handle).unwrap();
    let first_snapshot = first.dump_stats(&handle).unwrap();

    let mut second = ReferenceEngine::new();
    let handle = second.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = second.run(&handle).unwrap();
    let second_snapshot = second.dump_stats(&handle).unwrap();

    assert_eq!(first_snapshot, second_snapshot);
}

#[test]
fn test_single_issue_ipc_bounded_by_one() {
    let workload = sample_workload();
    let mut engine = ReferenceEngine::new();
    let handle = engine
        .instantiate(&build_model(&ExperimentSpec::default(), &workload))
        .unwrap();
    let event = engine.run(&handle).unwrap();
    let snapshot = engine.dump_stats(&handle).unwrap();

    assert_eq!(event.cause, CAUSE_WORKLOAD_EXIT);
    assert!(snapshot.cycles > 0);
    assert!(snapshot.ipc() <= 1.0);
    assert_eq!(snapshot.instructions_committed, 100);
}

#[test]
fn test_wider_pipeline_improves_ipc() {
    let workload = sample_workload();

    let mut engine = ReferenceEngine::new();
    let narrow = build_model(&ExperimentSpec::default(), &workload);
    let handle = engine.instantiate(&narrow).unwrap();
    let _ = engine.run(&handle).unwrap();
    let narrow_snapshot = engine.dump_stats(&handle).unwrap();
    engine.reset_stats(&handle);

    let wide_spec = ExperimentSpec {
        cpu_model: CpuModel::MultiIssueOutOfOrder,
        issue_width: 2,
        ..ExperimentSpec::default()
    };
    let handle = engine.instantiate(&build_model(&wide_spec, &workload)).unwrap();
    let _ = engine.run(&handle).unwrap();
    let wide_snapshot = engine.dump_stats(&handle).unwrap();

    assert!(wide_snapshot.ipc() > narrow_snapshot.ipc());
    assert!(wide_snapshot.ipc() <= 2.0);
}

#[test]
fn test_counters_accumulate_until_reset() {
    let workload = sample_workload();
    let spec = ExperimentSpec::default();
    let mut engine = ReferenceEngine::new();

    let first = engine.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = engine.run(&first).unwrap();
    let after_one = engine.dump_stats(&first).unwrap();

    // No reset between runs: the second dump includes the first run's counts.
    let second = engine.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = engine.run(&second).unwrap();
    let after_two = engine.dump_stats(&second).unwrap();
    assert_eq!(
        after_two.instructions_committed,
        2 * after_one.instructions_committed
    );
    assert_eq!(after_two.cycles, 2 * after_one.cycles);

    // Reset restores the zero baseline for the next run.
    engine.reset_stats(&second);
    let third = engine.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = engine.run(&third).unwrap();
    let after_reset = engine.dump_stats(&third).unwrap();
    assert_eq!(after_reset, after_one);
}

#[test]
fn test_ticks_are_monotonic_across_runs_and_resets() {
    let workload = sample_workload();
    let spec = ExperimentSpec::default();
    let mut engine = ReferenceEngine::new();

    let handle = engine.instantiate(&build_model(&spec, &workload)).unwrap();
    let event = engine.run(&handle).unwrap();
    let tick_after_one = engine.cur_tick();
    assert_eq!(tick_after_one, event.ticks);

    engine.reset_stats(&handle);
    assert_eq!(engine.cur_tick(), tick_after_one);

    let handle = engine.instantiate(&build_model(&spec, &workload)).unwrap();
    let _ = engine.run(&handle).unwrap();
    assert_eq!(engine.cur_tick(), 2 * tick_after_one);
}

#[test]
fn test_second_run_on_a_handle_is_rejected() {
    let workload = sample_workload();
    let mut engine = ReferenceEngine::new();
    let handle = engine
        .instantiate(&build_model(&ExperimentSpec::default(), &workload))
        .unwrap();
    let _ = engine.run(&handle).unwrap();
    assert!(matches!(engine.run(&handle), Err(EngineError::ModelReused)));
}

#[test]
fn test_unknown_handle_is_rejected() {
    let mut engine = ReferenceEngine::new();
    let bogus = EngineHandle(7);
    assert!(matches!(engine.run(&bogus), Err(EngineError::UnknownHandle(7))));
    assert!(matches!(
        engine.dump_stats(&bogus),
        Err(EngineError::UnknownHandle(7))
    ));
}

#[test]
fn test_unbound_workload_rejected_at_instantiation() {
    let workload = sample_workload();
    let mut model = build_model(&ExperimentSpec::default(), &workload);
    model.cores[0].workload_bound = false;
    let mut engine = ReferenceEngine::new();
    assert!(matches!(
        engine.instantiate(&model),
        Err(EngineError::Rejected(_))
    ));
}

#[test]
fn test_oversized_workload_rejected_at_instantiation() {
    let workload = sample_workload();
    let config = ExperimentSpec::default().resolve().unwrap();
    let model = ModelBuilder::new()
        .mem_size_bytes(64)
        .build(&config, workload.path())
        .unwrap();
    let mut engine = ReferenceEngine::new();
    assert!(matches!(
        engine.instantiate(&model),
        Err(EngineError::Rejected(_))
    ));
}

#[test]
fn test_instruction_limit_truncates_the_run() {
    let workload = sample_workload();
    let mut engine = ReferenceEngine::with_instruction_limit(10);
    let handle = engine
        .instantiate(&build_model(&ExperimentSpec::default(), &workload))
        .unwrap();
    let event = engine.run(&handle).unwrap();
    let snapshot = engine.dump_stats(&handle).unwrap();
    assert_eq!(event.cause, CAUSE_INSTRUCTION_LIMIT);
    assert_eq!(snapshot.instructions_committed, 10);
}
