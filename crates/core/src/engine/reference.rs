//! Deterministic built-in timing engine.
//!
//! This module provides the reference implementation of [`SimulationEngine`]
//! used by the CLI and end-to-end tests. It performs:
//! 1. **Validation:** Rejects unrunnable topologies at instantiation (no cores,
//!    unwired ports, missing or oversized workload).
//! 2. **Stream derivation:** Classifies the workload's 32-bit words by RISC-V
//!    major opcode into ALU, load, store, and branch operations.
//! 3. **Timing:** Computes cycles from issue slots plus mispredict and memory
//!    stall penalties, with SMT latency hiding across thread contexts.
//! 4. **Counters:** Accumulates process-wide statistics until explicitly reset.
//!
//! The model is analytic, not cycle-by-cycle: for a fixed workload and model
//! the counters are a pure function of the topology, so two fresh runs of the
//! same experiment always agree.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::PredictorKind;
use crate::engine::{EngineHandle, SimulationEngine, StatsSnapshot, TerminationEvent};
use crate::error::EngineError;
use crate::system::HardwareModel;

/// Termination cause for a workload that ran to completion.
pub const CAUSE_WORKLOAD_EXIT: &str = "exiting with last active thread context";

/// Termination cause when the configured instruction limit was reached.
pub const CAUSE_INSTRUCTION_LIMIT: &str = "a thread reached the max instruction count";

/// Tick resolution: one simulated picosecond per tick.
const TICKS_PER_SECOND: u64 = 1_000_000_000_000;

/// Cycles to fill the pipeline before the first commit.
const PIPELINE_FILL_CYCLES: u64 = 5;

/// Frontend refill penalty per mispredicted branch, in cycles.
const BRANCH_MISS_PENALTY_CYCLES: u64 = 3;

/// Data-side miss rate applied to memory operations, per mille.
const DCACHE_MISS_PER_MILLE: u64 = 50;

/// Mispredict rate per mille for an attached predictor (or none).
fn mispredict_per_mille(predictor: Option<PredictorKind>) -> u64 {
    match predictor {
        None => 500,
        Some(PredictorKind::Static) => 400,
        Some(PredictorKind::BiMode) => 80,
        Some(PredictorKind::GShare) => 70,
        Some(PredictorKind::Tournament) => 50,
        Some(PredictorKind::Perceptron) => 40,
        Some(PredictorKind::Tage) => 30,
    }
}

/// Per-handle run recipe derived from the instantiated topology.
#[derive(Debug, Clone, Copy)]
struct Recipe {
    /// Instructions across all thread contexts.
    instructions: u64,
    /// Branch-class instructions across all contexts.
    branches: u64,
    /// Load/store-class instructions across all contexts.
    mem_ops: u64,
    /// Commit width of the cores.
    width: u64,
    /// Thread contexts across all cores.
    contexts: u64,
    /// Attached predictor.
    predictor: Option<PredictorKind>,
    /// Cycles a data-side miss costs (bus transit plus controller latency).
    mem_stall_cycles: u64,
    /// Ticks per core clock cycle.
    ticks_per_cycle: u64,
}

/// One instantiated topology.
#[derive(Debug)]
struct Session {
    recipe: Recipe,
    ran: bool,
}

/// Process-wide counters; cumulative until reset.
#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    instructions: u64,
    cycles: u64,
}

/// Deterministic timing engine with process-wide statistics counters.
#[derive(Debug, Default)]
pub struct ReferenceEngine {
    sessions: HashMap<u64, Session>,
    next_handle: u64,
    counters: Counters,
    cur_tick: u64,
    max_insts: Option<u64>,
}

impl ReferenceEngine {
    /// Creates an engine with no instruction limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that terminates runs after `max_insts` committed instructions.
    pub fn with_instruction_limit(max_insts: u64) -> Self {
        Self {
            max_insts: Some(max_insts),
            ..Self::default()
        }
    }

    /// Current simulated tick; monotonic across runs, unaffected by stats resets.
    pub fn cur_tick(&self) -> u64 {
        self.cur_tick
    }

    fn validate(model: &HardwareModel) -> Result<(), EngineError> {
        if model.cores.is_empty() {
            return Err(EngineError::Rejected(String::from("topology has no cores")));
        }
        if !model.system_port_wired {
            return Err(EngineError::Rejected(String::from(
                "system port is not wired to the bus",
            )));
        }
        if !model.memory.bus_wired {
            return Err(EngineError::Rejected(String::from(
                "memory controller is not wired to the bus",
            )));
        }
        if model.memory.range.size == 0 {
            return Err(EngineError::Rejected(String::from("memory range is empty")));
        }
        if (model.workload.text.len() as u64) > model.memory.range.size {
            return Err(EngineError::Rejected(String::from(
                "workload does not fit in the memory range",
            )));
        }
        for core in &model.cores {
            if !core.ports.icache_wired || !core.ports.dcache_wired {
                return Err(EngineError::Rejected(format!(
                    "core {} has an unwired cache port",
                    core.id
                )));
            }
            if core.interrupts.is_none() {
                return Err(EngineError::Rejected(format!(
                    "core {} has no interrupt controller",
                    core.id
                )));
            }
            if !core.workload_bound {
                return Err(EngineError::Rejected(format!(
                    "core {} has no workload binding",
                    core.id
                )));
            }
            if core.config.commit_width == 0 {
                return Err(EngineError::Rejected(format!(
                    "core {} has a zero-width pipeline",
                    core.id
                )));
            }
        }
        if model.workload.instruction_words() == 0 {
            return Err(EngineError::Rejected(String::from(
                "workload has no instruction words",
            )));
        }
        Ok(())
    }

    fn derive_recipe(model: &HardwareModel) -> Recipe {
        let mut per_context = 0u64;
        let mut branches = 0u64;
        let mut mem_ops = 0u64;
        for word in model.workload.text.chunks_exact(4) {
            let word = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            per_context += 1;
            match classify(word) {
                OpClass::Branch => branches += 1,
                OpClass::Mem => mem_ops += 1,
                OpClass::Alu => {}
            }
        }

        let config = model.cores[0].config;
        let contexts = (model.cores.len() * config.num_threads) as u64;
        let ticks_per_cycle = TICKS_PER_SECOND / model.clock.frequency_hz.max(1);
        Recipe {
            instructions: per_context * contexts,
            branches: branches * contexts,
            mem_ops: mem_ops * contexts,
            width: config.commit_width as u64,
            contexts,
            predictor: config.branch_predictor,
            mem_stall_cycles: model.bus.latency_cycles + model.memory.latency_cycles,
            ticks_per_cycle,
        }
    }
}

/// Instruction classes the timing model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpClass {
    Alu,
    Mem,
    Branch,
}

/// Classifies a 32-bit word by RISC-V major opcode.
///
/// Non-RISC-V images still bucket deterministically, which is all the timing
/// model needs.
fn classify(word: u32) -> OpClass {
    match word & 0x7f {
        // BRANCH, JAL, JALR
        0x63 | 0x6f | 0x67 => OpClass::Branch,
        // LOAD, LOAD-FP, STORE, STORE-FP
        0x03 | 0x07 | 0x23 | 0x27 => OpClass::Mem,
        _ => OpClass::Alu,
    }
}

impl SimulationEngine for ReferenceEngine {
    fn instantiate(&mut self, model: &HardwareModel) -> Result<EngineHandle, EngineError> {
        Self::validate(model)?;
        let recipe = Self::derive_recipe(model);

        self.next_handle += 1;
        let handle = self.next_handle;
        self.sessions.insert(handle, Session { recipe, ran: false });
        debug!(
            handle,
            instructions = recipe.instructions,
            width = recipe.width,
            contexts = recipe.contexts,
            "topology instantiated"
        );
        Ok(EngineHandle(handle))
    }

    fn run(&mut self, handle: &EngineHandle) -> Result<TerminationEvent, EngineError> {
        let session = self
            .sessions
            .get_mut(&handle.0)
            .ok_or(EngineError::UnknownHandle(handle.0))?;
        if session.ran {
            return Err(EngineError::ModelReused);
        }
        session.ran = true;
        let recipe = session.recipe;

        let mut committed = recipe.instructions;
        let mut branches = recipe.branches;
        let mut mem_ops = recipe.mem_ops;
        let mut cause = CAUSE_WORKLOAD_EXIT;
        if let Some(limit) = self.max_insts {
            if limit < committed {
                // Scale the class counts down with the truncated stream.
                branches = branches * limit / committed.max(1);
                mem_ops = mem_ops * limit / committed.max(1);
                committed = limit;
                cause = CAUSE_INSTRUCTION_LIMIT;
            }
        }

        let issue_cycles = committed.div_ceil(recipe.width.max(1));
        let mispredicts = branches * mispredict_per_mille(recipe.predictor) / 1000;
        let miss_stalls = mem_ops * DCACHE_MISS_PER_MILLE / 1000 * recipe.mem_stall_cycles;
        // Additional contexts overlap stalls with useful issue slots.
        let stalls = (mispredicts * BRANCH_MISS_PENALTY_CYCLES + miss_stalls) / recipe.contexts.max(1);
        let cycles = PIPELINE_FILL_CYCLES + issue_cycles + stalls;
        let ticks = cycles * recipe.ticks_per_cycle;

        self.counters.instructions += committed;
        self.counters.cycles += cycles;
        self.cur_tick += ticks;
        info!(
            handle = handle.0,
            cause,
            cycles,
            committed,
            tick = self.cur_tick,
            "run terminated"
        );

        Ok(TerminationEvent {
            cause: cause.to_string(),
            ticks,
        })
    }

    fn dump_stats(&mut self, handle: &EngineHandle) -> Result<StatsSnapshot, EngineError> {
        if !self.sessions.contains_key(&handle.0) {
            return Err(EngineError::UnknownHandle(handle.0));
        }
        Ok(StatsSnapshot {
            instructions_committed: self.counters.instructions,
            cycles: self.counters.cycles,
        })
    }

    fn reset_stats(&mut self, _handle: &EngineHandle) {
        debug!("statistics counters reset");
        self.counters = Counters::default();
    }
}
