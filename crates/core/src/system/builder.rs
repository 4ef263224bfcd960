//! Hardware model assembly and the top-level `HardwareModel` type.
//!
//! This module builds a complete topology from a resolved core configuration.
//! Assembly runs in a fixed dependency order, because downstream ports need
//! their targets to already exist:
//! 1. **Clock:** Source clock domain and its voltage domain.
//! 2. **Interconnect:** The memory bus.
//! 3. **Cores:** One or more core instances sized per the configuration.
//! 4. **Memory:** Controller bound to a fixed address range and wired to the bus.
//! 5. **Ports:** Instruction/data ports of every core wired to the bus.
//! 6. **Interrupts:** An interrupt controller attached per core.
//! 7. **Workload:** Binary resolved from disk and bound to every core.
//! 8. **System port:** Top-level port wired to the bus.
//!
//! No partially wired model is observable: `build` either returns a fully
//! assembled `HardwareModel` or an error.

use std::path::Path;

use tracing::debug;

use crate::config::{CoreConfig, defaults};
use crate::error::BuildError;
use crate::system::clock::ClockDomain;
use crate::system::core::{CoreInstance, InterruptController};
use crate::system::interconnect::MemoryBus;
use crate::system::memory::{AddrRange, MemoryController};
use crate::workload::WorkloadBinding;

/// A fully assembled hardware topology, ready for engine instantiation.
///
/// Owned by the run orchestrator for exactly one run and discarded after
/// stats extraction; each experiment gets a fresh model so no wiring state
/// survives across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareModel {
    /// Clock/voltage domain for the whole model.
    pub clock: ClockDomain,
    /// Memory bus interconnect.
    pub bus: MemoryBus,
    /// Core instances, fully wired.
    pub cores: Vec<CoreInstance>,
    /// Memory controller serving the model's address range.
    pub memory: MemoryController,
    /// Workload bound to every core's execution context.
    pub workload: WorkloadBinding,
    /// Whether the top-level system port is wired to the bus.
    pub system_port_wired: bool,
}

/// Builder assembling hardware models from resolved core configurations.
///
/// Topology knobs default to the constants in [`crate::config::defaults`];
/// experiments normally vary only the core configuration.
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder {
    num_cores: usize,
    clock_hz: u64,
    volts: f64,
    bus_width_bytes: u64,
    bus_latency_cycles: u64,
    mem_base: u64,
    mem_size_bytes: u64,
    mem_latency_cycles: u64,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            num_cores: defaults::NUM_CORES,
            clock_hz: defaults::CLOCK_HZ,
            volts: defaults::VOLTAGE,
            bus_width_bytes: defaults::BUS_WIDTH_BYTES,
            bus_latency_cycles: defaults::BUS_LATENCY_CYCLES,
            mem_base: defaults::MEM_BASE,
            mem_size_bytes: defaults::MEM_SIZE_BYTES,
            mem_latency_cycles: defaults::MEM_LATENCY_CYCLES,
        }
    }
}

impl ModelBuilder {
    /// Creates a builder with default topology knobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of core instances.
    pub fn num_cores(mut self, num_cores: usize) -> Self {
        self.num_cores = num_cores;
        self
    }

    /// Overrides the memory range capacity in bytes.
    pub fn mem_size_bytes(mut self, size: u64) -> Self {
        self.mem_size_bytes = size;
        self
    }

    /// Assembles a hardware model for `config` running the workload at `workload_path`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoCores`] when the builder is configured with
    /// zero cores, [`BuildError::ZeroStageWidth`] when the core configuration
    /// carries a zero width (a configuration that never came out of the
    /// resolver), and [`BuildError::Workload`] when the workload path cannot
    /// be resolved.
    pub fn build(&self, config: &CoreConfig, workload_path: &Path) -> Result<HardwareModel, BuildError> {
        check_core_config(config)?;
        if self.num_cores == 0 {
            return Err(BuildError::NoCores);
        }

        let clock = ClockDomain::new(self.clock_hz, self.volts);
        let bus = MemoryBus::new(self.bus_width_bytes, self.bus_latency_cycles);
        debug!(frequency_hz = clock.frequency_hz, "clock domain created");

        let mut cores: Vec<CoreInstance> = (0..self.num_cores)
            .map(|id| CoreInstance::new(id, *config))
            .collect();

        let mut memory = MemoryController::new(
            AddrRange::new(self.mem_base, self.mem_size_bytes),
            self.mem_latency_cycles,
        );
        memory.bus_wired = true;

        for core in &mut cores {
            core.ports.icache_wired = true;
            core.ports.dcache_wired = true;
            core.interrupts = Some(InterruptController { core_id: core.id });
        }

        let workload = WorkloadBinding::resolve(workload_path)?;
        for core in &mut cores {
            core.workload_bound = true;
        }
        debug!(
            workload = %workload.name,
            cores = cores.len(),
            width = config.issue_width,
            threads = config.num_threads,
            "hardware model assembled"
        );

        Ok(HardwareModel {
            clock,
            bus,
            cores,
            memory,
            workload,
            system_port_wired: true,
        })
    }
}

/// Rejects core configurations a wiring step cannot accept.
fn check_core_config(config: &CoreConfig) -> Result<(), BuildError> {
    let widths = [
        ("fetch", config.fetch_width),
        ("decode", config.decode_width),
        ("issue", config.issue_width),
        ("execute", config.execute_width),
        ("commit", config.commit_width),
    ];
    for (stage, width) in widths {
        if width == 0 {
            return Err(BuildError::ZeroStageWidth(stage));
        }
    }
    if config.num_threads == 0 {
        return Err(BuildError::ZeroStageWidth("thread"));
    }
    Ok(())
}
