//! Memory bus interconnect.

/// System memory bus connecting cores, the memory controller, and the system port.
///
/// Carries the width and latency the engine uses for transfer timing; port
/// wiring is recorded on the endpoints (cores, memory controller, model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBus {
    /// Transfer width in bytes (e.g., 8 for a 64-bit bus).
    pub width_bytes: u64,
    /// Base latency in cycles per transaction.
    pub latency_cycles: u64,
}

impl MemoryBus {
    /// Creates a bus with the given width and latency.
    pub fn new(width_bytes: u64, latency_cycles: u64) -> Self {
        Self {
            width_bytes,
            latency_cycles,
        }
    }
}
