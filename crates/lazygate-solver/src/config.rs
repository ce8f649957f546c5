//! Solver configuration.

/// Workers per logical CPU in the default configuration.
///
/// Evaluation tasks spend most of their time blocked on child results, so
/// the pool is sized well beyond the hardware parallelism.
pub const OVERSUBSCRIPTION: usize = 64;

/// Configuration for a [`Solver`](crate::Solver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of worker threads. Clamped to at least one.
    pub workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::oversubscribed(OVERSUBSCRIPTION)
    }
}

impl SolverConfig {
    /// Configuration with an explicit worker count.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// `factor` workers per logical CPU.
    pub fn oversubscribed(factor: usize) -> Self {
        Self::new(num_cpus::get().saturating_mul(factor))
    }

    /// Small pool for tests and shallow circuits.
    pub fn minimal() -> Self {
        Self::new(4)
    }
}
