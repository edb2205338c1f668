use thiserror::Error;

/// Failures surfaced by the planning core.
///
/// Planning is all-or-nothing: any of these aborts the plan before a
/// partial result can reach the writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Conflicting configuration: {0}")]
    ConfigurationConflict(String),

    #[error(
        "Largest file ({largest} bytes) exceeds the per-group budget of {budget} bytes; \
         raise the walltime or the core count"
    )]
    InfeasiblePartition { largest: u64, budget: u64 },

    #[error("Partition lost weight: expected {expected} bytes, groups hold {actual} bytes")]
    PartitionIntegrity { expected: u64, actual: u64 },

    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl PlanError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
