use super::error::PlanError;
use super::BYTES_PER_GB;
use serde::{Deserialize, Serialize};

/// Empirical processing rate used to size groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputModel {
    /// CPU hours needed per GB when running on `reference_parallelism` cores
    pub hours_per_gb: f64,
    /// Core count the rate was measured on, also requested as ppn
    pub reference_parallelism: u32,
    /// Wall-clock hours each group should take
    pub target_walltime_hours: f64,
}

impl Default for ThroughputModel {
    fn default() -> Self {
        Self {
            hours_per_gb: 20.0,
            reference_parallelism: 24,
            target_walltime_hours: 48.0,
        }
    }
}

impl ThroughputModel {
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.hours_per_gb.is_finite() || self.hours_per_gb <= 0.0 {
            return Err(PlanError::invalid(
                "hours per GB",
                format!("must be a positive number (got {})", self.hours_per_gb),
            ));
        }
        if self.reference_parallelism == 0 {
            return Err(PlanError::invalid(
                "reference parallelism",
                "must be at least 1 core",
            ));
        }
        if !self.target_walltime_hours.is_finite() || self.target_walltime_hours <= 0.0 {
            return Err(PlanError::invalid(
                "target walltime",
                format!(
                    "must be a positive number of hours (got {})",
                    self.target_walltime_hours
                ),
            ));
        }
        Ok(())
    }

    /// Wall-clock hours per GB once the rate is spread over the reference cores.
    pub fn efficiency(&self) -> f64 {
        self.hours_per_gb / f64::from(self.reference_parallelism)
    }

    /// Largest number of bytes a single group may hold and still finish
    /// within the target walltime.
    pub fn max_group_bytes(&self) -> Result<u64, PlanError> {
        self.validate()?;
        let gigabytes = self.target_walltime_hours / self.efficiency();
        let bytes = (gigabytes * BYTES_PER_GB as f64).floor();
        if bytes < 1.0 {
            return Err(PlanError::invalid(
                "target walltime",
                "too short to fit a single byte per group",
            ));
        }
        // `as` saturates for values beyond u64::MAX
        Ok(bytes as u64)
    }
}

/// Outcome of sizing: how many groups to build and how large each may be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEstimate {
    pub efficiency: f64,
    pub max_group_bytes: u64,
    pub group_count: usize,
    /// Whether `group_count` came from the caller rather than the model
    pub explicit: bool,
}

/// Derives the group count for `total_weight` bytes of input.
///
/// `largest_weight` is checked against the per-group budget before any
/// partitioning happens: a file that cannot fit in a single group makes
/// every group count infeasible, including an explicit one.
pub fn estimate(
    model: &ThroughputModel,
    total_weight: u64,
    largest_weight: Option<u64>,
    explicit_group_count: Option<usize>,
) -> Result<SizeEstimate, PlanError> {
    let max_group_bytes = model.max_group_bytes()?;

    if let Some(largest) = largest_weight {
        if largest > max_group_bytes {
            return Err(PlanError::InfeasiblePartition {
                largest,
                budget: max_group_bytes,
            });
        }
    }

    let (group_count, explicit) = match explicit_group_count {
        Some(0) => {
            return Err(PlanError::invalid("group count", "must be at least 1"));
        }
        Some(count) => (count, true),
        None => {
            let derived = total_weight.div_ceil(max_group_bytes).max(1);
            let derived = usize::try_from(derived)
                .map_err(|_| PlanError::invalid("group count", "exceeds addressable size"))?;
            (derived, false)
        }
    };

    tracing::debug!(
        efficiency = model.efficiency(),
        max_group_bytes,
        group_count,
        explicit,
        "Estimated group count"
    );

    Ok(SizeEstimate {
        efficiency: model.efficiency(),
        max_group_bytes,
        group_count,
        explicit,
    })
}
