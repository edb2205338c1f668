pub mod batch;
pub mod error;
pub mod estimate;
pub mod item;
pub mod partition;
pub mod planner;
pub mod profile;

use std::path::PathBuf;

pub use batch::{fold_into_jobs, BatchOutcome, Job};
pub use error::PlanError;
pub use estimate::{SizeEstimate, ThroughputModel};
pub use item::Item;
pub use partition::{partition, Group};
pub use planner::{GroupSummary, JobSummary, PlanNotice, PlanResult, PlanSummary, Planner};
pub use profile::ProcessingProfile;

/// Bytes per GB used by the throughput model.
pub const BYTES_PER_GB: u64 = 1 << 30;

const VERSION_MESSAGE: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    let author = clap::crate_authors!();

    Box::leak(Box::new(format!(
        "\
{VERSION_MESSAGE}
Authors: {author}"
    )))
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))
        .map(|p| p.join("gsplit"))
}
