use super::error::PlanError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One scheduler submission covering a contiguous run of groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub index: usize,
    pub groups: Range<usize>,
    /// Nodes to request; one per group folded into this job
    pub node_count: usize,
}

impl Job {
    fn new(index: usize, groups: Range<usize>) -> Self {
        let node_count = groups.len();
        Self {
            index,
            groups,
            node_count,
        }
    }

    /// Whether the job runs several groups side by side on separate nodes.
    pub fn is_multi_group(&self) -> bool {
        self.node_count > 1
    }

    pub fn first_group(&self) -> usize {
        self.groups.start
    }

    pub fn last_group(&self) -> usize {
        self.groups.end - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub jobs: Vec<Job>,
    pub requested: usize,
}

impl BatchOutcome {
    pub fn effective(&self) -> usize {
        self.jobs.len()
    }

    pub fn was_reduced(&self) -> bool {
        self.effective() < self.requested
    }
}

/// Folds `group_count` groups into at most `requested_jobs` jobs.
///
/// With at least as many jobs as groups every group gets its own job.
/// Otherwise each job takes `ceil(groups / jobs)` consecutive groups and the
/// last one takes what is left, so ranges never come out empty. When the
/// chunks run out early the job count shrinks to the ranges produced.
pub fn fold_into_jobs(group_count: usize, requested_jobs: usize) -> Result<BatchOutcome, PlanError> {
    if requested_jobs == 0 {
        return Err(PlanError::invalid("job count", "must be at least 1"));
    }
    if group_count == 0 {
        return Err(PlanError::invalid("group count", "must be at least 1"));
    }

    let groups_per_job = if requested_jobs >= group_count {
        1
    } else {
        group_count.div_ceil(requested_jobs)
    };

    let jobs: Vec<Job> = (0..group_count)
        .step_by(groups_per_job)
        .enumerate()
        .map(|(index, start)| Job::new(index, start..(start + groups_per_job).min(group_count)))
        .collect();

    let outcome = BatchOutcome {
        jobs,
        requested: requested_jobs,
    };

    if outcome.was_reduced() {
        tracing::warn!(
            requested = requested_jobs,
            effective = outcome.effective(),
            groups = group_count,
            "Job count reduced to fit the number of groups"
        );
    }
    tracing::debug!(groups_per_job, jobs = outcome.effective(), "Folded groups into jobs");

    Ok(outcome)
}
