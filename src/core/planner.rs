use super::batch::{fold_into_jobs, Job};
use super::error::PlanError;
use super::estimate::{estimate, SizeEstimate, ThroughputModel};
use super::item::{largest_weight, total_weight, Item};
use super::partition::{partition, Group};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Non-fatal conditions worth showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNotice {
    JobCountReduced { requested: usize, effective: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub index: usize,
    pub item_count: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub index: usize,
    pub node_count: usize,
    pub ppn: u32,
    pub groups: Range<usize>,
    pub total_bytes: u64,
}

/// Figures for reporting, derived from the groups and jobs of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub item_count: usize,
    pub total_bytes: u64,
    pub efficiency: f64,
    pub max_group_bytes: u64,
    pub requested_jobs: usize,
    pub groups: Vec<GroupSummary>,
    pub jobs: Vec<JobSummary>,
}

impl PlanSummary {
    fn build(
        items: &[Item],
        estimate: &SizeEstimate,
        groups: &[Group],
        jobs: &[Job],
        requested_jobs: usize,
        ppn: u32,
    ) -> Self {
        let groups_summary: Vec<GroupSummary> = groups
            .iter()
            .map(|g| GroupSummary {
                index: g.index,
                item_count: g.len(),
                total_bytes: g.total_weight,
            })
            .collect();

        let jobs_summary = jobs
            .iter()
            .map(|j| JobSummary {
                index: j.index,
                node_count: j.node_count,
                ppn,
                groups: j.groups.clone(),
                total_bytes: groups[j.groups.clone()]
                    .iter()
                    .map(|g| g.total_weight)
                    .sum(),
            })
            .collect();

        Self {
            item_count: items.len(),
            total_bytes: total_weight(items),
            efficiency: estimate.efficiency,
            max_group_bytes: estimate.max_group_bytes,
            requested_jobs,
            groups: groups_summary,
            jobs: jobs_summary,
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

/// A complete group and job assignment, ready for the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub estimate: SizeEstimate,
    pub groups: Vec<Group>,
    pub jobs: Vec<Job>,
    pub notices: Vec<PlanNotice>,
    pub summary: PlanSummary,
}

impl PlanResult {
    /// Groups handled by `job`, in index order.
    pub fn groups_of(&self, job: &Job) -> &[Group] {
        &self.groups[job.groups.clone()]
    }
}

/// Sizes, partitions and batches a set of items under one throughput model.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    model: ThroughputModel,
}

impl Planner {
    pub fn new(model: ThroughputModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ThroughputModel {
        &self.model
    }

    pub fn plan(
        &self,
        items: &[Item],
        explicit_group_count: Option<usize>,
        requested_jobs: usize,
    ) -> Result<PlanResult, PlanError> {
        if requested_jobs == 0 {
            return Err(PlanError::invalid("job count", "must be at least 1"));
        }

        let estimate = estimate(
            &self.model,
            total_weight(items),
            largest_weight(items),
            explicit_group_count,
        )?;
        let groups = partition(items, estimate.group_count)?;
        let batch = fold_into_jobs(groups.len(), requested_jobs)?;

        let mut notices = Vec::new();
        if batch.was_reduced() {
            notices.push(PlanNotice::JobCountReduced {
                requested: batch.requested,
                effective: batch.effective(),
            });
        }

        let summary = PlanSummary::build(
            items,
            &estimate,
            &groups,
            &batch.jobs,
            requested_jobs,
            self.model.reference_parallelism,
        );

        tracing::info!(
            items = summary.item_count,
            total_bytes = summary.total_bytes,
            groups = summary.group_count(),
            jobs = summary.job_count(),
            "Plan ready"
        );

        Ok(PlanResult {
            estimate,
            groups,
            jobs: batch.jobs,
            notices,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BYTES_PER_GB;
    use std::collections::HashSet;

    const GB: u64 = BYTES_PER_GB;

    fn gb_items(sizes_gb: &[u64]) -> Vec<Item> {
        sizes_gb
            .iter()
            .enumerate()
            .map(|(i, &gb)| Item::new(format!("/data/run1/batch_{i}.fast5"), gb * GB))
            .collect()
    }

    /// 20 h/GB on 24 cores with a 48 h target: 57.6 GB per group
    fn default_planner() -> Planner {
        Planner::new(ThroughputModel::default())
    }

    #[test]
    fn test_plan_example_scenario() {
        let items = gb_items(&[10, 10, 10, 10, 50]);
        let plan = default_planner().plan(&items, Some(3), 1).unwrap();

        let totals: Vec<u64> = plan.groups.iter().map(|g| g.total_weight / GB).collect();
        assert_eq!(totals, vec![50, 20, 20]);
        assert_eq!(plan.jobs.len(), 1);
        assert_eq!(plan.jobs[0].groups, 0..3);
        assert!(plan.notices.is_empty());
    }

    #[test]
    fn test_plan_rejects_huge_explicit_group_count() {
        let items = gb_items(&[1, 2]);
        let err = default_planner().plan(&items, Some(usize::MAX), 1).unwrap_err();
        assert!(matches!(err, PlanError::InvalidParameter { .. }));
    }

    #[test]
    fn test_plan_derives_group_count() {
        // 90 GB at 57.6 GB per group
        let items = gb_items(&[30, 30, 30]);
        let plan = default_planner().plan(&items, None, 1).unwrap();

        assert_eq!(plan.estimate.group_count, 2);
        assert!(!plan.estimate.explicit);
        assert_eq!(plan.groups.len(), 2);
    }

    #[test]
    fn test_plan_reports_job_reduction() {
        let items = gb_items(&[1, 2, 3, 4]);
        let plan = default_planner().plan(&items, Some(4), 10).unwrap();

        assert_eq!(plan.jobs.len(), 4);
        assert_eq!(
            plan.notices,
            vec![PlanNotice::JobCountReduced {
                requested: 10,
                effective: 4,
            }]
        );
    }

    #[test]
    fn test_plan_infeasible_item() {
        let items = gb_items(&[1, 58]);
        let err = default_planner().plan(&items, Some(10), 1).unwrap_err();
        assert!(matches!(err, PlanError::InfeasiblePartition { .. }));
    }

    #[test]
    fn test_plan_rejects_zero_jobs() {
        let items = gb_items(&[1]);
        assert!(matches!(
            default_planner().plan(&items, None, 0),
            Err(PlanError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_plan_summary_matches_groups_and_jobs() {
        let items = gb_items(&[5, 4, 3, 2, 1]);
        let plan = default_planner().plan(&items, Some(5), 2).unwrap();
        let summary = &plan.summary;

        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.total_bytes, 15 * GB);
        assert_eq!(summary.group_count(), 5);
        assert_eq!(summary.job_count(), 2);
        assert_eq!(summary.requested_jobs, 2);

        assert_eq!(summary.jobs[0].groups, 0..3);
        assert_eq!(summary.jobs[0].node_count, 3);
        assert_eq!(summary.jobs[0].ppn, 24);
        assert_eq!(summary.jobs[0].total_bytes, 12 * GB);
        assert_eq!(summary.jobs[1].total_bytes, 3 * GB);

        for (group, row) in plan.groups.iter().zip(&summary.groups) {
            assert_eq!(group.total_weight, row.total_bytes);
            assert_eq!(group.len(), row.item_count);
        }
    }

    #[test]
    fn test_groups_of_job() {
        let items = gb_items(&[5, 4, 3, 2, 1]);
        let plan = default_planner().plan(&items, Some(5), 2).unwrap();

        let second = plan.groups_of(&plan.jobs[1]);
        let indices: Vec<usize> = second.iter().map(|g| g.index).collect();
        assert_eq!(indices, vec![3, 4]);
    }

    #[test]
    fn test_plan_serializes_identically() {
        let items = gb_items(&[7, 3, 3, 9, 1, 1, 12, 5]);
        let planner = default_planner();
        let first = serde_json::to_string(&planner.plan(&items, Some(3), 2).unwrap()).unwrap();
        let second = serde_json::to_string(&planner.plan(&items, Some(3), 2).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every input path shows up once across all jobs' groups
            #[test]
            fn prop_plan_covers_every_item(
                sizes in prop::collection::vec(0u64..50_000_000_000, 1..48),
                requested_jobs in 1usize..12,
            ) {
                let items: Vec<Item> = sizes
                    .iter()
                    .enumerate()
                    .map(|(i, &s)| Item::new(format!("f{i}"), s))
                    .collect();
                let plan = default_planner().plan(&items, None, requested_jobs).unwrap();

                let mut seen = HashSet::new();
                for job in &plan.jobs {
                    for group in plan.groups_of(job) {
                        for item in &group.items {
                            prop_assert!(seen.insert(item.id.clone()));
                        }
                    }
                }
                prop_assert_eq!(seen.len(), items.len());
                let nodes: usize = plan.jobs.iter().map(|j| j.node_count).sum();
                prop_assert_eq!(nodes, plan.groups.len());
            }

            /// Property: an oversized file fails no matter the group count
            #[test]
            fn prop_oversized_item_always_infeasible(
                extra in 1u64..1_000_000,
                group_count in proptest::option::of(1usize..50),
            ) {
                let planner = default_planner();
                let budget = planner.model().max_group_bytes().unwrap();
                let items = vec![Item::new("small", 1), Item::new("huge", budget + extra)];

                let result = planner.plan(&items, group_count, 1);
                let is_infeasible = matches!(result, Err(PlanError::InfeasiblePartition { .. }));
                prop_assert!(is_infeasible);
            }
        }
    }
}
