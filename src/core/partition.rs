use super::error::PlanError;
use super::item::{total_weight, Item};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// One balanced subset of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    pub items: Vec<Item>,
    pub total_weight: u64,
}

impl Group {
    fn empty(index: usize) -> Self {
        Self {
            index,
            items: Vec::new(),
            total_weight: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Largest group count accepted when it exceeds the number of items.
pub const MAX_GROUP_COUNT: usize = 1 << 20;

/// Splits `items` into exactly `group_count` groups of roughly equal weight.
///
/// Longest-processing-time first: items are taken heaviest first (ties in
/// enumeration order) and each goes to the currently lightest group, ties
/// going to the lowest index. This is an approximation; the heaviest group is
/// at most `4/3 - 1/(3n)` times the optimum.
pub fn partition(items: &[Item], group_count: usize) -> Result<Vec<Group>, PlanError> {
    if group_count == 0 {
        return Err(PlanError::invalid("group count", "must be at least 1"));
    }
    if group_count > items.len().max(MAX_GROUP_COUNT) {
        return Err(PlanError::invalid(
            "group count",
            format!(
                "{group_count} exceeds both the {} input files and the limit of {MAX_GROUP_COUNT}",
                items.len()
            ),
        ));
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    // Stable, so equal weights keep their enumeration order
    order.sort_by_key(|&i| Reverse(items[i].weight));

    let mut groups: Vec<Group> = (0..group_count).map(Group::empty).collect();

    // Min-heap on (accumulated weight, group index)
    let mut lightest: BinaryHeap<Reverse<(u64, usize)>> =
        (0..group_count).map(|index| Reverse((0, index))).collect();

    for i in order {
        let item = &items[i];
        // One entry per group is always pushed back, so the heap never drains
        let Some(Reverse((weight, index))) = lightest.pop() else {
            break;
        };
        let group = &mut groups[index];
        group.items.push(item.clone());
        group.total_weight = weight + item.weight;
        lightest.push(Reverse((group.total_weight, index)));
    }

    verify(items, &groups)?;

    tracing::debug!(
        items = items.len(),
        groups = group_count,
        heaviest = groups.iter().map(|g| g.total_weight).max().unwrap_or(0),
        lightest = groups.iter().map(|g| g.total_weight).min().unwrap_or(0),
        "Partitioned items"
    );

    Ok(groups)
}

/// Checks that the groups hold exactly the input weight and item count.
fn verify(items: &[Item], groups: &[Group]) -> Result<(), PlanError> {
    let expected = total_weight(items);
    let actual: u64 = groups.iter().map(|g| g.total_weight).sum();
    let placed: usize = groups.iter().map(Group::len).sum();

    if expected != actual || placed != items.len() {
        tracing::error!(expected, actual, placed, "Partition integrity check failed");
        return Err(PlanError::PartitionIntegrity { expected, actual });
    }
    Ok(())
}
