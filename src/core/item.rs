use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single unit of input: a file path and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: PathBuf,
    pub weight: u64,
}

impl Item {
    pub fn new(id: impl Into<PathBuf>, weight: u64) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }

    pub fn path(&self) -> &Path {
        &self.id
    }
}

/// Sum of all item weights.
pub fn total_weight(items: &[Item]) -> u64 {
    items.iter().map(|item| item.weight).sum()
}

/// Weight of the heaviest item, or `None` for an empty slice.
pub fn largest_weight(items: &[Item]) -> Option<u64> {
    items.iter().map(|item| item.weight).max()
}
