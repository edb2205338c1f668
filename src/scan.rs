use crate::core::Item;
use anyhow::{bail, Context, Result};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Recursively lists the regular files under `root` with their sizes.
///
/// Entries come back sorted by file name within each directory so the same
/// tree always yields the same order. Hidden entries are skipped and
/// symlinks are not followed.
pub fn scan_inputs(root: &Path) -> Result<Vec<Item>> {
    if !root.is_dir() {
        bail!("Input directory '{}' does not exist", root.display());
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat '{}'", entry.path().display()))?;
        items.push(Item::new(entry.into_path(), metadata.len()));
    }

    tracing::info!(
        root = %root.display(),
        files = items.len(),
        "Scanned input directory"
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_lists_nested_files_in_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pass/batch_1")).unwrap();
        fs::write(root.join("b.fast5"), vec![0u8; 20]).unwrap();
        fs::write(root.join("a.fast5"), vec![0u8; 10]).unwrap();
        fs::write(root.join("pass/batch_1/c.fast5"), vec![0u8; 5]).unwrap();
        fs::write(root.join("empty.fast5"), b"").unwrap();

        let items = scan_inputs(root).unwrap();
        let found: Vec<(String, u64)> = items
            .iter()
            .map(|i| {
                (
                    i.path()
                        .strip_prefix(root)
                        .unwrap()
                        .to_string_lossy()
                        .into_owned(),
                    i.weight,
                )
            })
            .collect();

        assert_eq!(
            found,
            vec![
                ("a.fast5".to_string(), 10),
                ("b.fast5".to_string(), 20),
                ("empty.fast5".to_string(), 0),
                ("pass/batch_1/c.fast5".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".snapshot")).unwrap();
        fs::write(dir.path().join(".snapshot/old.fast5"), b"xx").unwrap();
        fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        fs::write(dir.path().join("reads.fast5"), b"xyz").unwrap();

        let items = scan_inputs(dir.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].weight, 3);
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = scan_inputs(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
