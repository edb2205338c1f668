use crate::core::Group;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

#[cfg(unix)]
fn link(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn link(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

/// Link names for `group`, one per item in order.
///
/// Links are named after the file they point to, so two members sharing a
/// file name cannot be staged together.
fn link_names(group: &Group) -> Result<Vec<&OsStr>> {
    let mut names = HashSet::new();
    let mut ordered = Vec::with_capacity(group.len());
    for item in &group.items {
        let Some(name) = item.path().file_name() else {
            bail!("Input '{}' has no file name", item.path().display());
        };
        if !names.insert(name) {
            bail!(
                "Group {} holds two files named '{}'",
                group.index,
                name.to_string_lossy()
            );
        }
        ordered.push(name);
    }
    Ok(ordered)
}

/// Fails if any group could not be staged, without touching the filesystem.
pub fn check_stageable(groups: &[Group]) -> Result<()> {
    for group in groups {
        link_names(group)?;
    }
    Ok(())
}

/// Creates `dir` and fills it with symlinks to every file of `group`.
///
/// The directory must not exist yet.
pub fn stage_group(group: &Group, dir: &Path) -> Result<()> {
    let names = link_names(group)?;
    if dir.exists() {
        bail!(
            "Staging directory '{}' already exists; refusing to mix runs",
            dir.display()
        );
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create staging directory '{}'", dir.display()))?;

    for (item, name) in group.items.iter().zip(names) {
        let original = std::path::absolute(item.path())
            .with_context(|| format!("Failed to resolve '{}'", item.path().display()))?;
        let dest = dir.join(name);
        link(&original, &dest).with_context(|| {
            format!(
                "Failed to link '{}' -> '{}'",
                dest.display(),
                original.display()
            )
        })?;
    }

    tracing::debug!(
        group = group.index,
        files = group.len(),
        dir = %dir.display(),
        "Staged group"
    );
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::Item;
    use tempfile::tempdir;

    fn group_of(paths: &[&Path]) -> Group {
        let items: Vec<Item> = paths.iter().map(|p| Item::new(*p, 1)).collect();
        crate::core::partition(&items, 1).unwrap().remove(0)
    }

    #[test]
    fn test_stage_group_links_files() {
        let input = tempdir().unwrap();
        let stage = tempdir().unwrap();
        let a = input.path().join("a.fast5");
        let b = input.path().join("nested_b.fast5");
        fs::write(&a, b"aaaa").unwrap();
        fs::write(&b, b"bb").unwrap();

        let dir = stage.path().join("subset0");
        stage_group(&group_of(&[&a, &b]), &dir).unwrap();

        let link_a = dir.join("a.fast5");
        assert!(fs::symlink_metadata(&link_a).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link_a).unwrap(), a);
        assert_eq!(fs::read(dir.join("nested_b.fast5")).unwrap(), b"bb");
    }

    #[test]
    fn test_stage_group_rejects_existing_dir() {
        let stage = tempdir().unwrap();
        let err = stage_group(&group_of(&[]), stage.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_stage_group_rejects_duplicate_names() {
        let input = tempdir().unwrap();
        let stage = tempdir().unwrap();
        fs::create_dir(input.path().join("pass")).unwrap();
        fs::create_dir(input.path().join("fail")).unwrap();
        let first = input.path().join("pass/reads.fast5");
        let second = input.path().join("fail/reads.fast5");
        fs::write(&first, b"1").unwrap();
        fs::write(&second, b"2").unwrap();

        let err = stage_group(&group_of(&[&first, &second]), &stage.path().join("subset0"))
            .unwrap_err();
        assert!(err.to_string().contains("two files named 'reads.fast5'"));
        assert!(!stage.path().join("subset0").exists());
    }

    #[test]
    fn test_check_stageable_names_offending_group() {
        let first = group_of(&[Path::new("/data/big.fast5")]);
        let mut second = group_of(&[
            Path::new("/data/pass/reads.fast5"),
            Path::new("/data/fail/reads.fast5"),
        ]);
        second.index = 1;

        assert!(check_stageable(std::slice::from_ref(&first)).is_ok());
        let err = check_stageable(&[first, second]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Group 1 holds two files named 'reads.fast5'"
        );
    }
}
