//! Finds container files present under both the old and new script trees,
//! using the on-disk `<stem>_ysc/<name>.full` convention.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FULL_SUFFIX: &str = ".full";
/// Length of the suffix stripped from a container filename to recover its
/// stem (covers both the `.full` extension and the preceding script-type
/// tag, e.g. `.ysc.full`).
const STEM_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub name: String,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

fn container_dir_for(root: &Path, stem: &str, file_name: &str) -> PathBuf {
    root.join(format!("{stem}_ysc")).join(file_name)
}

/// Walk `old_root` for `.full` files and pair each against its expected
/// counterpart under `new_root`. Filenames shorter than the stripped suffix
/// are skipped; a pair whose new-side file is absent is silently dropped —
/// that is not an error, see the error-handling design.
pub fn scan_pairs(old_root: &Path, new_root: &Path) -> Result<Vec<Pairing>> {
    let mut names: BTreeSet<String> = BTreeSet::new();

    for entry in WalkDir::new(old_root) {
        let entry = entry.with_context(|| format!("walk {}", old_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if file_name.ends_with(FULL_SUFFIX) && file_name.len() > STEM_SUFFIX_LEN {
            names.insert(file_name.into_owned());
        }
    }

    let mut pairs = Vec::with_capacity(names.len());
    for file_name in names {
        let stem = &file_name[..file_name.len() - STEM_SUFFIX_LEN];
        let old_path = container_dir_for(old_root, stem, &file_name);
        let new_path = container_dir_for(new_root, stem, &file_name);

        if !old_path.is_file() || !new_path.is_file() {
            continue;
        }

        pairs.push(Pairing {
            name: stem.to_string(),
            old_path,
            new_path,
        });
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn pairs_matching_containers_under_the_ysc_convention() {
        let dir = tempfile::tempdir().unwrap();
        let old_root = dir.path().join("old");
        let new_root = dir.path().join("new");

        touch(&old_root.join("freemode_ysc").join("freemode.ysc.full"));
        touch(&new_root.join("freemode_ysc").join("freemode.ysc.full"));

        let pairs = scan_pairs(&old_root, &new_root).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].name, "freemode");
    }

    #[test]
    fn old_only_file_yields_no_pair() {
        let dir = tempfile::tempdir().unwrap();
        let old_root = dir.path().join("old");
        let new_root = dir.path().join("new");
        fs::create_dir_all(&new_root).unwrap();

        touch(&old_root.join("solo_ysc").join("solo.ysc.full"));

        let pairs = scan_pairs(&old_root, &new_root).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn non_full_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let old_root = dir.path().join("old");
        let new_root = dir.path().join("new");

        touch(&old_root.join("misc_ysc").join("readme.txt"));
        touch(&new_root.join("misc_ysc").join("readme.txt"));

        let pairs = scan_pairs(&old_root, &new_root).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn pairing_order_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let old_root = dir.path().join("old");
        let new_root = dir.path().join("new");

        for name in ["zzz", "aaa", "mmm"] {
            let file = format!("{name}.ysc.full");
            touch(&old_root.join(format!("{name}_ysc")).join(&file));
            touch(&new_root.join(format!("{name}_ysc")).join(&file));
        }

        let pairs = scan_pairs(&old_root, &new_root).unwrap();
        let names: Vec<_> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["aaa", "mmm", "zzz"]);
    }
}
