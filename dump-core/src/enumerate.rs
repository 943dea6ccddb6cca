/*!
Directory enumeration for archive builds.

A dump archives the immediate sub-directories of a storage root, one archive
entry per sub-directory. Files and other non-directory children of the root
are not part of a library-built dump.
*/

use std::path::Path;

use crate::{DumpError, Result};

/// List the names of the immediate child directories of `root`.
///
/// Non-directory entries (files, sockets, dangling symlinks) are skipped.
/// The result is sorted so that one build always archives entries in a
/// stable order; callers must not rely on any particular order beyond that.
///
/// # Errors
/// `DumpError::Enumeration` if `root` does not exist or cannot be read.
pub fn list_subdirectories(root: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(root).map_err(|e| {
        DumpError::enumeration(format!("Failed to read storage root {}: {}", root.display(), e))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            DumpError::enumeration(format!(
                "Failed to read entry under {}: {}",
                root.display(),
                e
            ))
        })?;

        let file_type = entry.file_type().map_err(|e| {
            DumpError::enumeration(format!(
                "Failed to stat {}: {}",
                entry.path().display(),
                e
            ))
        })?;

        if file_type.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("alpha")).unwrap();
        std::fs::create_dir(temp_dir.path().join("beta")).unwrap();
        std::fs::write(temp_dir.path().join("stray.txt"), b"not a dir").unwrap();

        let names = list_subdirectories(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let names = list_subdirectories(temp_dir.path()).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = list_subdirectories(&missing);
        assert!(matches!(result, Err(DumpError::Enumeration(_))));
    }

    #[test]
    fn test_order_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["zeta", "mid", "aaa"] {
            std::fs::create_dir(temp_dir.path().join(name)).unwrap();
        }

        let first = list_subdirectories(temp_dir.path()).unwrap();
        let second = list_subdirectories(temp_dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["aaa", "mid", "zeta"]);
    }
}
