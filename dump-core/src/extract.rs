/*!
Streaming archive extraction.

Shared by the file-backed and HTTP-backed restore paths. The extractor
consumes archive bytes entry-by-entry as they arrive (the source is never
seekable), creating parent directories on demand and streaming each entry's
bytes straight to its destination file.

Restores are best-effort, not transactional: an entry-level failure aborts
the operation but entries written before the failure remain on disk.
*/

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::config::DeployMode;
use crate::{DumpError, Result};

/// Normalize an archive-declared entry path into a safe relative path.
///
/// Leading `./` segments are dropped. Absolute paths and any `..` component
/// are rejected: entry paths are attacker-controlled on the remote restore
/// path and must never resolve outside the destination root.
fn sanitize_entry_path(declared: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in declared.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(DumpError::path_safety(format!(
                    "Entry path {} escapes the destination root",
                    declared.display()
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(DumpError::path_safety(format!(
                    "Entry path {} is absolute",
                    declared.display()
                )));
            }
        }
    }
    Ok(clean)
}

/// Destination path for a file entry: the sanitized relative path resolved
/// under `root`, with the deployment suffix appended to the file name.
fn file_destination(root: &Path, relative: &Path, mode: DeployMode) -> PathBuf {
    let suffix = mode.suffix();
    if suffix.is_empty() {
        return root.join(relative);
    }

    let mut name = relative
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    root.join(relative).with_file_name(name)
}

/// Extract a gzip-compressed tar stream into `root`.
///
/// Entries are processed in arrival order. Directory entries are created
/// idempotently and never suffixed; file entries are written at their
/// declared relative path plus the deployment suffix. Entry kinds with no
/// on-disk meaning here (symlinks, hard links, device nodes) are skipped.
///
/// Returns the destination root on success.
pub fn extract_archive<R: Read>(reader: R, root: &Path, mode: DeployMode) -> Result<PathBuf> {
    let decoder = GzDecoder::new(reader);
    let mut archive = tar::Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| DumpError::extraction(format!("Failed to open archive stream: {e}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| DumpError::extraction(format!("Failed to read archive entry: {e}")))?;

        let declared = entry
            .path()
            .map_err(|e| DumpError::extraction(format!("Failed to decode entry path: {e}")))?
            .into_owned();
        let relative = sanitize_entry_path(&declared)?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            // "." from tool-built archives sanitizes to an empty path
            if relative.as_os_str().is_empty() {
                continue;
            }
            let dir = root.join(&relative);
            std::fs::create_dir_all(&dir).map_err(|e| {
                DumpError::extraction(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
            continue;
        }

        if !entry_type.is_file() {
            warn!(path = %declared.display(), kind = ?entry_type, "Skipping unsupported archive entry");
            continue;
        }

        // A file entry must name a file; an empty relative path would make
        // the destination resolve to the root itself (or, suffixed, to a
        // sibling of it).
        if relative.as_os_str().is_empty() {
            return Err(DumpError::path_safety(format!(
                "File entry {} has no file name",
                declared.display()
            )));
        }

        let destination = file_destination(root, &relative, mode);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DumpError::extraction(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = std::fs::File::create(&destination).map_err(|e| {
            DumpError::extraction(format!("Failed to create {}: {e}", destination.display()))
        })?;
        std::io::copy(&mut entry, &mut file).map_err(|e| {
            DumpError::extraction(format!("Failed to write {}: {e}", destination.display()))
        })?;
        debug!(path = %destination.display(), "Restored entry");
    }

    Ok(root.to_path_buf())
}
