/*!
File-backed dump manager.

Produces and consumes a dump as a file at the canonical path inside the
storage root, and owns deletion of that file. The canonical path is a pure
function of the root: rebuilding a dump overwrites the previous one, there is
no versioning.

# Example
```rust,no_run
use dump_core::FileDumpManager;

# async fn demo() -> dump_core::Result<()> {
let manager = FileDumpManager::new("/data/storage");

// Build /data/storage/.tar.gz from the root's sub-directories
let dump = manager.to_file().await?;

// Later, restore it into the root
manager.from_file(None).await?;

// And drop it (missing file is not an error)
manager.remove_file().await?;
# Ok(())
# }
```
*/

use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::archive::{ArchiveStrategy, LibraryArchiver};
use crate::config::DeployMode;
use crate::extract::extract_archive;
use crate::tool::NativeToolArchiver;
use crate::{DumpError, Result};

/// Canonical dump file name, a hidden child of the storage root.
pub const DUMP_FILE_NAME: &str = ".tar.gz";

/// Build an archive of `root` into `sink`, preferring the native tool.
///
/// The probe runs once per call. A tool invocation failure falls back to the
/// library codec transparently; any other failure (including the sink
/// rejecting writes) propagates, since the sink may already be dirty.
fn build_archive(root: &Path, sink: &mut dyn Write) -> Result<()> {
    if NativeToolArchiver::probe() {
        let native = NativeToolArchiver::new().exclude(DUMP_FILE_NAME);
        match native.write_archive(root, sink) {
            Ok(()) => return Ok(()),
            Err(DumpError::ToolInvocation(reason)) => {
                warn!(%reason, "Native tool failed, falling back to library codec");
            }
            Err(other) => return Err(other),
        }
    }
    LibraryArchiver::new().write_archive(root, sink)
}

/// Manager for file-backed dumps of one storage root.
#[derive(Debug, Clone)]
pub struct FileDumpManager {
    root: PathBuf,
}

impl FileDumpManager {
    /// Create a manager for the given storage root.
    ///
    /// The root itself is owned by the caller; the manager only touches its
    /// contents and the canonical dump file.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The storage root this manager operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical dump path for this root.
    pub fn dump_path(&self) -> PathBuf {
        self.root.join(DUMP_FILE_NAME)
    }

    /// Build a dump of the root's sub-directories at the canonical path.
    ///
    /// Overwrites any previous dump. On failure a truncated file may remain;
    /// [`FileDumpManager::remove_file`] cleans it up.
    pub async fn to_file(&self) -> Result<PathBuf> {
        let root = self.root.clone();
        let target = self.dump_path();

        let target = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let mut file = std::fs::File::create(&target).map_err(|e| {
                DumpError::archive_build(format!(
                    "Failed to create dump file {}: {e}",
                    target.display()
                ))
            })?;
            build_archive(&root, &mut file)?;
            Ok(target)
        })
        .await
        .map_err(|e| DumpError::archive_build(format!("Archive build task failed: {e}")))??;

        info!(path = %target.display(), "Dump written");
        Ok(target)
    }

    /// Build a dump of the root's sub-directories into a caller-supplied sink.
    ///
    /// The sink is returned once the archive is finalized; it must not be
    /// consumed before then.
    pub async fn to_writer<W>(&self, sink: W) -> Result<W>
    where
        W: Write + Send + 'static,
    {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || -> Result<W> {
            let mut sink = sink;
            build_archive(&root, &mut sink)?;
            Ok(sink)
        })
        .await
        .map_err(|e| DumpError::archive_build(format!("Archive build task failed: {e}")))?
    }

    /// Restore a dump file into the storage root.
    ///
    /// Reads the given path, or the canonical path when `path` is `None`,
    /// and extracts every entry with final deployment. Completion of the
    /// returned future is the completion contract: when it resolves with the
    /// root path, extraction has finished.
    pub async fn from_file(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let source = path.unwrap_or_else(|| self.dump_path());
        let root = self.root.clone();

        let root = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let file = std::fs::File::open(&source).map_err(|e| {
                DumpError::extraction(format!(
                    "Failed to open dump file {}: {e}",
                    source.display()
                ))
            })?;
            extract_archive(BufReader::new(file), &root, DeployMode::Final)
        })
        .await
        .map_err(|e| DumpError::extraction(format!("Extraction task failed: {e}")))??;

        info!(root = %root.display(), "Dump restored");
        Ok(root)
    }

    /// Delete the canonical dump file.
    ///
    /// Idempotent: a missing file is treated as success. Any other I/O
    /// failure propagates.
    pub async fn remove_file(&self) -> Result<()> {
        let path = self.dump_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Dump removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Clear the storage root's contents, including any dump file.
    ///
    /// Removes every child of the root (typically after a staged restore has
    /// been validated and promoted) but never the root itself, which is
    /// owned by the caller.
    pub async fn empty(&self) -> Result<()> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            DumpError::enumeration(format!(
                "Failed to read storage root {}: {e}",
                self.root.display()
            ))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
        }

        info!(root = %self.root.display(), "Storage root emptied");
        Ok(())
    }
}
