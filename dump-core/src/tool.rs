/*!
Native compression tool fast path.

When the host carries the native `tar` and `gzip` binaries, a dump can be
produced by a subprocess pipeline instead of the in-process codec: `tar`
walks the whole storage root and `gzip -9` compresses it into a private
temporary file, which is then streamed into the requested sink.

The resulting archive covers the whole root (tool semantics) rather than
directory-by-directory, but remains extractable by [`crate::extract`], which
is the interchangeability contract between the two strategies.
*/

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::archive::ArchiveStrategy;
use crate::{DumpError, Result};

/// Subprocess-backed archive builder.
#[derive(Debug, Clone, Default)]
pub struct NativeToolArchiver {
    excludes: Vec<String>,
}

impl NativeToolArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a root-level name from the archive.
    ///
    /// The tool path walks the whole root, so a dump file living inside the
    /// root would otherwise archive itself.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excludes.push(name.into());
        self
    }

    /// Check whether the native pipeline is available on this host.
    ///
    /// The probe runs per call rather than being cached: host capabilities
    /// could change between invocations.
    pub fn probe() -> bool {
        tool_on_path("tar") && tool_on_path("gzip")
    }
}

fn tool_on_path(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

impl ArchiveStrategy for NativeToolArchiver {
    fn write_archive(&self, root: &Path, sink: &mut dyn Write) -> Result<()> {
        if !root.is_dir() {
            return Err(DumpError::enumeration(format!(
                "Storage root {} does not exist",
                root.display()
            )));
        }

        let staging = tempfile::NamedTempFile::new()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to create staging file: {e}")))?;
        let staging_out = staging
            .reopen()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to open staging file: {e}")))?;

        debug!(root = %root.display(), staging = %staging.path().display(), "Running native tar|gzip pipeline");

        let mut tar_command = Command::new("tar");
        for name in &self.excludes {
            tar_command.arg("--exclude").arg(format!("./{name}"));
        }
        let mut tar_child = tar_command
            .args(["-cf", "-", "."])
            .current_dir(root)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to spawn tar: {e}")))?;

        let tar_stdout = tar_child
            .stdout
            .take()
            .ok_or_else(|| DumpError::tool_invocation("tar produced no stdout pipe"))?;

        let mut gzip_child = Command::new("gzip")
            .arg("-9")
            .stdin(Stdio::from(tar_stdout))
            .stdout(Stdio::from(staging_out))
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to spawn gzip: {e}")))?;

        let tar_status = tar_child
            .wait()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to wait for tar: {e}")))?;
        let gzip_status = gzip_child
            .wait()
            .map_err(|e| DumpError::tool_invocation(format!("Failed to wait for gzip: {e}")))?;

        if !tar_status.success() || !gzip_status.success() {
            warn!(?tar_status, ?gzip_status, "Native compression pipeline failed");
            return Err(DumpError::tool_invocation(format!(
                "Native pipeline exited with tar={tar_status}, gzip={gzip_status}"
            )));
        }

        // The sink sees bytes only after the pipeline has succeeded.
        let mut staged = std::fs::File::open(staging.path())
            .map_err(|e| DumpError::tool_invocation(format!("Failed to reopen staging file: {e}")))?;
        std::io::copy(&mut staged, sink)
            .map_err(|e| DumpError::archive_build(format!("Failed to stream archive to sink: {e}")))?;
        sink.flush()
            .map_err(|e| DumpError::archive_build(format!("Failed to flush archive sink: {e}")))?;

        // staging is deleted when the NamedTempFile drops
        Ok(())
    }
}
