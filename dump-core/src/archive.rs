/*!
Archive building strategies.

This module defines the archive-build abstraction and the library-backed
implementation. An archive is a gzip-compressed tar stream, always built at
maximum compression: dumps are written rarely and shipped over the network,
so size wins over CPU cost.

The alternative strategy, which shells out to the host's native tools, lives
in [`crate::tool`]. Both strategies must yield archives that the extractor in
[`crate::extract`] can restore to the same tree.
*/

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::enumerate::list_subdirectories;
use crate::{DumpError, Result};

/// Strategy for streaming a storage root into an archive sink.
///
/// Two implementations exist: [`LibraryArchiver`] (in-process codec) and
/// [`crate::tool::NativeToolArchiver`] (subprocess fast path). Callers probe
/// for the native tool per call and fall back to the library, so the two must
/// be semantically interchangeable even though the bytes differ.
pub trait ArchiveStrategy {
    /// Stream a compressed archive of `root` into `sink`.
    ///
    /// The archive is fully finalized before this returns; callers must not
    /// consume the sink earlier. On failure the sink may hold a truncated
    /// archive, which is the caller's to clean up.
    fn write_archive(&self, root: &Path, sink: &mut dyn Write) -> Result<()>;
}

/// In-process archive builder.
///
/// Each immediate sub-directory of the storage root becomes one top-level
/// archive entry named after the directory and containing its full recursive
/// contents. Entries are added in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct LibraryArchiver;

impl LibraryArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveStrategy for LibraryArchiver {
    fn write_archive(&self, root: &Path, sink: &mut dyn Write) -> Result<()> {
        let subdirs = list_subdirectories(root)?;
        debug!(root = %root.display(), entries = subdirs.len(), "Building archive with library codec");

        let encoder = GzEncoder::new(sink, Compression::best());
        let mut builder = tar::Builder::new(encoder);

        for name in &subdirs {
            builder.append_dir_all(name, root.join(name)).map_err(|e| {
                DumpError::archive_build(format!("Failed to add entry {name}: {e}"))
            })?;
        }

        // finish() writes the tar trailer, the encoder flush completes the
        // gzip stream; only then is the sink ready for consumption.
        let encoder = builder
            .into_inner()
            .map_err(|e| DumpError::archive_build(format!("Failed to finalize archive: {e}")))?;
        let sink = encoder
            .finish()
            .map_err(|e| DumpError::archive_build(format!("Failed to finish compression: {e}")))?;
        sink.flush()
            .map_err(|e| DumpError::archive_build(format!("Failed to flush archive sink: {e}")))?;

        Ok(())
    }
}
