/*!
# Dump Core Engine

Streaming dump and restore of storage directory trees.

A dump is a single gzip-compressed tar archive of a storage root's immediate
sub-directories, one top-level entry per sub-directory. The engine builds
dumps into a file or any byte sink, and restores them from a local file or a
remote HTTP-served stream, reconstructing the directory tree on disk.

## Architecture

- Archive building is a strategy behind [`ArchiveStrategy`]: the in-process
  [`LibraryArchiver`] and the subprocess [`NativeToolArchiver`] fast path,
  selected by a host capability probe at call time.
- Restoration shares one streaming extractor between the file-backed and
  HTTP-backed paths; it is path-safe (archive entries can never write outside
  the storage root) and supports final or temporary-suffixed deployment for
  staged rollout.
- Failures surface as the typed [`DumpError`]; restores are best-effort, not
  transactional.

## Usage

```rust,no_run
use dump_core::{FileDumpManager, RemoteRestoreManager, TransportConfig};

# async fn demo() -> dump_core::Result<()> {
// Dump /data/storage into /data/storage/.tar.gz
let manager = FileDumpManager::new("/data/storage");
let dump_path = manager.to_file().await?;

// Restore it elsewhere
FileDumpManager::new("/data/restore")
    .from_file(Some(dump_path))
    .await?;

// Stage a remote archive alongside the live tree for later promotion
let remote = RemoteRestoreManager::with_transport("/data/storage", TransportConfig::new());
remote.from_uri("https://example.com/dump").await?.deploy_temporary().await?;
# Ok(())
# }
```
*/

pub mod archive;
pub mod config;
pub mod dump;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod observability;
pub mod remote;
pub mod tool;

pub use archive::{ArchiveStrategy, LibraryArchiver};
pub use config::{DeployMode, TransportConfig};
pub use dump::{FileDumpManager, DUMP_FILE_NAME};
pub use enumerate::list_subdirectories;
pub use error::{DumpError, Result};
pub use extract::extract_archive;
pub use observability::init_logging;
pub use remote::{RemoteRestore, RemoteRestoreManager};
pub use tool::NativeToolArchiver;
