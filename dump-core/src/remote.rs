/*!
HTTP-backed restore manager.

Fetches an archive stream from a URI and extracts entries directly into the
storage root. One call to [`RemoteRestoreManager::from_uri`] performs one
fetch; the returned [`RemoteRestore`] can then be deployed either finally or
with the temporary suffix. Restoring again requires a fresh fetch.

The response body is never buffered whole: it is bridged into the streaming
extractor chunk by chunk, so archives larger than memory restore fine.
*/

use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::{info, warn};

use crate::config::{DeployMode, TransportConfig};
use crate::extract::extract_archive;
use crate::{DumpError, Result};

/// Manager for restoring a storage root from remotely served archives.
#[derive(Debug, Clone)]
pub struct RemoteRestoreManager {
    root: PathBuf,
    transport: TransportConfig,
}

impl RemoteRestoreManager {
    /// Create a manager with full certificate verification.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_transport(root, TransportConfig::new())
    }

    /// Create a manager with explicit transport settings.
    pub fn with_transport<P: Into<PathBuf>>(root: P, transport: TransportConfig) -> Self {
        Self {
            root: root.into(),
            transport,
        }
    }

    /// The storage root this manager restores into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetch the archive at `uri`.
    ///
    /// Issues one GET declaring archive content via the `Accept` header. A
    /// connection failure or non-success status is a
    /// [`DumpError::Transport`]; the body is not consumed until the returned
    /// restore is deployed.
    pub async fn from_uri(&self, uri: &str) -> Result<RemoteRestore> {
        let mut builder = reqwest::Client::builder();
        if self.transport.accept_invalid_certs {
            warn!(%uri, "Certificate verification disabled for this fetch");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| DumpError::transport(format!("Failed to build HTTP client: {e}")))?;

        let response = client
            .get(uri)
            .header(reqwest::header::ACCEPT, "application/gzip")
            .send()
            .await
            .map_err(|e| DumpError::transport(format!("Failed to fetch {uri}: {e}")))?
            .error_for_status()
            .map_err(|e| DumpError::transport(format!("Remote archive fetch failed: {e}")))?;

        info!(%uri, "Remote archive stream opened");
        Ok(RemoteRestore {
            root: self.root.clone(),
            response,
        })
    }
}

/// One fetched archive stream, ready to deploy exactly once.
///
/// `deploy` writes entries at their final paths; `deploy_temporary` appends
/// `.tmp` to every restored file so the caller can validate before promoting.
/// Both consume the fetch.
pub struct RemoteRestore {
    root: PathBuf,
    response: reqwest::Response,
}

impl RemoteRestore {
    /// Extract the fetched archive into the root at final paths.
    pub async fn deploy(self) -> Result<PathBuf> {
        self.extract(DeployMode::Final).await
    }

    /// Extract the fetched archive into the root with `.tmp`-suffixed files.
    pub async fn deploy_temporary(self) -> Result<PathBuf> {
        self.extract(DeployMode::Temporary).await
    }

    async fn extract(self, mode: DeployMode) -> Result<PathBuf> {
        let stream = self.response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(stream);
        // Bridge the async body into the blocking codec; the bridge suspends
        // the blocking thread while the next chunk arrives.
        let bridge = SyncIoBridge::new(reader);

        let root = self.root;
        let root = tokio::task::spawn_blocking(move || extract_archive(bridge, &root, mode))
            .await
            .map_err(|e| DumpError::extraction(format!("Extraction task failed: {e}")))??;

        info!(root = %root.display(), ?mode, "Remote restore complete");
        Ok(root)
    }
}
