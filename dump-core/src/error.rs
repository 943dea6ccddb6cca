/*!
Error types for the dump core engine.
*/

use thiserror::Error;

/// Result type used throughout the dump core.
pub type Result<T> = std::result::Result<T, DumpError>;

/// Errors that can occur during dump and restore operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// I/O errors during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage root missing or unreadable during enumeration
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// Sink write failure or codec failure while building an archive
    #[error("Archive build error: {0}")]
    ArchiveBuild(String),

    /// Native compression tool probe or subprocess failure
    #[error("Tool invocation error: {0}")]
    ToolInvocation(String),

    /// Network/HTTP failure while reaching a remote archive
    #[error("Transport error: {0}")]
    Transport(String),

    /// Per-entry write failure during restore
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Archive entry whose path resolves outside the storage root
    #[error("Path safety violation: {0}")]
    PathSafety(String),

    /// Configuration or setup failures (logging init, client construction)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DumpError {
    /// Create a new enumeration error
    pub fn enumeration<S: Into<String>>(msg: S) -> Self {
        Self::Enumeration(msg.into())
    }

    /// Create a new archive build error
    pub fn archive_build<S: Into<String>>(msg: S) -> Self {
        Self::ArchiveBuild(msg.into())
    }

    /// Create a new tool invocation error
    pub fn tool_invocation<S: Into<String>>(msg: S) -> Self {
        Self::ToolInvocation(msg.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new path safety error
    pub fn path_safety<S: Into<String>>(msg: S) -> Self {
        Self::PathSafety(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
