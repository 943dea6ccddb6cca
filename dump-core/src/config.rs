//! Configuration types for restore deployment and remote transport.
//!
//! The insecure-transport flag is an explicit, per-call configuration rather
//! than a process-wide default: callers that need to reach a host with an
//! untrusted certificate opt in for that one manager instance only.

use serde::{Deserialize, Serialize};

/// Deployment mode for restored entries.
///
/// `Final` writes entries at their declared paths; `Temporary` appends a
/// `.tmp` suffix to every restored file so a new dump can be staged alongside
/// the live tree and promoted by the caller later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployMode {
    /// Write restored files at their final paths
    Final,
    /// Write restored files with a `.tmp` suffix for staged rollout
    Temporary,
}

impl DeployMode {
    /// Suffix appended to every restored file name in this mode.
    pub fn suffix(&self) -> &'static str {
        match self {
            DeployMode::Final => "",
            DeployMode::Temporary => ".tmp",
        }
    }
}

/// Transport settings for fetching remote archives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Skip TLS certificate verification (explicit opt-in, never a default)
    pub accept_invalid_certs: bool,
}

impl TransportConfig {
    /// Create a transport configuration with full certificate verification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport configuration that skips certificate verification.
    ///
    /// Intended for development hosts with self-signed certificates.
    pub fn insecure() -> Self {
        Self {
            accept_invalid_certs: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_suffixes() {
        assert_eq!(DeployMode::Final.suffix(), "");
        assert_eq!(DeployMode::Temporary.suffix(), ".tmp");
    }

    #[test]
    fn test_transport_defaults_to_secure() {
        assert!(!TransportConfig::new().accept_invalid_certs);
        assert!(TransportConfig::insecure().accept_invalid_certs);
    }
}
