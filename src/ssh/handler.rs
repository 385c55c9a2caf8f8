use std::future::Future;
use std::path::PathBuf;

use russh::client::Handler;
use russh::keys::{self, HashAlg, PublicKey};

use crate::error::SshError;
use crate::security_log;

/// Outcome of checking a server key against known_hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// Key matches a stored entry
    Known,
    /// No entry for this host
    Unknown,
    /// Entry exists but holds a different key (potential MITM!)
    Changed { line: usize },
}

/// Server key policy for unattended transfers.
///
/// With a known_hosts file the server key must already be listed; without
/// one every key is accepted and its fingerprint logged.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    host: String,
    port: u16,
    known_hosts: Option<PathBuf>,
}

impl ClientHandler {
    pub fn new(host: String, port: u16, known_hosts: Option<PathBuf>) -> Self {
        Self {
            host,
            port,
            known_hosts,
        }
    }

    /// Get the fingerprint of a public key
    pub fn fingerprint(key: &PublicKey) -> String {
        key.fingerprint(HashAlg::Sha256).to_string()
    }

    /// Check `key` against the configured known_hosts file.
    pub fn check_known_hosts(&self, key: &PublicKey) -> Result<HostKeyStatus, SshError> {
        let Some(path) = &self.known_hosts else {
            return Ok(HostKeyStatus::Unknown);
        };

        match keys::known_hosts::check_known_hosts_path(&self.host, self.port, key, path) {
            Ok(true) => Ok(HostKeyStatus::Known),
            Ok(false) => Ok(HostKeyStatus::Unknown),
            Err(keys::Error::KeyChanged { line }) => Ok(HostKeyStatus::Changed { line }),
            Err(e) => Err(SshError::HostKeyVerification(format!(
                "Failed to read known_hosts {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn verify(&self, key: &PublicKey) -> Result<bool, SshError> {
        let fingerprint = Self::fingerprint(key);

        if self.known_hosts.is_none() {
            security_log::log_host_key_unverified(&self.host, self.port, &fingerprint);
            return Ok(true);
        }

        match self.check_known_hosts(key)? {
            HostKeyStatus::Known => {
                security_log::log_host_key_verified(&self.host, self.port, &fingerprint);
                Ok(true)
            }
            HostKeyStatus::Unknown => {
                let reason = format!("no known_hosts entry for key {}", fingerprint);
                security_log::log_host_key_rejected(&self.host, self.port, &reason);
                Err(SshError::HostKeyVerification(reason))
            }
            HostKeyStatus::Changed { line } => {
                let reason = format!(
                    "HOST KEY CHANGED: {} does not match known_hosts line {}",
                    fingerprint, line
                );
                security_log::log_host_key_rejected(&self.host, self.port, &reason);
                Err(SshError::HostKeyVerification(reason))
            }
        }
    }
}

impl Handler for ClientHandler {
    type Error = SshError;

    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let result = self.verify(server_public_key);
        async move { result }
    }
}
