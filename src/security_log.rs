//! Security event logging.
//!
//! Structured events for authentication, SFTP session setup, host key
//! decisions and the lifetime of the transient private key file.
//!
//! All events are logged with `target: "security"` so they can be filtered:
//! ```bash
//! RUST_LOG=security=info imu-sync download
//! ```

use std::path::Path;

use tracing::{info, warn};

/// Log an SSH authentication attempt.
///
/// Called before attempting to authenticate with the remote host.
pub fn log_auth_attempt(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_attempt",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication attempt"
    );
}

/// Log a successful SSH authentication.
pub fn log_auth_success(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_success",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication succeeded"
    );
}

/// Log a failed SSH authentication attempt.
pub fn log_auth_failure(host: &str, port: u16, username: &str, method: &str, reason: &str) {
    warn!(
        target: "security",
        event = "auth_failure",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        reason = %reason,
        "SSH authentication failed"
    );
}

/// Log an SFTP connection establishment.
pub fn log_sftp_connect(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "sftp_connect",
        host = %host,
        port = port,
        username = %username,
        "SFTP connection established"
    );
}

/// Log a server key accepted without a known_hosts entry to check against.
pub fn log_host_key_unverified(host: &str, port: u16, fingerprint: &str) {
    warn!(
        target: "security",
        event = "host_key_unverified",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        "Accepting server key without known_hosts verification"
    );
}

/// Log a server key that matched the configured known_hosts file.
pub fn log_host_key_verified(host: &str, port: u16, fingerprint: &str) {
    info!(
        target: "security",
        event = "host_key_verified",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        "Server key matched known_hosts"
    );
}

/// Log a server key rejected by known_hosts verification.
pub fn log_host_key_rejected(host: &str, port: u16, reason: &str) {
    warn!(
        target: "security",
        event = "host_key_rejected",
        host = %host,
        port = port,
        reason = %reason,
        "Server key rejected"
    );
}

/// Log the private key being written to disk.
pub fn log_key_file_created(path: &Path) {
    info!(
        target: "security",
        event = "key_file_created",
        path = %path.display(),
        "Private key materialized with owner-only permissions"
    );
}

/// Log removal of the private key file.
pub fn log_key_file_removed(path: &Path) {
    info!(
        target: "security",
        event = "key_file_removed",
        path = %path.display(),
        "Private key file removed"
    );
}

/// Log a failure to remove the private key file. The key is left on disk.
pub fn log_key_file_remove_failed(path: &Path, reason: &str) {
    warn!(
        target: "security",
        event = "key_file_remove_failed",
        path = %path.display(),
        reason = %reason,
        "Private key file could not be removed"
    );
}
