use std::path::Path;
use std::sync::Arc;

use russh::keys::{HashAlg, PrivateKeyWithHashAlg};

use crate::error::SshError;
use crate::validation;

/// Load an unencrypted SSH private key from file.
///
/// The key variable carries no passphrase, so an encrypted key is reported
/// as such rather than prompted for.
pub fn load_key_file(path: &Path) -> Result<PrivateKeyWithHashAlg, SshError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SshError::KeyFile(format!("Cannot read key file {}: {}", path.display(), e))
    })?;

    validation::validate_private_key(&content)
        .map_err(|e| SshError::KeyFile(format!("{}: {}", path.display(), e.message)))?;

    let key = russh::keys::load_secret_key(path, None).map_err(|e| {
        let msg = e.to_string();
        let normalized = msg.to_lowercase();
        if normalized.contains("encrypted") || normalized.contains("passphrase") {
            SshError::KeyFile(format!(
                "Key {} is passphrase-protected; supply an unencrypted key",
                path.display()
            ))
        } else {
            SshError::KeyFile(format!("Failed to load key {}: {}", path.display(), e))
        }
    })?;

    // Only use SHA-512 hash algorithm for RSA keys
    let hash_alg = if key.algorithm().is_rsa() {
        Some(HashAlg::Sha512)
    } else {
        None
    };

    Ok(PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg))
}
