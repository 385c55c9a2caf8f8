//! One-shot transfer jobs.
//!
//! Each job owns the whole lifetime of its connection: the private key is
//! written to disk, a session is opened, one file moves, the session is
//! closed, and the key file is removed on every way out.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{SftpCredentials, SftpSettings};
use crate::error::SftpError;
use crate::ssh::{TransientKeyFile, auth};

use super::client::SftpClient;
use super::session::SftpSession;

/// What a finished transfer moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub remote: String,
    pub local: PathBuf,
    pub bytes: u64,
    /// Size of the local file after the transfer.
    pub local_size: u64,
    /// Extra remote names written alongside `remote` (uploads only).
    pub copies: Vec<String>,
}

/// Download `remote` into `local`.
///
/// Success means the local file exists afterwards; its content is not
/// compared against the remote side.
pub async fn run_download(
    credentials: &SftpCredentials,
    settings: &SftpSettings,
    remote: &str,
    local: &Path,
) -> Result<TransferReport, SftpError> {
    let connection = Connection::open(credentials, settings).await?;

    tracing::info!("Downloading {} to {}", remote, local.display());
    let result = connection.session.download(remote, local).await;
    connection.close().await;
    let bytes = result?;

    let local_size = verify_local(local, SftpError::MissingAfterTransfer)?;
    tracing::info!(
        "Download successful: {} ({} bytes)",
        local.display(),
        local_size
    );

    Ok(TransferReport {
        remote: remote.to_string(),
        local: local.to_path_buf(),
        bytes,
        local_size,
        copies: Vec::new(),
    })
}

/// Upload `local` to `remote`, optionally with a timestamp-suffixed copy.
pub async fn run_upload(
    credentials: &SftpCredentials,
    settings: &SftpSettings,
    local: &Path,
    remote: &str,
    timestamped_copy: bool,
) -> Result<TransferReport, SftpError> {
    let local_size = verify_local(local, SftpError::LocalMissing)?;
    let copies: Vec<String> = if timestamped_copy {
        vec![timestamped_name(remote, Local::now())]
    } else {
        Vec::new()
    };

    let connection = Connection::open(credentials, settings).await?;
    let result = upload_all(&connection.session, local, remote, &copies).await;
    connection.close().await;
    let bytes = result?;

    tracing::info!("Upload successful: {} ({} bytes)", remote, bytes);

    Ok(TransferReport {
        remote: remote.to_string(),
        local: local.to_path_buf(),
        bytes,
        local_size,
        copies,
    })
}

async fn upload_all(
    session: &SftpSession,
    local: &Path,
    remote: &str,
    copies: &[String],
) -> Result<u64, SftpError> {
    tracing::info!("Uploading {} to {}", local.display(), remote);
    let bytes = session.upload(local, remote).await?;

    for copy in copies {
        tracing::info!("Uploading {} to {}", local.display(), copy);
        session.upload(local, copy).await?;
    }

    Ok(bytes)
}

/// A session together with the key file it was authenticated from.
///
/// Field order matters: the session drops before the key file.
struct Connection {
    session: SftpSession,
    key_file: TransientKeyFile,
}

impl Connection {
    async fn open(
        credentials: &SftpCredentials,
        settings: &SftpSettings,
    ) -> Result<Self, SftpError> {
        let key_file = TransientKeyFile::materialize(&settings.key_file, &credentials.private_key)?;
        let key = auth::load_key_file(key_file.path())?;
        let session = SftpClient::new(settings).connect(credentials, key).await?;

        Ok(Self { session, key_file })
    }

    async fn close(self) {
        if let Err(e) = self.session.close().await {
            // The transfer outcome matters more than a clean goodbye.
            tracing::warn!("{}", e);
        }
        if let Err(e) = self.key_file.remove() {
            tracing::warn!("{}", e);
        }
    }
}

/// Size of the local file at `path`; `missing` builds the error when it is absent.
fn verify_local(path: &Path, missing: fn(PathBuf) -> SftpError) -> Result<u64, SftpError> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            if meta.len() == 0 {
                tracing::warn!("{} is empty", path.display());
            }
            Ok(meta.len())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(missing(path.to_path_buf()))
        }
        Err(e) => Err(SftpError::LocalIo(format!(
            "Failed to stat {}: {}",
            path.display(),
            e
        ))),
    }
}

/// `person.csv` -> `person_20261016T093000.csv`
pub fn timestamped_name(remote: &str, at: DateTime<Local>) -> String {
    let stamp = at.format("%Y%m%dT%H%M%S");
    let (dir, file) = match remote.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, remote),
    };

    let name = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, stamp, ext),
        _ => format!("{}_{}", file, stamp),
    };

    match dir {
        Some(dir) => format!("{}/{}", dir, name),
        None => name,
    }
}
