//! SFTP session for single-file transfers

use std::path::Path;

use russh::Disconnect;
use russh::client::Handle;
use russh_sftp::client::SftpSession as RusshSftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::fs::OpenOptions;
use tokio::io::{self, AsyncWriteExt};

use crate::error::SftpError;
use crate::ssh::ClientHandler;

/// An open SFTP session plus the SSH connection carrying it
pub struct SftpSession {
    sftp: RusshSftpSession,
    handle: Handle<ClientHandler>,
    peer: String,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    pub fn new(sftp: RusshSftpSession, handle: Handle<ClientHandler>, peer: String) -> Self {
        Self { sftp, handle, peer }
    }

    /// Download a file from remote to local
    pub async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64, SftpError> {
        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SftpError::LocalIo(format!(
                    "Failed to create local directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut remote = self.sftp.open(remote_path).await.map_err(|e| {
            SftpError::Transfer(format!("Failed to open remote file {}: {}", remote_path, e))
        })?;

        let mut local = {
            let mut options = OpenOptions::new();
            options.create(true).write(true).truncate(true);
            #[cfg(unix)]
            {
                options.mode(0o600);
            }
            options.open(local_path).await.map_err(|e| {
                SftpError::LocalIo(format!(
                    "Failed to write local file {}: {}",
                    local_path.display(),
                    e
                ))
            })?
        };

        let bytes = io::copy(&mut remote, &mut local).await.map_err(|e| {
            SftpError::Transfer(format!(
                "Failed to download {} to {}: {}",
                remote_path,
                local_path.display(),
                e
            ))
        })?;

        local.flush().await.map_err(|e| {
            SftpError::LocalIo(format!(
                "Failed to flush local file {}: {}",
                local_path.display(),
                e
            ))
        })?;

        Ok(bytes)
    }

    /// Upload a file from local to remote
    pub async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<u64, SftpError> {
        let mut local = tokio::fs::File::open(local_path).await.map_err(|e| {
            SftpError::LocalIo(format!(
                "Failed to read local file {}: {}",
                local_path.display(),
                e
            ))
        })?;

        let mut remote = self
            .sftp
            .open_with_flags(
                remote_path,
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
            )
            .await
            .map_err(|e| {
                SftpError::Transfer(format!("Failed to open remote file {}: {}", remote_path, e))
            })?;

        let bytes = io::copy(&mut local, &mut remote).await.map_err(|e| {
            SftpError::Transfer(format!(
                "Failed to upload {} to {}: {}",
                local_path.display(),
                remote_path,
                e
            ))
        })?;

        remote.shutdown().await.map_err(|e| {
            SftpError::Transfer(format!("Failed to close remote file {}: {}", remote_path, e))
        })?;

        Ok(bytes)
    }

    /// End the SFTP subsystem and disconnect.
    pub async fn close(self) -> Result<(), SftpError> {
        let closed = self.sftp.close().await.map_err(|e| {
            SftpError::ConnectionFailed(format!("Failed to close SFTP session: {}", e))
        });

        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "transfer complete", "en")
            .await
        {
            tracing::debug!("SSH disconnect from {} failed: {}", self.peer, e);
        }

        closed
    }
}
