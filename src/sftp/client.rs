//! SFTP client for establishing connections

use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Config};
use russh::keys::PrivateKeyWithHashAlg;
use russh_sftp::client::SftpSession as RusshSftpSession;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::{SftpCredentials, SftpSettings};
use crate::error::{SftpError, SshError};
use crate::security_log;
use crate::ssh::ClientHandler;

use super::session::SftpSession;

/// SFTP client for establishing connections
pub struct SftpClient {
    config: Arc<Config>,
    port: u16,
    connection_timeout: Duration,
    known_hosts: Option<std::path::PathBuf>,
}

impl SftpClient {
    pub fn new(settings: &SftpSettings) -> Self {
        let config = Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            keepalive_interval: settings.keepalive_interval(),
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            config: Arc::new(config),
            port: settings.port,
            connection_timeout: settings.connection_timeout(),
            known_hosts: settings.known_hosts.clone(),
        }
    }

    /// Connect, authenticate with `key` and open the SFTP subsystem.
    ///
    /// A zero connection timeout waits indefinitely.
    pub async fn connect(
        &self,
        credentials: &SftpCredentials,
        key: PrivateKeyWithHashAlg,
    ) -> Result<SftpSession, SftpError> {
        let port = credentials.port_or(self.port);
        let setup = self.establish_sftp_session(credentials, port, key);

        if self.connection_timeout.is_zero() {
            return setup.await;
        }

        match timeout(self.connection_timeout, setup).await {
            Ok(result) => result,
            Err(_) => Err(SshError::Timeout(format!("{}:{}", credentials.host, port)).into()),
        }
    }

    async fn establish_sftp_session(
        &self,
        credentials: &SftpCredentials,
        port: u16,
        key: PrivateKeyWithHashAlg,
    ) -> Result<SftpSession, SftpError> {
        let host = credentials.host.as_str();
        let addr = (host, port);

        tracing::info!("Connecting to SFTP server {}:{}", host, port);
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| SshError::ConnectionFailed {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            })?;

        let handler = ClientHandler::new(host.to_string(), port, self.known_hosts.clone());

        let mut handle = client::connect_stream(self.config.clone(), stream, handler)
            .await
            .map_err(|e| SshError::ConnectionFailed {
                host: host.to_string(),
                port,
                reason: format!("SSH handshake failed: {}", e),
            })?;

        self.authenticate(&mut handle, &credentials.username, key, host, port)
            .await?;

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| SftpError::ConnectionFailed(format!("Failed to open channel: {}", e)))?;

        channel
            .request_subsystem(false, "sftp")
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to request SFTP subsystem: {}", e))
            })?;

        let sftp = RusshSftpSession::new(channel.into_stream())
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to initialize SFTP session: {}", e))
            })?;

        security_log::log_sftp_connect(host, port, &credentials.username);

        Ok(SftpSession::new(sftp, handle, format!("{}:{}", host, port)))
    }

    async fn authenticate(
        &self,
        handle: &mut client::Handle<ClientHandler>,
        username: &str,
        key: PrivateKeyWithHashAlg,
        hostname: &str,
        port: u16,
    ) -> Result<(), SshError> {
        let method_name = "publickey";
        security_log::log_auth_attempt(hostname, port, username, method_name);

        let auth_result = match handle.authenticate_publickey(username, key).await {
            Ok(result) => result,
            Err(e) => {
                let reason = format!("Public key auth failed: {}", e);
                security_log::log_auth_failure(hostname, port, username, method_name, &reason);
                return Err(SshError::AuthenticationFailed(reason));
            }
        };

        if !auth_result.success() {
            let reason = "Authentication rejected by server";
            security_log::log_auth_failure(hostname, port, username, method_name, reason);
            return Err(SshError::AuthenticationFailed(reason.to_string()));
        }

        security_log::log_auth_success(hostname, port, username, method_name);
        Ok(())
    }
}
