use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required SFTP credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Invalid {field}: {message}")]
    InvalidCredential { field: &'static str, message: String },

    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// SSH-related errors
#[derive(Error, Debug)]
pub enum SshError {
    #[error("Connection failed to {host}:{port}: {reason}")]
    ConnectionFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Key file error: {0}")]
    KeyFile(String),

    #[error("Timeout connecting to {0}")]
    Timeout(String),

    #[error("Host key verification failed: {0}")]
    HostKeyVerification(String),

    #[error("russh error: {0}")]
    Russh(String),
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Russh(err.to_string())
    }
}

/// SFTP-related errors
#[derive(Error, Debug)]
pub enum SftpError {
    #[error(transparent)]
    Ssh(#[from] SshError),

    #[error("SFTP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Local I/O error: {0}")]
    LocalIo(String),

    #[error("Transfer reported success but {0} is missing")]
    MissingAfterTransfer(PathBuf),

    #[error("Local file {0} does not exist")]
    LocalMissing(PathBuf),
}

/// Local file move errors
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// CSV transformation errors
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },

    #[error("Failed to encode rows for {path}: {source}")]
    Encode { path: PathBuf, source: csv::Error },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: line {line} has more fields than the header")]
    MalformedRow { path: PathBuf, line: u64 },

    #[error("{path} has no column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: columns '{first}' and '{second}' both map to '{target}'")]
    DuplicateColumn {
        path: PathBuf,
        first: String,
        second: String,
        target: String,
    },
}

/// Top-level error for a single job run
#[derive(Error, Debug)]
pub enum ImuError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sftp(#[from] SftpError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ImuError {
    /// Process exit status for this error.
    ///
    /// Every failure class exits with 1; callers must not rely on
    /// distinguishing them by status.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<SshError> for ImuError {
    fn from(err: SshError) -> Self {
        ImuError::Sftp(SftpError::Ssh(err))
    }
}
