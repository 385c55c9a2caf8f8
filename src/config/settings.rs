use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::paths;

/// Job settings, loaded from an optional TOML file.
///
/// Every field has a default matching the layout the import tooling expects,
/// so running without a settings file is the normal case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub sftp: SftpSettings,
    #[serde(default)]
    pub person: TransferPaths,
    #[serde(default = "TransferPaths::reference")]
    pub reference: TransferPaths,
    #[serde(default)]
    pub expenses: ExpensesPaths,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub transform: TransformSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sftp: SftpSettings::default(),
            person: TransferPaths::default(),
            reference: TransferPaths::reference(),
            expenses: ExpensesPaths::default(),
            export: ExportSettings::default(),
            transform: TransformSettings::default(),
        }
    }
}

impl Settings {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> u64 {
    30
}

fn default_keepalive() -> u64 {
    60
}

fn default_key_file() -> PathBuf {
    PathBuf::from(paths::KEY_FILE)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SftpSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bound on connect, handshake and authentication. 0 waits
    /// indefinitely, as a plain blocking connect would.
    #[serde(default = "default_timeout")]
    pub connection_timeout_secs: u64,
    /// 0 disables keepalives.
    #[serde(default = "default_keepalive")]
    pub keepalive_interval_secs: u64,
    /// Where the private key is materialized while a session is open.
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
    /// When set, the server key must be listed in this file.
    #[serde(default)]
    pub known_hosts: Option<PathBuf>,
}

impl Default for SftpSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            connection_timeout_secs: default_timeout(),
            keepalive_interval_secs: default_keepalive(),
            key_file: default_key_file(),
            known_hosts: None,
        }
    }
}

impl SftpSettings {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn keepalive_interval(&self) -> Option<Duration> {
        match self.keepalive_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// A remote file name and the local staging path it maps to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferPaths {
    pub remote: String,
    pub local: PathBuf,
}

impl Default for TransferPaths {
    fn default() -> Self {
        Self {
            remote: paths::PERSON_REMOTE.to_string(),
            local: paths::data_dir().join(paths::PERSON_REMOTE),
        }
    }
}

impl TransferPaths {
    fn reference() -> Self {
        Self {
            remote: paths::REFERENCE_REMOTE.to_string(),
            local: paths::data_dir().join(paths::REFERENCE_REMOTE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpensesPaths {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Default for ExpensesPaths {
    fn default() -> Self {
        Self {
            source: PathBuf::from("..").join(paths::EXPENSES_FILE),
            destination: PathBuf::from("data").join(paths::IMPORT_FILE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExportSettings {
    /// Also upload a `name_YYYYMMDDTHHMMSS.ext` copy next to the main file.
    #[serde(default)]
    pub timestamped_copy: bool,
}

fn default_org_code() -> String {
    paths::DEFAULT_ORG_CODE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformSettings {
    /// Written into `Person_Org_Code` when the export leaves it blank.
    #[serde(default = "default_org_code")]
    pub default_org_code: String,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            default_org_code: default_org_code(),
        }
    }
}
