use std::path::PathBuf;

/// Relative path the private key is written to while a session is open
pub const KEY_FILE: &str = "sftp_key.pem";

/// Staging directory shared by the transfer and transform steps
pub const DATA_DIR: &str = "unanet_imu/data";

pub const PERSON_REMOTE: &str = "person.csv";
pub const REFERENCE_REMOTE: &str = "people.csv";
pub const EXPENSES_FILE: &str = "expenses.csv";
pub const IMPORT_FILE: &str = "import.csv";

pub const DEFAULT_ORG_CODE: &str = "CORP";

/// Environment variable naming a settings file
pub const CONFIG_ENV: &str = "IMU_SYNC_CONFIG";

/// Get the staging directory path
pub fn data_dir() -> PathBuf {
    PathBuf::from(DATA_DIR)
}

/// Settings file path: explicit flag first, then `IMU_SYNC_CONFIG`.
pub fn config_file(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}
