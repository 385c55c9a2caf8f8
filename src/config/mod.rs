pub mod credentials;
pub mod paths;
pub mod settings;

pub use credentials::SftpCredentials;
pub use settings::{ExpensesPaths, Settings, SftpSettings, TransferPaths};
