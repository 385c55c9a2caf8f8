//! SFTP transfer client
//!
//! Provides single-file upload and download over one key-authenticated session.

pub mod client;
pub mod session;
pub mod transfer;

pub use client::SftpClient;
pub use session::SftpSession;
pub use transfer::{TransferReport, run_download, run_upload, timestamped_name};
