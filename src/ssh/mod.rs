//! SSH plumbing for the transfer client
//!
//! Key material handling, key loading and the server key policy.

pub mod auth;
pub mod handler;
pub mod key_file;

pub use handler::ClientHandler;
pub use key_file::TransientKeyFile;
