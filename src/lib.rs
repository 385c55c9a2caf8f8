//! IMU sync library
//!
//! Moves the person export between the SFTP drop and the local staging
//! directory, relocates the expenses export, and reshapes the person export
//! for the import. Exposed for the binary and for integration tests.

// Public modules for integration testing
pub mod config;
pub mod error;
pub mod mover;
pub mod transform;
pub mod validation;

// Public modules for the binary
pub mod logging;
pub mod sftp;
pub mod ssh;

// Internal modules
pub(crate) mod fs_utils;
pub(crate) mod security_log;
