//! Relocates the expenses export into the import staging directory.

use std::path::{Path, PathBuf};

use crate::config::ExpensesPaths;
use crate::error::MoveError;
use crate::fs_utils;

/// Source and destination of one move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl MoveJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Resolve the configured paths against `base` (usually the working directory).
    pub fn from_settings(paths: &ExpensesPaths, base: &Path) -> Self {
        Self::new(base.join(&paths.source), base.join(&paths.destination))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { bytes: u64 },
    /// The source was absent; nothing was touched.
    NothingToMove,
}

/// Move `job.source` to `job.destination`, creating the destination's
/// directory. A missing source is not an error.
pub fn move_file(job: &MoveJob) -> Result<MoveOutcome, MoveError> {
    if !job.source.exists() {
        tracing::info!("{} does not exist, nothing to move", job.source.display());
        return Ok(MoveOutcome::NothingToMove);
    }

    if let Some(parent) = job.destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MoveError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let bytes = fs_utils::move_file(&job.source, &job.destination).map_err(|e| MoveError::Move {
        from: job.source.clone(),
        to: job.destination.clone(),
        source: e,
    })?;

    tracing::info!(
        "Moved {} to {} ({} bytes)",
        job.source.display(),
        job.destination.display(),
        bytes
    );
    Ok(MoveOutcome::Moved { bytes })
}
