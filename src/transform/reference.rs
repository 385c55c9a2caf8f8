//! Username backfill from the previously imported people file.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::TransformError;

use super::columns::Column;
use super::normalize::coerce_code;
use super::record::{PersonRecord, is_missing};

/// Username header in the reference file.
pub const REFERENCE_USERNAME: &str = "*username";
/// Join key header in the reference file.
pub const REFERENCE_PERSON_CODE: &str = "person_code";

/// `person_code -> usernames` from the reference file, in file order.
///
/// A code listed more than once keeps every entry, so a person row joined
/// against it comes out once per entry.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    entries: HashMap<String, Vec<Option<String>>>,
    duplicate_codes: usize,
}

impl ReferenceIndex {
    pub fn from_path(path: &Path) -> Result<Self, TransformError> {
        let file = std::fs::File::open(path).map_err(|e| TransformError::Read {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_reader(file, path)
    }

    /// Read the index from CSV; `path` labels errors.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, TransformError> {
        let read_err = |source: csv::Error| TransformError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(read_err)?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = String::from_utf8_lossy(h);
                let h: &str = if idx == 0 { h.trim_start_matches('\u{feff}') } else { &h };
                h.trim().to_string()
            })
            .collect();

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TransformError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let username_idx = position(REFERENCE_USERNAME)?;
        let code_idx = position(REFERENCE_PERSON_CODE)?;

        let mut entries: HashMap<String, Vec<Option<String>>> = HashMap::new();
        let mut row = csv::ByteRecord::new();
        while rdr.read_byte_record(&mut row).map_err(read_err)? {
            let cell = |idx: usize| {
                row.get(idx)
                    .map(|raw| String::from_utf8_lossy(raw).into_owned())
                    .filter(|value| !is_missing(value))
            };

            let Some(code) = cell(code_idx) else {
                continue;
            };
            entries
                .entry(coerce_code(&code))
                .or_default()
                .push(cell(username_idx));
        }

        let mut duplicate_codes = 0;
        for (code, usernames) in &entries {
            if usernames.len() > 1 {
                duplicate_codes += 1;
                tracing::warn!(
                    "person_code {} appears {} times in {}; matching rows will repeat",
                    code,
                    usernames.len(),
                    path.display()
                );
            }
        }

        tracing::debug!("Loaded {} reference codes from {}", entries.len(), path.display());
        Ok(Self {
            entries,
            duplicate_codes,
        })
    }

    /// Usernames recorded for `code`, compared after code coercion.
    pub fn lookup(&self, code: &str) -> Option<&[Option<String>]> {
        if is_missing(code) {
            return None;
        }
        self.entries.get(&coerce_code(code)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes with more than one reference entry.
    pub fn duplicate_codes(&self) -> usize {
        self.duplicate_codes
    }
}

/// `FIRST.LAST` in uppercase, missing parts as empty strings.
pub fn synthesize_username(first: Option<&str>, last: Option<&str>) -> String {
    format!("{}.{}", first.unwrap_or(""), last.unwrap_or("")).to_uppercase()
}

/// Where each backfilled username came from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillStats {
    pub reused: usize,
    pub synthesized: usize,
}

/// Left-join `record` against `index` and fill in `*Username`.
///
/// Always returns at least one record: the unmatched row itself, or one
/// copy per reference entry for its code. Any username the row already
/// carried is replaced.
pub fn backfill(
    record: PersonRecord,
    index: &ReferenceIndex,
    stats: &mut BackfillStats,
) -> Vec<PersonRecord> {
    let priors: Vec<Option<&str>> = match record.person_code().and_then(|c| index.lookup(c)) {
        Some(matches) => matches.iter().map(|u| u.as_deref()).collect(),
        None => vec![None],
    };

    priors
        .into_iter()
        .map(|prior| {
            let username = match prior {
                Some(existing) => {
                    stats.reused += 1;
                    existing.to_string()
                }
                None => {
                    stats.synthesized += 1;
                    synthesize_username(record.first_name(), record.last_name())
                }
            };

            let mut joined = record.clone();
            joined.set(Column::Username, Some(username.replace(' ', "")));
            joined
        })
        .collect()
}
