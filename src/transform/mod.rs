//! Person export to import-schema transformation.
//!
//! One pass over the staged export: project and rename columns, normalize
//! field values, backfill usernames from the reference file, then replace
//! the staged file with the result. Nothing touches the staged file until
//! the whole output has been produced.

pub mod columns;
pub mod normalize;
pub mod record;
pub mod reference;

use std::borrow::Cow;
use std::io::{Read, Write};
use std::path::Path;

use crate::config::settings::TransformSettings;
use crate::error::TransformError;
use crate::fs_utils;

pub use columns::{Column, Projection};
pub use normalize::{Fallback, FieldRule};
pub use record::PersonRecord;
pub use reference::{BackfillStats, ReferenceIndex};

/// Counts reported after a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub usernames_reused: usize,
    pub usernames_synthesized: usize,
    /// Export headers left out of the output.
    pub dropped_columns: Vec<String>,
}

pub struct Transformer {
    rules: Vec<FieldRule>,
}

impl Transformer {
    pub fn new(settings: &TransformSettings) -> Self {
        Self {
            rules: normalize::default_rules(&settings.default_org_code),
        }
    }

    /// Transform CSV from `input` into `output`.
    ///
    /// `path` labels errors. `output` may hold a partial write when this
    /// fails.
    pub fn transform<R: Read, W: Write>(
        &self,
        input: R,
        index: &ReferenceIndex,
        output: W,
        path: &Path,
    ) -> Result<TransformSummary, TransformError> {
        let read_err = |source: csv::Error| TransformError::Read {
            path: path.to_path_buf(),
            source,
        };
        let encode_err = |source: csv::Error| TransformError::Encode {
            path: path.to_path_buf(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(read_err)?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let projection = Projection::from_headers(headers.iter().map(String::as_str)).map_err(
            |conflict| TransformError::DuplicateColumn {
                path: path.to_path_buf(),
                first: conflict.first,
                second: conflict.second,
                target: conflict.target.to_string(),
            },
        )?;

        if !projection.contains(Column::PersonCode) {
            return Err(TransformError::MissingColumn {
                path: path.to_path_buf(),
                column: Column::PersonCode.header().to_string(),
            });
        }
        if !projection.dropped().is_empty() {
            tracing::debug!("Dropping columns: {}", projection.dropped().join(", "));
        }

        let rules: Vec<&FieldRule> = self
            .rules
            .iter()
            .filter(|rule| projection.contains(rule.column))
            .collect();
        let columns = projection.output_columns();

        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(output);
        wtr.write_record(columns.iter().map(|c| c.header()))
            .map_err(encode_err)?;

        let mut summary = TransformSummary {
            dropped_columns: projection.dropped().to_vec(),
            ..Default::default()
        };
        let mut stats = BackfillStats::default();
        let mut row = csv::ByteRecord::new();

        while rdr.read_byte_record(&mut row).map_err(read_err)? {
            if row.len() > headers.len() {
                return Err(TransformError::MalformedRow {
                    path: path.to_path_buf(),
                    line: row.position().map_or(0, |p| p.line()),
                });
            }
            summary.rows_in += 1;

            let cells: Vec<Cow<'_, str>> = row.iter().map(String::from_utf8_lossy).collect();
            let mut record = PersonRecord::from_row(|i| cells.get(i).map(|c| &**c), &projection);

            for rule in &rules {
                let value = rule.apply(record.get(rule.column));
                record.set(rule.column, value);
            }

            for joined in reference::backfill(record, index, &mut stats) {
                wtr.write_record(joined.cells(&columns)).map_err(encode_err)?;
                summary.rows_out += 1;
            }
        }

        wtr.flush().map_err(|e| TransformError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        summary.usernames_reused = stats.reused;
        summary.usernames_synthesized = stats.synthesized;
        Ok(summary)
    }
}

/// Transform the staged export at `input` in place, backfilling usernames
/// from `reference`.
///
/// On any error the staged file is left as it was.
pub fn transform_file(
    input: &Path,
    reference: &Path,
    settings: &TransformSettings,
) -> Result<TransformSummary, TransformError> {
    tracing::info!("Transforming {}", input.display());

    let index = ReferenceIndex::from_path(reference)?;
    if index.is_empty() {
        tracing::warn!(
            "{} has no person codes; every username will be synthesized",
            reference.display()
        );
    } else {
        tracing::info!(
            "Reference {}: {} person codes, {} duplicated",
            reference.display(),
            index.len(),
            index.duplicate_codes()
        );
    }
    let file = std::fs::File::open(input).map_err(|e| TransformError::Read {
        path: input.to_path_buf(),
        source: e.into(),
    })?;

    let mut buffer = Vec::new();
    let summary = Transformer::new(settings).transform(file, &index, &mut buffer, input)?;

    fs_utils::write_atomic(input, &buffer).map_err(|e| TransformError::Write {
        path: input.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        "Wrote {} rows to {} ({} usernames reused, {} synthesized)",
        summary.rows_out,
        input.display(),
        summary.usernames_reused,
        summary.usernames_synthesized
    );
    Ok(summary)
}
