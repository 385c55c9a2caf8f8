use super::columns::{Column, Projection};

/// Cell contents read as "no value", besides blank cells.
const MISSING_TOKENS: [&str; 9] = [
    "NA", "N/A", "#N/A", "NULL", "null", "NaN", "nan", "None", "n/a",
];

/// Whether a raw cell holds no value.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// One person row in the target schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    values: [Option<String>; Column::COUNT],
}

impl PersonRecord {
    /// Build a record from an export row through `projection`.
    ///
    /// Cells past the end of a short row count as missing.
    pub fn from_row<'a, R>(row: R, projection: &Projection) -> Self
    where
        R: Fn(usize) -> Option<&'a str>,
    {
        let mut record = PersonRecord::default();
        for &(idx, column) in projection.slots() {
            let value = row(idx).filter(|raw| !is_missing(raw));
            record.set(column, value.map(str::to_string));
        }
        record
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.values[column.index()].as_deref()
    }

    pub fn set(&mut self, column: Column, value: Option<String>) {
        self.values[column.index()] = value;
    }

    pub fn username(&self) -> Option<&str> {
        self.get(Column::Username)
    }

    pub fn person_code(&self) -> Option<&str> {
        self.get(Column::PersonCode)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get(Column::FirstName)
    }

    pub fn last_name(&self) -> Option<&str> {
        self.get(Column::LastName)
    }

    /// Cells for `columns`, missing values as empty strings.
    pub fn cells<'a>(&'a self, columns: &'a [Column]) -> impl Iterator<Item = &'a str> + 'a {
        columns.iter().map(|c| self.get(*c).unwrap_or(""))
    }
}
