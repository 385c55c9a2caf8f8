//! Target schema of the person import and the source-to-target header mapping.

/// A column the person import recognizes.
///
/// Discriminants index `PersonRecord` storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Username,
    FirstName,
    LastName,
    MiddleInitial,
    Nickname,
    Suffix,
    Email,
    PersonCode,
    IdCode1,
    IdCode2,
    PersonOrgCode,
    Manager,
    TimeApprover,
    ExpenseApprover,
    Location,
    Active,
    BusinessWeek,
    HireDate,
    TerminationDate,
    LaborCategory,
    CostRate,
    BillRate,
    User01,
    /// Recognized but currently left out of the output.
    ExemptStatus,
    /// Landing slot for the export's own `User01`, always dropped.
    Remove,
}

impl Column {
    pub const COUNT: usize = 25;

    pub const ALL: [Column; Self::COUNT] = [
        Column::Username,
        Column::FirstName,
        Column::LastName,
        Column::MiddleInitial,
        Column::Nickname,
        Column::Suffix,
        Column::Email,
        Column::PersonCode,
        Column::IdCode1,
        Column::IdCode2,
        Column::PersonOrgCode,
        Column::Manager,
        Column::TimeApprover,
        Column::ExpenseApprover,
        Column::Location,
        Column::Active,
        Column::BusinessWeek,
        Column::HireDate,
        Column::TerminationDate,
        Column::LaborCategory,
        Column::CostRate,
        Column::BillRate,
        Column::User01,
        Column::ExemptStatus,
        Column::Remove,
    ];

    /// Columns written to the import file, in output order.
    pub const ALLOWED: [Column; 23] = [
        Column::Username,
        Column::FirstName,
        Column::LastName,
        Column::MiddleInitial,
        Column::Nickname,
        Column::Suffix,
        Column::Email,
        Column::PersonCode,
        Column::IdCode1,
        Column::IdCode2,
        Column::PersonOrgCode,
        Column::Manager,
        Column::TimeApprover,
        Column::ExpenseApprover,
        Column::Location,
        Column::Active,
        Column::BusinessWeek,
        Column::HireDate,
        Column::TerminationDate,
        Column::LaborCategory,
        Column::CostRate,
        Column::BillRate,
        Column::User01,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Username => "*Username",
            Column::FirstName => "First_Name",
            Column::LastName => "Last_Name",
            Column::MiddleInitial => "Middle_Initial",
            Column::Nickname => "Nickname",
            Column::Suffix => "Suffix",
            Column::Email => "Email",
            Column::PersonCode => "Person_Code",
            Column::IdCode1 => "ID_Code_1",
            Column::IdCode2 => "ID_Code_2",
            Column::PersonOrgCode => "Person_Org_Code",
            Column::Manager => "Manager",
            Column::TimeApprover => "Time_Approver",
            Column::ExpenseApprover => "Expense_Approver",
            Column::Location => "Location",
            Column::Active => "Active",
            Column::BusinessWeek => "Business_Week",
            Column::HireDate => "Hire_Date",
            Column::TerminationDate => "Termination_Date",
            Column::LaborCategory => "Labor_Category",
            Column::CostRate => "Cost_Rate",
            Column::BillRate => "Bill_Rate",
            Column::User01 => "User01",
            Column::ExemptStatus => "Exempt_Status",
            Column::Remove => "Remove",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn is_allowed(self) -> bool {
        Self::ALLOWED.contains(&self)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// Export headers that land on a differently named target.
///
/// Applied all at once: `User01` moves out to `Remove` while `Annual_Rate`
/// takes over `User01`.
pub const RENAMES: &[(&str, Column)] = &[
    ("Username", Column::Username),
    ("FirstName", Column::FirstName),
    ("LastName", Column::LastName),
    ("MiddleInitial", Column::MiddleInitial),
    ("Org_Code", Column::PersonOrgCode),
    ("Manager_Code", Column::Manager),
    ("Business_Week1", Column::BusinessWeek),
    ("Employment_Status", Column::ExemptStatus),
    ("User01", Column::Remove),
    ("Annual_Rate", Column::User01),
];

/// Target column for an export header, if it has one.
///
/// Headers without a rename keep their name and are recognized only when
/// that name is already a target header.
pub fn target_for(source_header: &str) -> Option<Column> {
    RENAMES
        .iter()
        .find(|(source, _)| *source == source_header)
        .map(|(_, column)| *column)
        .or_else(|| Column::from_header(source_header))
}

/// Which export column feeds which target column.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    slots: Vec<(usize, Column)>,
    dropped: Vec<String>,
}

/// Two export headers mapped onto the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConflict {
    pub first: String,
    pub second: String,
    pub target: Column,
}

impl Projection {
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, ColumnConflict>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut projection = Projection::default();
        let mut sources: Vec<(Column, &'a str)> = Vec::new();

        for (idx, raw) in headers.into_iter().enumerate() {
            let header = clean_header(raw, idx);

            match target_for(header) {
                Some(column) if column.is_allowed() => {
                    if let Some((_, first)) = sources.iter().find(|(c, _)| *c == column) {
                        return Err(ColumnConflict {
                            first: first.to_string(),
                            second: header.to_string(),
                            target: column,
                        });
                    }
                    sources.push((column, header));
                    projection.slots.push((idx, column));
                }
                _ => projection.dropped.push(header.to_string()),
            }
        }

        Ok(projection)
    }

    /// `(source index, target)` pairs in source order.
    pub fn slots(&self) -> &[(usize, Column)] {
        &self.slots
    }

    /// Export headers with no allowed target.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn contains(&self, column: Column) -> bool {
        self.slots.iter().any(|(_, c)| *c == column)
    }

    /// Output header order: allow-list order, restricted to projected
    /// columns, with `*Username` always present.
    pub fn output_columns(&self) -> Vec<Column> {
        Column::ALLOWED
            .into_iter()
            .filter(|c| *c == Column::Username || self.contains(*c))
            .collect()
    }
}

fn clean_header(raw: &str, idx: usize) -> &str {
    let raw = if idx == 0 {
        raw.strip_prefix('\u{feff}').unwrap_or(raw)
    } else {
        raw
    };
    raw.trim()
}
