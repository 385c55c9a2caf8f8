//! Per-field value normalization.
//!
//! Every rule is total: it maps what it recognizes and otherwise applies its
//! named [`Fallback`], so no value can make the transform fail.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::columns::Column;

/// What a rule produces when its mapping does not recognize the value
/// (or the value is missing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Keep the original value, including a missing one.
    Passthrough,
    /// Clear the value.
    Null,
    /// Substitute a fixed value.
    Constant(String),
}

/// Normalization for one column.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub column: Column,
    pub fallback: Fallback,
    map: fn(&str) -> Option<String>,
}

impl FieldRule {
    pub fn new(column: Column, map: fn(&str) -> Option<String>, fallback: Fallback) -> Self {
        Self {
            column,
            fallback,
            map,
        }
    }

    pub fn apply(&self, value: Option<&str>) -> Option<String> {
        if let Some(mapped) = value.and_then(self.map) {
            return Some(mapped);
        }

        match &self.fallback {
            Fallback::Passthrough => value.map(str::to_string),
            Fallback::Null => None,
            Fallback::Constant(constant) => Some(constant.clone()),
        }
    }
}

/// Rules applied to every transformed file.
pub fn default_rules(default_org_code: &str) -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            Column::Location,
            |v| Some(normalize_location(v).into_owned()),
            Fallback::Passthrough,
        ),
        FieldRule::new(
            Column::Active,
            |v| is_active(v).then(|| "Y".to_string()),
            Fallback::Constant("N".to_string()),
        ),
        FieldRule::new(
            Column::BusinessWeek,
            |v| business_week_label(v).map(str::to_string),
            Fallback::Passthrough,
        ),
        FieldRule::new(
            Column::PersonOrgCode,
            |v| Some(v.to_string()),
            Fallback::Constant(default_org_code.to_string()),
        ),
        FieldRule::new(Column::PersonCode, |v| Some(coerce_code(v)), Fallback::Passthrough),
        FieldRule::new(Column::IdCode1, |v| Some(coerce_code(v)), Fallback::Passthrough),
        FieldRule::new(Column::IdCode2, |v| Some(coerce_code(v)), Fallback::Passthrough),
    ]
}

/// Exempt-status classification. `Exempt_Status` is not in the output
/// allow-list, so this rule is not part of [`default_rules`].
pub fn exempt_status_rule() -> FieldRule {
    FieldRule::new(
        Column::ExemptStatus,
        |v| classify_exempt_status(v).map(str::to_string),
        Fallback::Null,
    )
}

/// UTF-8 en-dash decoded as Windows-1252, and as Latin-1.
const MISENCODED_EN_DASHES: [&str; 2] = ["\u{e2}\u{20ac}\u{201c}", "\u{e2}\u{80}\u{93}"];

pub fn normalize_location(value: &str) -> Cow<'_, str> {
    if !MISENCODED_EN_DASHES.iter().any(|d| value.contains(d)) {
        return Cow::Borrowed(value);
    }

    let mut fixed = value.to_string();
    for dash in MISENCODED_EN_DASHES {
        fixed = fixed.replace(dash, "-");
    }
    Cow::Owned(fixed)
}

const ACTIVE_TOKENS: [&str; 3] = ["Y", "A", "ACTIVE"];

fn is_active(value: &str) -> bool {
    let value = value.trim();
    ACTIVE_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(value))
}

const BUSINESS_WEEKS: [(&str, &str); 5] = [
    ("FT", "WEEK-40: 100% (Full-Time)"),
    ("PT", "WEEK-20: 50% (Part-Time)"),
    ("PT60", "WEEK-24: 60% (Part-Time)"),
    ("PT80", "WEEK-32: 80% (Part-Time)"),
    ("CAS", "WEEK-0: As Needed (Casual)"),
];

pub fn business_week_label(code: &str) -> Option<&'static str> {
    let code = code.trim();
    BUSINESS_WEEKS
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(code))
        .map(|(_, label)| *label)
}

/// `E` salaried, `N` hourly, `X` subcontractor.
pub fn classify_exempt_status(value: &str) -> Option<&'static str> {
    let value = value.to_lowercase();
    if value.contains("salary") {
        Some("E")
    } else if value.contains("hourly") {
        Some("N")
    } else if value.contains("subcontractor") {
        Some("X")
    } else {
        None
    }
}

static FLOAT_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)\.0+$").unwrap());

/// Text form of an identifier code.
///
/// Keeps leading zeros and strips the `.0` a spreadsheet round trip leaves
/// on integral codes.
pub fn coerce_code(value: &str) -> String {
    let value = value.trim();
    match FLOAT_ARTIFACT.captures(value) {
        Some(caps) => caps[1].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(column: Column) -> FieldRule {
        default_rules("CORP")
            .into_iter()
            .find(|r| r.column == column)
            .unwrap()
    }

    fn apply(column: Column, value: Option<&str>) -> Option<String> {
        rule(column).apply(value)
    }

    #[test]
    fn active_tokens_in_any_case() {
        for token in ["Y", "y", "A", "a", "ACTIVE", "Active", "active", " y "] {
            assert_eq!(apply(Column::Active, Some(token)).as_deref(), Some("Y"), "{token:?}");
        }
    }

    #[test]
    fn everything_else_is_inactive() {
        for token in ["", "N", "I", "Inactive", "YES", "1", "0", "None", "nan", "AA"] {
            assert_eq!(apply(Column::Active, Some(token)).as_deref(), Some("N"), "{token:?}");
        }
        assert_eq!(apply(Column::Active, None).as_deref(), Some("N"));
    }

    #[test]
    fn business_week_codes_map_to_labels() {
        let cases = [
            ("FT", "WEEK-40: 100% (Full-Time)"),
            (" ft ", "WEEK-40: 100% (Full-Time)"),
            ("pt", "WEEK-20: 50% (Part-Time)"),
            ("Pt60", "WEEK-24: 60% (Part-Time)"),
            ("PT80\t", "WEEK-32: 80% (Part-Time)"),
            ("cas", "WEEK-0: As Needed (Casual)"),
        ];
        for (code, label) in cases {
            assert_eq!(apply(Column::BusinessWeek, Some(code)).as_deref(), Some(label), "{code:?}");
        }
    }

    #[test]
    fn unknown_business_week_passes_through_untouched() {
        for value in ["PT70", " FT-40 ", ""] {
            assert_eq!(apply(Column::BusinessWeek, Some(value)).as_deref(), Some(value));
        }
        assert_eq!(apply(Column::BusinessWeek, None), None);
    }

    #[test]
    fn location_en_dash_repaired() {
        assert_eq!(
            normalize_location("Austin \u{e2}\u{20ac}\u{201c} Remote"),
            "Austin - Remote"
        );
        assert_eq!(normalize_location("Reston\u{e2}\u{80}\u{93}HQ"), "Reston-HQ");
        assert!(matches!(normalize_location("Reston - HQ"), Cow::Borrowed(_)));
    }

    #[test]
    fn exempt_status_classification() {
        assert_eq!(classify_exempt_status("Full Time Salary"), Some("E"));
        assert_eq!(classify_exempt_status("HOURLY"), Some("N"));
        assert_eq!(classify_exempt_status("1099 Subcontractor"), Some("X"));
        assert_eq!(classify_exempt_status("Intern"), None);
        assert_eq!(exempt_status_rule().apply(Some("Intern")), None);
        assert_eq!(exempt_status_rule().apply(None), None);
    }

    #[test]
    fn codes_keep_text_form() {
        assert_eq!(coerce_code("00042"), "00042");
        assert_eq!(coerce_code("42.0"), "42");
        assert_eq!(coerce_code(" 1007.00 "), "1007");
        assert_eq!(coerce_code("42.5"), "42.5");
        assert_eq!(coerce_code("E-100.0"), "E-100.0");
    }

    #[test]
    fn org_code_defaults_only_when_missing() {
        let org = rule(Column::PersonOrgCode);
        assert_eq!(org.apply(None).as_deref(), Some("CORP"));
        assert_eq!(org.apply(Some("ENG")).as_deref(), Some("ENG"));
    }

    #[test]
    fn rules_follow_their_fallback() {
        assert_eq!(rule(Column::Active).fallback, Fallback::Constant("N".into()));
        assert_eq!(rule(Column::Active).apply(None).as_deref(), Some("N"));
        assert_eq!(rule(Column::BusinessWeek).apply(Some("x")).as_deref(), Some("x"));
        assert_eq!(rule(Column::BusinessWeek).apply(None), None);
        assert_eq!(rule(Column::Location).apply(None), None);
        assert_eq!(rule(Column::PersonCode).apply(Some("7.0")).as_deref(), Some("7"));
    }
}
