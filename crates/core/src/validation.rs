//! Declarative field validation.
//!
//! Validation runs in two passes. The first pass (this module's [`Validator`])
//! only checks presence, length, allowed values and the *shape* of date-like
//! strings, reporting every failing field at once. The second pass parses
//! dates and timestamps exactly ([`parse_calendar_date`], [`parse_timestamp`])
//! and is reported as its own error kind by the caller.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A single `(field, message)` pair describing why one input attribute failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A constraint applied to a present, non-empty text field.
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    /// Inclusive bounds, counted in characters.
    Length { min: usize, max: usize },
    /// Exact match against an explicit list of allowed values.
    OneOf(&'a [&'a str]),
    /// Three dash-separated digit groups, e.g. `2024-01-31`.
    DateShape,
    /// A date shape, a `T` (or space) separator, then a non-empty time part.
    DateTimeShape,
}

impl Rule<'_> {
    fn check(&self, value: &str) -> Result<(), String> {
        match *self {
            Rule::Length { min, max } => {
                let len = value.chars().count();
                if len < min || len > max {
                    return Err(format!("debe tener entre {min} y {max} caracteres"));
                }
            }
            Rule::OneOf(allowed) => {
                if !allowed.contains(&value) {
                    return Err(format!("debe ser uno de: {}", allowed.join(", ")));
                }
            }
            Rule::DateShape => {
                if !looks_like_date(value) {
                    return Err("debe tener formato YYYY-MM-DD".to_string());
                }
            }
            Rule::DateTimeShape => {
                if !looks_like_datetime(value) {
                    return Err("debe ser una fecha y hora RFC 3339".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Collects field errors across a payload.
///
/// Each field contributes at most one error: the first rule it fails.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text field: must be present and non-empty, then satisfy `rules` in order.
    pub fn text(&mut self, field: &str, value: Option<&str>, rules: &[Rule<'_>]) -> &mut Self {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            self.errors.push(FieldError::new(field, "es obligatorio"));
            return self;
        };

        if let Some(message) = rules.iter().find_map(|rule| rule.check(value).err()) {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Required integer field that must be strictly positive.
    pub fn positive(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        match value {
            None | Some(0) => self.errors.push(FieldError::new(field, "es obligatorio")),
            Some(v) if v < 0 => self.errors.push(FieldError::new(field, "debe ser mayor que 0")),
            Some(_) => {}
        }
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok` when nothing failed, otherwise `DomainError::Validation` with every field error.
    pub fn finish(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.errors))
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Shape-only check for calendar dates. Accepts values that may still fail
/// [`parse_calendar_date`], such as `2023-02-30` or `23-01-01`.
pub fn looks_like_date(value: &str) -> bool {
    let mut parts = value.split('-');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(y), Some(m), Some(d), None) if is_digits(y) && is_digits(m) && is_digits(d)
    )
}

/// Shape-only check for timestamps.
pub fn looks_like_datetime(value: &str) -> bool {
    match value.split_once(['T', 't', ' ']) {
        Some((date, time)) => looks_like_date(date) && !time.is_empty(),
        None => false,
    }
}

/// Exact `YYYY-MM-DD` parse: four-digit year, two-digit month and day, real calendar day.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Exact RFC 3339 parse; the offset is mandatory.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPECIES: &[&str] = &["Perro", "Gato", "Conejo"];

    #[test]
    fn missing_and_empty_fields_are_required() {
        let mut v = Validator::new();
        v.text("nombre", None, &[Rule::Length { min: 2, max: 100 }])
            .text("raza", Some(""), &[]);
        let err = v.finish().unwrap_err();
        assert_eq!(
            err.fields(),
            &[
                FieldError::new("nombre", "es obligatorio"),
                FieldError::new("raza", "es obligatorio"),
            ]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut v = Validator::new();
        v.text("nombre", Some("Ñu"), &[Rule::Length { min: 2, max: 2 }]);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn reports_only_first_failing_rule_per_field() {
        let mut v = Validator::new();
        v.text(
            "especie",
            Some("X"),
            &[Rule::Length { min: 2, max: 10 }, Rule::OneOf(SPECIES)],
        );
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()[0].message, "debe tener entre 2 y 10 caracteres");
    }

    #[test]
    fn one_of_is_exact_and_supports_multi_word_values() {
        let allowed = &["Baño", "Consulta Veterinaria"];
        let mut v = Validator::new();
        v.text("tipo_cuidado", Some("Consulta Veterinaria"), &[Rule::OneOf(allowed)])
            .text("otro", Some("Consulta"), &[Rule::OneOf(allowed)]);
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()[0].field, "otro");
    }

    #[test]
    fn positive_rejects_missing_zero_and_negative() {
        let mut v = Validator::new();
        v.positive("a", None).positive("b", Some(0)).positive("c", Some(-1)).positive("d", Some(3));
        let fields: Vec<_> = v.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn date_shape_is_looser_than_exact_parse() {
        for s in ["2023-02-30", "23-01-01", "2023-1-5"] {
            assert!(looks_like_date(s), "{s} should look like a date");
            assert!(parse_calendar_date(s).is_none(), "{s} should not parse");
        }
        assert!(!looks_like_date("2023/01/01"));
        assert!(!looks_like_date("hoy"));
        assert_eq!(
            parse_calendar_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn timestamps_require_an_offset() {
        assert!(looks_like_datetime("2024-05-01T10:00:00"));
        assert!(parse_timestamp("2024-05-01T10:00:00").is_none());
        assert!(parse_timestamp("2024-05-01T10:00:00-03:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00.250Z").is_some());
        assert!(looks_like_datetime("2024-13-01T10:00:00Z"));
        assert!(parse_timestamp("2024-13-01T10:00:00Z").is_none());
        assert!(!looks_like_datetime("2024-05-01"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: every exactly-parsed date is shaped like a date and formats back to itself.
        #[test]
        fn parsed_dates_round_trip(s in "[0-9]{4}-[0-9]{2}-[0-9]{2}") {
            if let Some(date) = parse_calendar_date(&s) {
                prop_assert!(looks_like_date(&s));
                prop_assert_eq!(date.format("%Y-%m-%d").to_string(), s);
            }
        }

        /// Property: years that are not four digits never parse.
        #[test]
        fn short_or_long_years_never_parse(
            year in prop_oneof!["[0-9]{1,3}", "[0-9]{5,6}"],
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let s = format!("{year}-{month:02}-{day:02}");
            prop_assert!(looks_like_date(&s));
            prop_assert!(parse_calendar_date(&s).is_none());
        }
    }
}
