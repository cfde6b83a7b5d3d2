//! Field validation for records.
//!
//! Two tiers exist:
//! - **Full validation** ([`validate_record`], [`validate_draft`]): syntactic
//!   checks on every user-editable field. Used before a record is created or
//!   edited.
//! - **Structural validation** ([`is_structurally_valid`]): presence and type
//!   checks on a raw JSON value. Used when importing documents; field formats
//!   are not re-checked at this tier.

use crate::model::{Record, RecordDraft};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S(?:.*\S)?$").expect("valid description regex"));

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$").expect("valid amount regex"));

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").expect("valid date regex")
});

static CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$").expect("valid category regex"));

/// A single failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    Description,
    Amount,
    Date,
    Category,
    DuplicateWords,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFailure::Description => write!(f, "Invalid description"),
            ValidationFailure::Amount => write!(f, "Invalid amount"),
            ValidationFailure::Date => write!(f, "Invalid date"),
            ValidationFailure::Category => write!(f, "Invalid category"),
            ValidationFailure::DuplicateWords => write!(f, "Description has duplicate words"),
        }
    }
}

/// Outcome of validating a record: the failed rules in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable message for each failure, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// True if the trimmed text is non-empty and bounded by non-whitespace.
pub fn validate_description(text: &str) -> bool {
    DESCRIPTION_RE.is_match(text.trim())
}

/// True for `0` or a positive integer with at most two decimal places.
pub fn validate_amount(value: &str) -> bool {
    AMOUNT_RE.is_match(value)
}

/// True for `YYYY-MM-DD` with month in 01..=12 and day in 01..=31.
///
/// Day counts per month are not checked: "2024-02-30" passes.
pub fn validate_date(value: &str) -> bool {
    DATE_RE.is_match(value)
}

/// True for alphabetic words joined by single spaces or hyphens.
pub fn validate_category(value: &str) -> bool {
    CATEGORY_RE.is_match(value)
}

/// True unless some word is immediately repeated, ignoring case.
///
/// Words are runs of ASCII letters, digits and underscores. Two words are
/// adjacent only when the text between them is entirely whitespace, so
/// "pay, pay" passes while "Pay  pay" does not.
pub fn validate_no_duplicate_words(text: &str) -> bool {
    let words = word_spans(text);
    !words.windows(2).any(|pair| {
        let (a_start, a_end) = pair[0];
        let (b_start, b_end) = pair[1];
        let gap = &text[a_end..b_start];
        gap.chars().all(char::is_whitespace)
            && text[a_start..a_end].eq_ignore_ascii_case(&text[b_start..b_end])
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte ranges of every maximal word run in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Renders an amount the way it is shown to users: `-0` reads as `0`, and
/// magnitudes from 1e21 up switch to exponent form (which no rule accepts).
fn amount_text(amount: f64) -> String {
    if amount == 0.0 {
        "0".to_string()
    } else if amount.abs() >= 1e21 {
        format!("{:e}", amount)
    } else {
        amount.to_string()
    }
}

fn validate_fields(description: &str, amount: f64, date: &str, category: &str) -> ValidationReport {
    let mut errors = Vec::new();
    if !validate_description(description) {
        errors.push(ValidationFailure::Description);
    }
    if !validate_amount(&amount_text(amount)) {
        errors.push(ValidationFailure::Amount);
    }
    if !validate_date(date) {
        errors.push(ValidationFailure::Date);
    }
    if !validate_category(category) {
        errors.push(ValidationFailure::Category);
    }
    if !validate_no_duplicate_words(description) {
        errors.push(ValidationFailure::DuplicateWords);
    }
    ValidationReport { errors }
}

/// Runs every field rule against a record. Identity and timestamps are not checked.
pub fn validate_record(record: &Record) -> ValidationReport {
    validate_fields(
        &record.description,
        record.amount,
        &record.date,
        &record.category,
    )
}

pub fn validate_draft(draft: &RecordDraft) -> ValidationReport {
    validate_fields(&draft.description, draft.amount, &draft.date, &draft.category)
}

/// Import-tier check: the value is an object carrying every record field,
/// each truthy, with a numeric `amount`.
pub fn is_structurally_valid(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let truthy = |key: &str| obj.get(key).is_some_and(is_truthy);
    truthy("id")
        && truthy("description")
        && obj.get("amount").is_some_and(Value::is_number)
        && truthy("category")
        && truthy("date")
        && truthy("createdAt")
        && truthy("updatedAt")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
