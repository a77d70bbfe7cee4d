use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::{ApplicationRecord, Field, Position};

// Unanchored on purpose: any `x@y.z` run inside the value is enough.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    errors: BTreeMap<Field, &'static str>,
}

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldError> + '_ {
        self.errors
            .iter()
            .map(|(&field, &message)| FieldError { field, message })
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.errors.insert(field, message);
    }
}

pub fn validate(record: &ApplicationRecord) -> ErrorMap {
    let mut errors = ErrorMap::default();

    if is_blank(&record.full_name) {
        errors.insert(Field::FullName, "Full Name is required");
    }

    if is_blank(&record.email) {
        errors.insert(Field::Email, "Email is required");
    } else if !EMAIL_SHAPE.is_match(&record.email) {
        errors.insert(Field::Email, "Invalid email format");
    }

    if is_blank(&record.phone_number) {
        errors.insert(Field::PhoneNumber, "Phone Number is required");
    } else if parse_number(&record.phone_number).is_none() {
        errors.insert(Field::PhoneNumber, "Phone Number must be a valid number");
    }

    let (needs_experience, needs_portfolio, needs_management) = match record.applying_for {
        Some(Position::Developer) => (true, false, false),
        Some(Position::Designer) => (true, true, false),
        Some(Position::Manager) => (false, false, true),
        None => {
            errors.insert(Field::ApplyingFor, "Please select a position");
            (false, false, false)
        }
    };

    if needs_experience {
        if is_blank(&record.relevant_experience) {
            errors.insert(Field::RelevantExperience, "Relevant Experience is required");
        } else if !parse_number(&record.relevant_experience).is_some_and(|years| years > 0.0) {
            errors.insert(
                Field::RelevantExperience,
                "Relevant Experience must be a valid number greater than 0",
            );
        }
    }

    if needs_portfolio && is_blank(&record.portfolio_url) {
        errors.insert(Field::PortfolioUrl, "Portfolio URL is required");
    }

    if needs_management && is_blank(&record.management_experience) {
        errors.insert(Field::ManagementExperience, "Management Experience is required");
    }

    if record.additional_skills.is_empty() {
        errors.insert(Field::AdditionalSkills, "At least one skill must be selected");
    }

    if is_blank(&record.preferred_interview_time) {
        errors.insert(Field::PreferredInterviewTime, "Preferred Interview Time is required");
    }

    errors
}

fn is_blank(value: &str) -> bool {
    trim_form_whitespace(value).is_empty()
}

// U+FEFF counts as whitespace for form input, but `str::trim` keeps it.
fn trim_form_whitespace(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Loose numeric coercion: surrounding whitespace is ignored, and signs,
/// decimals, exponents, `Infinity` and `0x`/`0o`/`0b` integers all count.
/// Blank input coerces to zero. Returns `None` when the text is not a number.
pub fn parse_number(value: &str) -> Option<f64> {
    let text = trim_form_whitespace(value);
    if text.is_empty() {
        return Some(0.0);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * radix as f64 + d as f64),
        );
    }

    // Rust's float parser also takes "inf" and "nan"; only plain decimal text is a number here.
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}
