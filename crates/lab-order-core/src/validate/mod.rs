//! Section-scoped validation engine.
//!
//! Each section validator is a pure function `(draft) -> FieldErrors`;
//! validation never panics and never returns an error type. An empty map
//! means the section is valid. Whether errors are surfaced (touched /
//! submit-attempted gating) is the UI's concern, not this crate's.

mod case_info;
mod insurance;
mod order_info;
mod personal;

pub use case_info::validate_case_info;
pub use insurance::validate_insurance;
pub use order_info::validate_order_info;
pub use personal::validate_personal;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::draft::OrderDraft;
use crate::models::Section;

pub(crate) static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

pub(crate) static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip pattern"));

pub(crate) static TEN_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("phone pattern"));

pub(crate) static LETTERS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("letters pattern"));

pub(crate) static GUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("guid pattern")
});

/// The one blank predicate shared by validation and diffing: a missing value
/// and a whitespace-only string are equally "empty".
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Field-keyed validation errors for one section. Empty ⇒ valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// Require a text field, recording `message` when it is blank.
    pub fn require(&mut self, field: &str, value: &Option<String>, message: &str) {
        if is_blank(value) {
            self.insert(field, message);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// Validate one named section of the draft.
pub fn validate_section(section: Section, draft: &OrderDraft) -> FieldErrors {
    match section {
        Section::Personal => validate_personal(draft),
        Section::CaseInfo => validate_case_info(draft),
        Section::OrderInfo => validate_order_info(draft),
        Section::Insurance => validate_insurance(draft),
    }
}

/// True when every section validates clean.
pub fn is_submittable(draft: &OrderDraft) -> bool {
    [
        Section::Personal,
        Section::CaseInfo,
        Section::OrderInfo,
        Section::Insurance,
    ]
    .into_iter()
    .all(|s| validate_section(s, draft).is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some(String::new())));
        assert!(is_blank(&Some("   ".into())));
        assert!(!is_blank(&Some("x".into())));
    }

    #[test]
    fn test_patterns() {
        assert!(EMAIL_RE.is_match("a.b@clinic-lab.org"));
        assert!(!EMAIL_RE.is_match("not-an-email"));
        assert!(ZIP_RE.is_match("78701"));
        assert!(ZIP_RE.is_match("78701-1234"));
        assert!(!ZIP_RE.is_match("7870"));
        assert!(TEN_DIGITS_RE.is_match("5125550134"));
        assert!(!TEN_DIGITS_RE.is_match("512555013"));
        assert!(GUID_RE.is_match("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!GUID_RE.is_match("123e4567"));
    }

    #[test]
    fn test_field_errors_require() {
        let mut errors = FieldErrors::new();
        errors.require("first_name", &None, "First name is required");
        errors.require("last_name", &Some("DOE".into()), "Last name is required");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("first_name"), Some("First name is required"));
    }
}
