//! Form validation
//!
//! Pure predicates used to gate save actions, and the per-form validators
//! built on them. A failed check never raises: it adds a message for the
//! offending field to [`FieldErrors`], and the save stays blocked while that
//! map is non-empty.

mod forms;

pub use forms::{AgreementForm, CustomerForm, FormMode, ProjectForm, TicketForm};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9]+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Letters and digits only, at least one character
pub fn is_valid_username(input: &str) -> bool {
    USERNAME_RE.is_match(input)
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_RE.is_match(input)
}

/// At least `min_length` characters
pub fn is_valid_password(input: &str, min_length: usize) -> bool {
    input.chars().count() >= min_length
}

/// Corporate tax id: 10 or 13 characters
pub fn is_valid_tax_id(input: &str) -> bool {
    matches!(input.chars().count(), 10 | 13)
}

/// National id card: 13 characters
pub fn is_valid_id_card(input: &str) -> bool {
    input.chars().count() == 13
}

/// Field name → message, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// Records `message` for `field` when `value` is blank
    pub fn require(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field, message);
            false
        } else {
            true
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
