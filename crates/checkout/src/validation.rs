//! Per-field rules. Each field is validated on its own; errors are inline and
//! recoverable.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::field::Field;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));
// Digit classes are ASCII only; `\d` would also accept other scripts' digits.
static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}-[0-9]{3}$").expect("valid regex"));
static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("valid regex"));
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid regex"));
static CVV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("valid regex"));

const FULL_NAME_MIN_CHARS: usize = 2;

/// Inline message for a field that failed its rule.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("Required")]
    Required,

    #[error("Minimum {min} characters")]
    TooShort { min: usize },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid postal code")]
    InvalidPostalCode,

    #[error("Must have 16 digits")]
    InvalidCardNumber,

    #[error("Invalid format")]
    InvalidExpiry,

    #[error("Must have 3 digits")]
    InvalidCvv,

    #[error("This field cannot be edited")]
    ReadOnly,
}

/// Check `value` against the rule for `field`.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim();

    if value.is_empty() {
        return if field.is_required() {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }

    let (pattern, error) = match field {
        Field::FullName => {
            if value.chars().count() < FULL_NAME_MIN_CHARS {
                return Err(FieldError::TooShort {
                    min: FULL_NAME_MIN_CHARS,
                });
            }
            return Ok(());
        }
        Field::Email => (&EMAIL, FieldError::InvalidEmail),
        Field::PostalCode => (&POSTAL_CODE, FieldError::InvalidPostalCode),
        Field::CardNumber => (&CARD_NUMBER, FieldError::InvalidCardNumber),
        Field::Expiry => (&EXPIRY, FieldError::InvalidExpiry),
        Field::Cvv => (&CVV, FieldError::InvalidCvv),
        Field::Street
        | Field::Number
        | Field::Complement
        | Field::Neighborhood
        | Field::City
        | Field::State
        | Field::Country => return Ok(()),
    };

    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(error)
    }
}

/// Every failing field with its error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(f, e)| (*f, *e))
    }
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(Field::as_str).collect();
        write!(f, "{}", fields.join(", "))
    }
}
