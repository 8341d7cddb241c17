//! Helpers shared by the `validator` derives on request DTOs.
//!
//! Custom rule functions live here so the server DTOs and the admin form
//! schemas enforce the same constraints.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

use crate::catalog::is_valid_rating;

/// Maximum length of any name/title column.
pub const MAX_NAME_LENGTH: u64 = 255;

/// Build a [`ValidationError`] with an attached human-readable message.
pub fn error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message.into()));
    err
}

/// Flatten validation errors into `field -> [messages]`, sorted by field.
///
/// Errors without an explicit message fall back to `"The {field} field is
/// invalid."` so every entry is presentable to a form.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for (field, errs) in errors.field_errors() {
        let field = field.to_string();
        let messages = errs
            .iter()
            .map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("The {field} field is invalid."),
            })
            .collect();
        out.insert(field, messages);
    }
    out
}

/// Reject names that are empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required."));
    }
    Ok(())
}

/// Video rating must be one of the advisory classifications.
pub fn validate_rating(value: &str) -> Result<(), ValidationError> {
    if is_valid_rating(value) {
        Ok(())
    } else {
        Err(error("in", "The selected rating is invalid."))
    }
}
