// Validation utilities module
// Turns validator errors into field-keyed message lists and normalizes raw input

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

/// Field name to list of human readable messages, as returned in 422 bodies
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten validation errors into `{field: [message, ...]}`
///
/// Every rule on the request DTOs carries its own message; the fallback
/// only covers codes raised without one.
pub fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field.replace('_', " ")),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Build a validation error carrying an explicit message
pub fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// The error reported for a field holding a non-string JSON value
pub fn must_be_string(field: &str) -> ValidationError {
    let mut error = ValidationError::new("string");
    error.message = Some(Cow::Owned(format!(
        "The {} must be a string.",
        field.replace('_', " ")
    )));
    error
}

/// The error reported when an email is already registered
pub fn email_taken() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    add_email_taken(&mut errors);
    errors
}

pub fn add_email_taken(errors: &mut ValidationErrors) {
    errors.add(
        "email",
        error_with_message("unique", "The email has already been taken."),
    );
}

/// Whether validation produced no errors at all
pub fn is_clean(errors: &ValidationErrors) -> bool {
    errors.errors().is_empty()
}

/// Trim surrounding whitespace and treat blank strings as absent
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Treat empty strings as absent without touching other whitespace
///
/// Used for secrets, where leading or trailing spaces are significant.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_messages_uses_explicit_message() {
        let errors = email_taken();
        let messages = field_messages(&errors);
        assert_eq!(
            messages.get("email"),
            Some(&vec!["The email has already been taken.".to_string()])
        );
    }

    #[test]
    fn test_field_messages_falls_back_to_field_name() {
        let mut errors = ValidationErrors::new();
        errors.add("last_name", ValidationError::new("weird"));
        let messages = field_messages(&errors);
        assert_eq!(messages["last_name"], vec!["The last name field is invalid."]);
    }

    #[test]
    fn test_must_be_string_names_the_field() {
        let error = must_be_string("last_name");
        assert_eq!(error.code, "string");
        assert_eq!(error.message.as_deref(), Some("The last name must be a string."));
    }

    #[test]
    fn test_is_clean() {
        assert!(is_clean(&ValidationErrors::new()));
        assert!(!is_clean(&email_taken()));
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed(Some("  John ".to_string())), Some("John".to_string()));
        assert_eq!(trimmed(Some("   ".to_string())), None);
        assert_eq!(trimmed(Some(String::new())), None);
        assert_eq!(trimmed(None), None);
    }

    #[test]
    fn test_non_empty_keeps_whitespace() {
        assert_eq!(non_empty(Some(" secret ".to_string())), Some(" secret ".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
    }
}
