//! FormErrors - Field-keyed validation error state.
//!
//! Owned by the component that renders the form; created and cleared by
//! that component, never persisted. Independent of any other validation
//! state the form may carry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::StandardError;

/// Default code attached to field errors lacking one.
pub const FORM_ERROR_CODE: &str = "VALIDATION_ERROR";

/// A validation failure attributed to one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormError {
    pub field: String,
    pub message: String,
    pub code: String,
    /// The rejected input value, when the source reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FormError {
    /// Creates a field error with the default code.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: FORM_ERROR_CODE.to_string(),
            value: None,
        }
    }

    /// Overrides the error code. Empty codes are ignored.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !code.is_empty() {
            self.code = code;
        }
        self
    }

    /// Attaches the rejected value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Field-keyed error map for one form instance.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    errors: HashMap<String, FormError>,
}

impl FormErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts an error for the given field with the default code.
    pub fn set_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        self.errors
            .insert(field.clone(), FormError::new(field, message));
    }

    /// Upserts a fully specified field error.
    pub fn insert(&mut self, error: FormError) {
        self.errors.insert(error.field.clone(), error);
    }

    /// Removes the error for one field, returning it if present.
    pub fn clear_field_error(&mut self, field: &str) -> Option<FormError> {
        self.errors.remove(field)
    }

    /// Removes every field error.
    pub fn clear_all(&mut self) {
        self.errors.clear();
    }

    /// The error recorded for one field.
    pub fn get(&self, field: &str) -> Option<&FormError> {
        self.errors.get(field)
    }

    /// True when any field carries an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when no field carries an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields carrying errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when the map is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the recorded field errors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Maps a normalized error's structured details onto field errors.
    ///
    /// Two shapes are accepted: an ordered list of records carrying
    /// `field` and `message`, or a field-keyed mapping whose values are
    /// either message strings or `{message, code?, value?}` objects.
    /// Anything non-conforming is skipped silently.
    pub fn handle_validation_error(&mut self, error: &StandardError) {
        let Some(details) = &error.details else {
            return;
        };
        match details {
            Value::Array(records) => {
                for record in records {
                    if let Some(form_error) = parse_record(record) {
                        self.insert(form_error);
                    }
                }
            }
            Value::Object(fields) => {
                for (field, value) in fields {
                    if let Some(form_error) = parse_field_entry(field, value) {
                        self.insert(form_error);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parses one element of the ordered-list details shape.
fn parse_record(record: &Value) -> Option<FormError> {
    let field = record.get("field")?.as_str()?;
    let message = record.get("message")?.as_str()?;
    let mut form_error = FormError::new(field, message);
    if let Some(code) = record.get("code").and_then(Value::as_str) {
        form_error = form_error.with_code(code);
    }
    if let Some(value) = record.get("value") {
        form_error = form_error.with_value(value.clone());
    }
    Some(form_error)
}

/// Parses one entry of the field-keyed details shape.
fn parse_field_entry(field: &str, value: &Value) -> Option<FormError> {
    match value {
        Value::String(message) => Some(FormError::new(field, message)),
        Value::Object(entry) => {
            let message = entry.get("message")?.as_str()?;
            let mut form_error = FormError::new(field, message);
            if let Some(code) = entry.get("code").and_then(Value::as_str) {
                form_error = form_error.with_code(code);
            }
            if let Some(rejected) = entry.get("value") {
                form_error = form_error.with_value(rejected.clone());
            }
            Some(form_error)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, StandardError};
    use serde_json::json;

    fn validation_error(details: Value) -> StandardError {
        StandardError::new(ErrorKind::Validation, "validation failed").with_details(details)
    }

    #[test]
    fn ordered_list_details_map_to_field_errors() {
        let mut form = FormErrors::new();
        form.handle_validation_error(&validation_error(json!([
            { "field": "email", "message": "Invalid email" }
        ])));

        let err = form.get("email").expect("email error recorded");
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email");
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.value, None);
    }

    #[test]
    fn list_records_keep_explicit_code_and_value() {
        let mut form = FormErrors::new();
        form.handle_validation_error(&validation_error(json!([
            { "field": "age", "message": "Too young", "code": "MIN_AGE", "value": 12 }
        ])));

        let err = form.get("age").expect("age error recorded");
        assert_eq!(err.code, "MIN_AGE");
        assert_eq!(err.value, Some(json!(12)));
    }

    #[test]
    fn field_keyed_string_shorthand_is_accepted() {
        let mut form = FormErrors::new();
        form.handle_validation_error(&validation_error(json!({
            "username": "Already taken"
        })));

        assert_eq!(
            form.get("username").map(|e| e.message.as_str()),
            Some("Already taken")
        );
    }

    #[test]
    fn field_keyed_object_form_is_accepted() {
        let mut form = FormErrors::new();
        form.handle_validation_error(&validation_error(json!({
            "password": { "message": "Too short", "code": "MIN_LENGTH", "value": "abc" }
        })));

        let err = form.get("password").expect("password error recorded");
        assert_eq!(err.message, "Too short");
        assert_eq!(err.code, "MIN_LENGTH");
        assert_eq!(err.value, Some(json!("abc")));
    }

    #[test]
    fn non_conforming_details_are_ignored() {
        let mut form = FormErrors::new();

        form.handle_validation_error(&validation_error(json!("not a shape we know")));
        form.handle_validation_error(&validation_error(json!(42)));
        form.handle_validation_error(&validation_error(json!({ "retry_after": 60 })));
        form.handle_validation_error(&validation_error(json!([{ "message": "no field" }, 7])));

        let no_details = StandardError::new(ErrorKind::Validation, "bare");
        form.handle_validation_error(&no_details);

        assert!(form.is_valid());
        assert!(!form.has_errors());
    }

    #[test]
    fn conforming_records_survive_mixed_lists() {
        let mut form = FormErrors::new();
        form.handle_validation_error(&validation_error(json!([
            { "field": "email", "message": "Invalid email" },
            { "message": "missing field key" },
            "not an object"
        ])));

        assert_eq!(form.len(), 1);
        assert!(form.get("email").is_some());
    }

    #[test]
    fn set_field_error_upserts() {
        let mut form = FormErrors::new();
        form.set_field_error("email", "Required");
        form.set_field_error("email", "Invalid email");

        assert_eq!(form.len(), 1);
        assert_eq!(
            form.get("email").map(|e| e.message.as_str()),
            Some("Invalid email")
        );
    }

    #[test]
    fn clear_semantics() {
        let mut form = FormErrors::new();
        form.set_field_error("email", "Required");
        form.set_field_error("name", "Required");
        assert!(form.has_errors());

        let removed = form.clear_field_error("email");
        assert_eq!(removed.map(|e| e.field), Some("email".to_string()));
        assert_eq!(form.len(), 1);

        form.clear_all();
        assert!(form.is_valid());
        assert!(form.get("name").is_none());
    }

    #[test]
    fn validity_is_derived_from_map_emptiness() {
        let mut form = FormErrors::new();
        assert!(form.is_valid());
        form.set_field_error("email", "Required");
        assert!(!form.is_valid());
        form.clear_all();
        assert!(form.is_valid());
    }
}
