//! Per-field validation errors and the small checks the forms share.

use std::collections::BTreeMap;

/// Validation failures keyed by form field name.
///
/// Views render each message inline next to its field. The `Display` output is
/// the first message, which is what a toast shows when a form has no inline
/// slot for the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error recorded for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn summary(&self) -> String {
        self.errors
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Invalid form".to_string())
    }

    pub fn required(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    pub fn required_opt<T>(&mut self, field: &str, value: &Option<T>, label: &str) {
        if value.is_none() {
            self.add(field, format!("{label} is required"));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, "Email is required");
        } else if !is_email(value) {
            self.add(field, "Please enter a valid email");
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, label: &str) {
        if value.chars().count() < min {
            self.add(field, format!("{label} must be at least {min} characters"));
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for FieldErrors {}

/// A deliberately loose shape check; the backend owns real validation.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.required("username", "  ", "Username");
        errors.min_len("username", "", 4, "Username");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(errors.to_string(), "Username is required");
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("ada@example.com"));
        assert!(!is_email("ada@example"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("ada @example.com"));

        let mut errors = FieldErrors::new();
        errors.email("email", "nope");
        assert_eq!(errors.get("email"), Some("Please enter a valid email"));
    }

    #[test]
    fn empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
