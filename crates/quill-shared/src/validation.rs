//! Field-level validation of submitted post forms.

use serde::{Deserialize, Serialize};

use crate::dto::PostForm;

/// Longest accepted title, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A post form that passed validation. Both fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub content: String,
}

impl PostForm {
    /// Trim both fields and check them, reporting every failing field.
    pub fn validate(self) -> Result<ValidPost, Vec<FieldError>> {
        let title = self.title.trim();
        let content = self.content.trim();
        let mut errors = Vec::new();

        if title.is_empty() {
            errors.push(FieldError::new("title", "The title field is required."));
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("The title may not be greater than {TITLE_MAX_CHARS} characters."),
            ));
        }

        if content.is_empty() {
            errors.push(FieldError::new("content", "The content field is required."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidPost {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str) -> PostForm {
        PostForm {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let valid = form("  Hello ", "\tWorld\n").validate().unwrap();
        assert_eq!(valid.title, "Hello");
        assert_eq!(valid.content, "World");
    }

    #[test]
    fn test_blank_fields_are_reported_per_field() {
        let errors = form("   ", "").validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content"]);
    }

    #[test]
    fn test_title_length_limit() {
        assert!(form(&"t".repeat(TITLE_MAX_CHARS), "c").validate().is_ok());

        let errors = form(&"t".repeat(TITLE_MAX_CHARS + 1), "c")
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }
}
