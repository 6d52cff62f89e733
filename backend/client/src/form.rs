use std::collections::{BTreeMap, BTreeSet};

use catalog::{FieldError, ProductPayload};
use serde_json::Value;

use crate::error::ClientError;

/// Error key for messages that belong to the whole form rather than one field.
pub const SUBMIT_KEY: &str = "submit";
pub const SUBMIT_FAILED_TEXT: &str = "Failed to add product. Please try again.";

/// The add-product form. Quantity is kept as typed text until submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub categories: BTreeSet<String>,
    pub errors: BTreeMap<String, String>,
    pub submitting: bool,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: &str) {
        self.name = value.to_string();
        self.errors.remove("name");
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
        self.errors.remove("description");
    }

    pub fn set_quantity(&mut self, value: &str) {
        self.quantity = value.to_string();
        self.errors.remove("quantity");
    }

    pub fn toggle_category(&mut self, id: &str) {
        if !self.categories.remove(id) {
            self.categories.insert(id.to_string());
        }
        self.errors.remove("categories");
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Body as it would be sent. Quantity goes out as a number when it reads as one.
    pub fn payload(&self) -> ProductPayload {
        let quantity = self.quantity.trim();
        let quantity = match quantity.parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(quantity.to_string()),
        };

        let mut payload = ProductPayload::default();
        payload.name = Some(self.name.clone());
        payload.description = Some(self.description.clone());
        payload.quantity = Some(quantity);
        payload.categories = Some(self.categories.iter().cloned().collect());
        payload
    }

    /// Runs the creation rules locally. On failure the errors are recorded and nothing is returned.
    pub fn validate(&mut self) -> Option<ProductPayload> {
        let payload = self.payload();
        match payload.clone().into_new_product() {
            Ok(_) => {
                self.errors.clear();
                Some(payload.normalized())
            }
            Err(errors) => {
                self.record(&errors);
                None
            }
        }
    }

    /// Takes over what the server said about a failed submission.
    pub fn absorb(&mut self, error: &ClientError) {
        self.submitting = false;
        self.errors.clear();

        match error {
            ClientError::Rejected { errors, .. } if !errors.is_empty() => self.record(errors),
            ClientError::Rejected { message, .. } => {
                self.errors.insert(SUBMIT_KEY.to_string(), message.clone());
            }
            _ => {
                self.errors
                    .insert(SUBMIT_KEY.to_string(), SUBMIT_FAILED_TEXT.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, errors: &[FieldError]) {
        self.errors.clear();
        for error in errors {
            self.errors
                .entry(error.field.clone())
                .or_insert_with(|| error.message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        let mut form = ProductForm::new();
        form.set_name("  Desk Lamp ");
        form.set_description("Warm light for late reading");
        form.set_quantity("4");
        form.toggle_category("home");
        form
    }

    #[test]
    fn test_valid_form_builds_trimmed_payload() {
        let mut form = filled();
        let payload = form.validate().expect("valid form");

        assert_eq!(payload.name.as_deref(), Some("Desk Lamp"));
        assert_eq!(payload.quantity, Some(Value::from(4u64)));
        assert_eq!(payload.categories, Some(vec!["home".to_string()]));
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let mut form = ProductForm::new();
        assert!(form.validate().is_none());

        assert_eq!(form.error("name"), Some("Product name is required"));
        assert_eq!(form.error("description"), Some("Description is required"));
        assert_eq!(form.error("quantity"), Some("Quantity is required"));
        assert_eq!(form.error("categories"), Some("At least one category is required"));
    }

    #[test]
    fn test_bad_quantity_and_editing_clears_error() {
        let mut form = filled();
        form.set_quantity("-2");
        assert!(form.validate().is_none());
        assert_eq!(
            form.error("quantity"),
            Some("Quantity must be a non-negative number")
        );

        form.set_quantity("2");
        assert!(form.error("quantity").is_none());
    }

    #[test]
    fn test_toggle_category_twice_removes_it() {
        let mut form = filled();
        form.toggle_category("home");
        assert!(form.categories.is_empty());
        assert!(form.validate().is_none());
        assert!(form.error("categories").is_some());
    }

    #[test]
    fn test_absorb_server_errors() {
        let mut form = filled();
        form.absorb(&ClientError::Rejected {
            status: 400,
            message: "Validation failed".to_string(),
            errors: vec![FieldError::new("name", "Name taken")],
        });
        assert_eq!(form.error("name"), Some("Name taken"));
        assert!(form.error(SUBMIT_KEY).is_none());

        form.absorb(&ClientError::Rejected {
            status: 400,
            message: "A product with this name already exists".to_string(),
            errors: Vec::new(),
        });
        assert_eq!(
            form.error(SUBMIT_KEY),
            Some("A product with this name already exists")
        );

        form.absorb(&ClientError::MissingData);
        assert_eq!(form.error(SUBMIT_KEY), Some(SUBMIT_FAILED_TEXT));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = filled();
        form.errors.insert("name".to_string(), "x".to_string());
        form.reset();
        assert_eq!(form, ProductForm::default());
    }
}
