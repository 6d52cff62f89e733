//! # Product payloads
//!
//! Inbound product bodies and the field rules applied to them.
//!
//! - name: required, trimmed, 3 to 100 characters
//! - description: required, trimmed, 10 to 1000 characters
//! - quantity: required, integer, at least 0 (JSON integer or digit string)
//! - categories: required, at least one id
//!
//! Creation checks every rule. Updates check only the fields that are present.
//! All failing fields are reported together, in the order above. A field sent with the
//! wrong JSON type is reported as that field's error rather than rejecting the body.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::envelope::FieldError;

const FIELDS: [&str; 4] = ["name", "description", "quantity", "categories"];

/// Raw body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePayload")]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip)]
    mistyped: Vec<&'static str>,
}

/// Body fields as received, before any type is assumed.
#[derive(Deserialize)]
struct WirePayload {
    name: Option<Value>,
    description: Option<Value>,
    quantity: Option<Value>,
    categories: Option<Value>,
}

impl From<WirePayload> for ProductPayload {
    fn from(wire: WirePayload) -> Self {
        let mut mistyped = Vec::new();

        Self {
            name: text(wire.name, "name", &mut mistyped),
            description: text(wire.description, "description", &mut mistyped),
            quantity: wire.quantity,
            categories: ids(wire.categories, &mut mistyped),
            mistyped,
        }
    }
}

fn text(value: Option<Value>, field: &'static str, mistyped: &mut Vec<&'static str>) -> Option<String> {
    match value {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            mistyped.push(field);
            None
        }
    }
}

fn ids(value: Option<Value>, mistyped: &mut Vec<&'static str>) -> Option<Vec<String>> {
    let ids = match value {
        None => return None,
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect::<Option<Vec<_>>>(),
        Some(_) => None,
    };

    if ids.is_none() {
        mistyped.push("categories");
    }
    ids
}

#[derive(Debug, Validate)]
struct CreateRules {
    #[validate(
        required(message = "Product name is required"),
        length(min = 3, max = 100, message = "Product name must be between 3 and 100 characters")
    )]
    name: Option<String>,

    #[validate(
        required(message = "Description is required"),
        length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters")
    )]
    description: Option<String>,

    #[validate(required(message = "Quantity is required"), custom = "validate_quantity")]
    quantity: Option<Value>,

    #[validate(
        required(message = "At least one category is required"),
        length(min = 1, message = "At least one category is required")
    )]
    categories: Option<Vec<String>>,
}

#[derive(Debug, Validate)]
struct PatchRules {
    #[validate(length(min = 3, max = 100, message = "Product name must be between 3 and 100 characters"))]
    name: Option<String>,

    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    description: Option<String>,

    #[validate(custom = "validate_quantity")]
    quantity: Option<Value>,

    #[validate(length(min = 1, message = "At least one category is required"))]
    categories: Option<Vec<String>>,
}

/// A fully validated product ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub quantity: u64,
    pub categories: Vec<String>,
}

/// Validated partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u64>,
    pub categories: Option<Vec<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.categories.is_none()
    }
}

impl ProductPayload {
    pub fn new(name: &str, description: &str, quantity: u64, categories: Vec<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            quantity: Some(Value::from(quantity)),
            categories: Some(categories),
            mistyped: Vec::new(),
        }
    }

    /// Trims text fields. Blank text and JSON null count as absent.
    pub fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            description: trimmed(self.description),
            quantity: self.quantity.filter(|q| !q.is_null()),
            categories: self.categories,
            mistyped: self.mistyped,
        }
    }

    pub fn into_new_product(self) -> Result<NewProduct, Vec<FieldError>> {
        let payload = self.normalized();
        let rules = CreateRules {
            name: payload.name,
            description: payload.description,
            quantity: payload.quantity,
            categories: payload.categories,
        };
        check(rules.validate(), &payload.mistyped)?;

        let quantity = rules.quantity.as_ref().and_then(parse_quantity);
        let (Some(name), Some(description), Some(quantity), Some(categories)) =
            (rules.name, rules.description, quantity, rules.categories)
        else {
            return Err(vec![FieldError::new("body", "Validation failed")]);
        };

        Ok(NewProduct {
            name,
            description,
            quantity,
            categories,
        })
    }

    pub fn into_patch(self) -> Result<ProductPatch, Vec<FieldError>> {
        let payload = self.normalized();
        let rules = PatchRules {
            name: payload.name,
            description: payload.description,
            quantity: payload.quantity,
            categories: payload.categories,
        };
        check(rules.validate(), &payload.mistyped)?;

        Ok(ProductPatch {
            quantity: rules.quantity.as_ref().and_then(parse_quantity),
            name: rules.name,
            description: rules.description,
            categories: rules.categories,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts non-negative JSON integers and strings holding one.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn validate_quantity(value: &Value) -> Result<(), ValidationError> {
    if parse_quantity(value).is_some() {
        return Ok(());
    }

    let message = match value {
        Value::String(s) if s.trim().is_empty() => "Quantity is required",
        _ => "Quantity must be a non-negative number",
    };

    let mut error = ValidationError::new("quantity");
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}

fn check(result: Result<(), ValidationErrors>, mistyped: &[&'static str]) -> Result<(), Vec<FieldError>> {
    let errors = field_errors(result.as_ref().err(), mistyped);
    if errors.is_empty() {
        return Ok(());
    }

    Err(errors)
}

fn field_errors(errors: Option<&ValidationErrors>, mistyped: &[&'static str]) -> Vec<FieldError> {
    let by_field = errors.map(ValidationErrors::field_errors).unwrap_or_default();

    FIELDS
        .iter()
        .flat_map(|field| {
            if mistyped.contains(field) {
                return vec![FieldError::new(*field, type_message(field))];
            }

            by_field
                .get(field)
                .map(|list| {
                    list.iter()
                        .map(|error| {
                            let message = error
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| error.code.to_string());
                            FieldError::new(*field, message)
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

fn type_message(field: &str) -> &'static str {
    match field {
        "name" => "Product name must be between 3 and 100 characters",
        "description" => "Description must be between 10 and 1000 characters",
        _ => "At least one category is required",
    }
}
