use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Stored form of a product. `categories` holds [`Category`] ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u64,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response form of a product, with category ids resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u64,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    /// Resolves category ids against `lookup`, keeping the stored order.
    /// Ids with no matching category are dropped from the view.
    pub fn project(product: Product, lookup: &HashMap<String, Category>) -> Self {
        let categories = product
            .categories
            .iter()
            .filter_map(|id| lookup.get(id).cloned())
            .collect();

        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            quantity: product.quantity,
            categories,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }

    pub fn category_ids(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} things"),
        }
    }

    #[test]
    fn test_project_keeps_order_and_drops_dangling() {
        let now = Utc::now();
        let product = Product {
            id: "p1".to_string(),
            name: "Atlas".to_string(),
            description: "A large reference map book".to_string(),
            quantity: 5,
            categories: vec!["c2".to_string(), "gone".to_string(), "c1".to_string()],
            created_at: now,
            updated_at: now,
        };

        let lookup = HashMap::from([
            ("c1".to_string(), category("c1", "Books")),
            ("c2".to_string(), category("c2", "Toys")),
        ]);

        let view = ProductView::project(product, &lookup);
        let names: Vec<_> = view.categories.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, ["Toys", "Books"]);
        assert_eq!(view.category_ids(), ["c2", "c1"]);
    }

    #[test]
    fn test_wire_field_names() {
        let now = Utc::now();
        let view = ProductView {
            id: "p1".to_string(),
            name: "Atlas".to_string(),
            description: "A large reference map book".to_string(),
            quantity: 5,
            categories: vec![category("c1", "Books")],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["_id"], "p1");
        assert_eq!(json["categories"][0]["_id"], "c1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
