//! # Product search
//!
//! Filtering, ordering and windowing of product listings.
//!
//!
//!
//! ## Filter
//! - Name: case-insensitive substring match on the trimmed search text, literal (no pattern syntax)
//! - Categories: product matches when it references **any** of the requested ids
//! - Both present: both must hold
//!
//!
//!
//! ## Ordering
//! Newest first by `createdAt`. Ties fall back to descending id so a listing is stable
//! between requests.
use std::cmp::Ordering;

use catalog::{Product, ProductQuery};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    needle: Option<String>,
    categories: Vec<String>,
}

impl ProductFilter {
    pub fn new(search: &str, categories: &[String]) -> Self {
        let search = search.trim();

        Self {
            needle: (!search.is_empty()).then(|| search.to_lowercase()),
            categories: categories.to_vec(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = self
            .needle
            .as_ref()
            .is_none_or(|needle| product.name.to_lowercase().contains(needle));

        let categories_ok = self.categories.is_empty()
            || product
                .categories
                .iter()
                .any(|id| self.categories.contains(id));

        name_ok && categories_ok
    }
}

impl From<&ProductQuery> for ProductFilter {
    fn from(query: &ProductQuery) -> Self {
        Self::new(&query.search, &query.categories)
    }
}

/// Skip/limit pair applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

impl Window {
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: u64::MAX,
        }
    }
}

pub fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Filters, orders and windows a full scan of the product collection.
pub fn select<I>(products: I, filter: &ProductFilter, window: Window) -> Vec<Product>
where
    I: IntoIterator<Item = Product>,
{
    let mut matching: Vec<Product> = products
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect();

    matching.sort_by(newest_first);

    matching
        .into_iter()
        .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn product(id: &str, name: &str, categories: &[&str], minutes: i64) -> Product {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);

        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "Something long enough".to_string(),
            quantity: 1,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn fixture() -> Vec<Product> {
        vec![
            product("1", "World Atlas", &["books"], 1),
            product("2", "Atlas Robot", &["toys"], 2),
            product("3", "Chess Set", &["toys", "sports"], 3),
            product("4", "Road atlas", &["books", "sports"], 4),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = ProductFilter::new("  ATLAS ", &[]);
        let found = select(fixture(), &filter, Window::all());

        assert_eq!(ids(&found), ["4", "2", "1"]);
    }

    #[test]
    fn test_search_is_literal() {
        let filter = ProductFilter::new("a.las", &[]);

        assert!(select(fixture(), &filter, Window::all()).is_empty());
    }

    #[test]
    fn test_category_filter_intersects() {
        let filter = ProductFilter::new("", &["sports".to_string(), "books".to_string()]);
        let found = select(fixture(), &filter, Window::all());

        assert_eq!(ids(&found), ["4", "3", "1"]);
    }

    #[test]
    fn test_search_and_categories_compose() {
        let filter = ProductFilter::new("atlas", &["toys".to_string()]);
        let found = select(fixture(), &filter, Window::all());

        assert_eq!(ids(&found), ["2"]);
    }

    #[test]
    fn test_window_slices_after_ordering() {
        let found = select(fixture(), &ProductFilter::default(), Window { skip: 1, limit: 2 });

        assert_eq!(ids(&found), ["3", "2"]);
    }
}
