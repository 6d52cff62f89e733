use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Query string of `GET /products` as sent over the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawProductQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub categories: Option<String>,
}

/// Parsed listing request: page window, name search and category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub categories: Vec<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            categories: Vec::new(),
        }
    }
}

impl ProductQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Query string pairs, omitting an empty search and an empty category list.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if !self.categories.is_empty() {
            pairs.push(("categories", self.categories.join(",")));
        }

        pairs
    }
}

impl From<RawProductQuery> for ProductQuery {
    fn from(raw: RawProductQuery) -> Self {
        Self {
            page: positive_or(raw.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(raw.limit.as_deref(), DEFAULT_LIMIT),
            search: raw.search.map(|s| s.trim().to_string()).unwrap_or_default(),
            categories: raw
                .categories
                .map(|ids| split_ids(&ids))
                .unwrap_or_default(),
        }
    }
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_and_invalid() {
        let query = ProductQuery::from(RawProductQuery {
            page: Some("0".into()),
            limit: Some("ten".into()),
            ..Default::default()
        });

        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let query = ProductQuery::from(RawProductQuery {
            page: Some("3".into()),
            limit: Some("5".into()),
            search: Some("  atlas ".into()),
            categories: Some("a,,b, c".into()),
        });

        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 5);
        assert_eq!(query.search, "atlas");
        assert_eq!(query.categories, ["a", "b", "c"]);
    }

    #[test]
    fn test_pairs_skip_empty_filters() {
        let pairs = ProductQuery::page(2).to_pairs();
        assert_eq!(pairs, [("page", "2".to_string()), ("limit", "10".to_string())]);

        let query = ProductQuery {
            search: "map".into(),
            categories: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert!(query.to_pairs().contains(&("categories", "a,b".to_string())));
    }
}
