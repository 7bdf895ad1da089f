//! Product listing filters.
//!
//! A [`ProductFilter`] is evaluated two ways: the PostgreSQL store translates
//! it into a `WHERE` clause, the in-memory store calls
//! [`ProductFilter::matches`] on each row. Filters combine with AND; the free
//! text search is the only OR (name OR description).

use crate::error::CoreError;
use crate::types::DbId;

/// Listing filters for catalog products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<DbId>,
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    pub active_only: bool,
    pub featured_only: bool,
    /// Lower bound on the distributor price (inclusive).
    pub min_price: Option<f64>,
    /// Upper bound on the distributor price (inclusive).
    pub max_price: Option<f64>,
}

/// The fields of a product that filters look at.
#[derive(Debug, Clone, Copy)]
pub struct ProductFacts<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: Option<DbId>,
    pub is_active: bool,
    pub is_featured: bool,
    pub price_distributor: f64,
}

impl ProductFilter {
    /// Normalize and validate a filter built from query parameters.
    ///
    /// Blank search strings are dropped. Price bounds must be finite and
    /// non-negative.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(CoreError::Validation(format!(
                        "{field} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        Ok(self)
    }

    /// Whether a product passes every filter.
    pub fn matches(&self, product: &ProductFacts<'_>) -> bool {
        if self.active_only && !product.is_active {
            return false;
        }
        if self.featured_only && !product.is_featured {
            return false;
        }
        if let Some(category_id) = self.category_id {
            if product.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let in_name = contains_ignore_case(product.name, search);
            let in_description = product
                .description
                .is_some_and(|d| contains_ignore_case(d, search));
            if !in_name && !in_description {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price_distributor < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price_distributor > max {
                return false;
            }
        }
        true
    }

    /// `ILIKE` pattern for the search term, with SQL wildcards escaped.
    ///
    /// Returns `None` when the filter has no search term.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for c in term.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granola() -> ProductFacts<'static> {
        ProductFacts {
            name: "Granola Premium",
            description: Some("Homemade granola with nuts and pure honey"),
            category_id: Some(3),
            is_active: true,
            is_featured: false,
            price_distributor: 9.0,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(filter.matches(&granola()));
        let inactive = ProductFacts {
            is_active: false,
            ..granola()
        };
        assert!(filter.matches(&inactive));
    }

    #[test]
    fn active_only_excludes_inactive() {
        let filter = ProductFilter {
            active_only: true,
            ..Default::default()
        };
        let inactive = ProductFacts {
            is_active: false,
            ..granola()
        };
        assert!(filter.matches(&granola()));
        assert!(!filter.matches(&inactive));
    }

    #[test]
    fn featured_only_excludes_regular_products() {
        let filter = ProductFilter {
            featured_only: true,
            ..Default::default()
        };
        assert!(!filter.matches(&granola()));
    }

    #[test]
    fn category_must_match_exactly() {
        let filter = ProductFilter {
            category_id: Some(4),
            ..Default::default()
        };
        assert!(!filter.matches(&granola()));
        let uncategorized = ProductFacts {
            category_id: None,
            ..granola()
        };
        assert!(!filter.matches(&uncategorized));
    }

    #[test]
    fn search_matches_name_or_description_case_insensitively() {
        let by_name = ProductFilter {
            search: Some("GRANOLA".into()),
            ..Default::default()
        };
        let by_description = ProductFilter {
            search: Some("honey".into()),
            ..Default::default()
        };
        let miss = ProductFilter {
            search: Some("quinoa".into()),
            ..Default::default()
        };
        assert!(by_name.matches(&granola()));
        assert!(by_description.matches(&granola()));
        assert!(!miss.matches(&granola()));
    }

    #[test]
    fn search_without_description_only_checks_name() {
        let filter = ProductFilter {
            search: Some("honey".into()),
            ..Default::default()
        };
        let bare = ProductFacts {
            description: None,
            ..granola()
        };
        assert!(!filter.matches(&bare));
    }

    #[test]
    fn price_bounds_are_inclusive_on_distributor_price() {
        let filter = ProductFilter {
            min_price: Some(9.0),
            max_price: Some(9.0),
            ..Default::default()
        };
        assert!(filter.matches(&granola()));

        let too_cheap = ProductFilter {
            min_price: Some(9.01),
            ..Default::default()
        };
        assert!(!too_cheap.matches(&granola()));
    }

    #[test]
    fn filters_combine_with_and() {
        let filter = ProductFilter {
            search: Some("granola".into()),
            featured_only: true,
            ..Default::default()
        };
        assert!(!filter.matches(&granola()));
    }

    #[test]
    fn validated_drops_blank_search() {
        let filter = ProductFilter {
            search: Some("   ".into()),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(filter.search, None);
    }

    #[test]
    fn validated_rejects_negative_bounds() {
        let filter = ProductFilter {
            min_price: Some(-1.0),
            ..Default::default()
        };
        assert!(filter.validated().is_err());

        let filter = ProductFilter {
            max_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(filter.validated().is_err());
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        let filter = ProductFilter {
            search: Some("50%_off".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(ProductFilter::default().search_pattern(), None);
    }
}
