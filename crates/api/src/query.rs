//! Query parameter types for API handlers.

use serde::Deserialize;
use dulpromax_core::error::CoreError;
use dulpromax_core::pagination::PageRequest;
use dulpromax_core::product_filter::ProductFilter;
use dulpromax_core::types::DbId;

fn default_true() -> bool {
    true
}

/// `?active_only=` for category listing; defaults to `true`.
#[derive(Debug, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default = "default_true")]
    pub active_only: bool,
}

/// Query parameters of `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category_id: Option<DbId>,
    pub search: Option<String>,
    #[serde(default = "default_true")]
    pub active_only: bool,
    #[serde(default)]
    pub featured_only: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductListParams {
    /// Split into a validated filter and page request.
    pub fn into_parts(self) -> Result<(ProductFilter, PageRequest), CoreError> {
        let page = PageRequest::new(self.page, self.per_page)?;
        let filter = ProductFilter {
            category_id: self.category_id,
            search: self.search,
            active_only: self.active_only,
            featured_only: self.featured_only,
            min_price: self.min_price,
            max_price: self.max_price,
        }
        .validated()?;
        Ok((filter, page))
    }
}

/// `?new_stock=` for `PATCH /products/{id}/stock`.
#[derive(Debug, Deserialize)]
pub struct StockParams {
    pub new_stock: i32,
}

/// `?categoria=` for storefront listing.
#[derive(Debug, Deserialize)]
pub struct StorefrontParams {
    pub categoria: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ProductListParams {
        ProductListParams {
            page: None,
            per_page: None,
            category_id: None,
            search: None,
            active_only: true,
            featured_only: false,
            min_price: None,
            max_price: None,
        }
    }

    #[test]
    fn defaults_give_first_page_of_active_products() {
        let (filter, page) = params().into_parts().unwrap();
        assert!(filter.active_only);
        assert!(!filter.featured_only);
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn oversized_page_is_rejected() {
        let input = ProductListParams {
            per_page: Some(500),
            ..params()
        };
        assert!(input.into_parts().is_err());
    }
}
