//! Storefront product model: the fixed product-line catalog served under
//! `/api/productos`, backed by a seeded in-memory registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;
use dulpromax_core::error::CoreError;
use dulpromax_core::pricing::{validate_price, SegmentPrices};
use dulpromax_core::types::DbId;
use dulpromax_core::validation::validate_input;

/// Fixed product lines of the storefront catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductLine {
    HealthyConfections,
    Bakery,
    CerealsGranolas,
    CerealBars,
    DietSweets,
}

impl ProductLine {
    pub const ALL: [ProductLine; 5] = [
        ProductLine::HealthyConfections,
        ProductLine::Bakery,
        ProductLine::CerealsGranolas,
        ProductLine::CerealBars,
        ProductLine::DietSweets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductLine::HealthyConfections => "healthy-confections",
            ProductLine::Bakery => "bakery",
            ProductLine::CerealsGranolas => "cereals-granolas",
            ProductLine::CerealBars => "cereal-bars",
            ProductLine::DietSweets => "diet-sweets",
        }
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductLine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductLine::ALL
            .into_iter()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown product line '{s}'")))
    }
}

/// A storefront product with its four derived segment prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontProduct {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub product_line: ProductLine,
    pub base_price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub price_health_store: f64,
    pub price_distributor: f64,
    pub price_gym: f64,
    pub price_cafeteria: f64,
}

impl StorefrontProduct {
    /// Assemble a product, storing the given segment prices.
    pub fn priced(id: DbId, input: &CreateStorefrontProduct, prices: SegmentPrices) -> Self {
        Self {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            product_line: input.product_line,
            base_price: input.base_price,
            stock: input.stock,
            image_url: input.image_url.clone(),
            is_active: true,
            price_health_store: prices.health_store,
            price_distributor: prices.distributor,
            price_gym: prices.gym,
            price_cafeteria: prices.cafeteria,
        }
    }
}

/// DTO for adding a storefront product. Segment prices are always derived.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStorefrontProduct {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: String,
    pub product_line: ProductLine,
    pub base_price: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: i32,
    pub image_url: Option<String>,
}

impl CreateStorefrontProduct {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        validate_price("base_price", self.base_price)
    }
}

/// DTO for updating a storefront product. All fields are optional; stored
/// segment prices are never recomputed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStorefrontProduct {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_line: Option<ProductLine>,
    pub base_price: Option<f64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateStorefrontProduct {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        match self.base_price {
            Some(price) => validate_price("base_price", price),
            None => Ok(()),
        }
    }
}
