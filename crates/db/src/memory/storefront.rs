use std::sync::RwLock;

use async_trait::async_trait;
use dulpromax_core::catalog::next_id;
use dulpromax_core::pricing::SegmentPrices;
use dulpromax_core::types::DbId;

use crate::error::{poisoned, StoreResult};
use crate::models::storefront::{
    CreateStorefrontProduct, ProductLine, StorefrontProduct, UpdateStorefrontProduct,
};
use crate::repositories::StorefrontRepository;

/// Storefront product registry held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStorefrontRepo {
    products: RwLock<Vec<StorefrontProduct>>,
}

impl InMemoryStorefrontRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four products the storefront opens with. Their segment prices are
    /// the discount table applied to each base price.
    pub fn seeded() -> Self {
        let seeds = [
            (
                "Quinoa Confections",
                "Healthy quinoa bites sweetened with panela",
                ProductLine::HealthyConfections,
                15.50,
                SegmentPrices {
                    health_store: 13.18,
                    distributor: 11.63,
                    gym: 13.64,
                    cafeteria: 13.95,
                },
                100,
                "/images/confites-quinoa.jpg",
            ),
            (
                "Multigrain Whole Wheat Bread",
                "Whole wheat bread with seeds and ancient grains",
                ProductLine::Bakery,
                8.99,
                SegmentPrices {
                    health_store: 7.64,
                    distributor: 6.74,
                    gym: 7.91,
                    cafeteria: 8.09,
                },
                50,
                "/images/pan-multicereal.jpg",
            ),
            (
                "Premium Granola",
                "Homemade granola with nuts and pure honey",
                ProductLine::CerealsGranolas,
                12.00,
                SegmentPrices {
                    health_store: 10.20,
                    distributor: 9.00,
                    gym: 10.56,
                    cafeteria: 10.80,
                },
                75,
                "/images/granola-premium.jpg",
            ),
            (
                "Protein Bars",
                "Cereal bars with whey protein and dried fruit",
                ProductLine::CerealBars,
                18.50,
                SegmentPrices {
                    health_store: 15.73,
                    distributor: 13.88,
                    gym: 16.28,
                    cafeteria: 16.65,
                },
                120,
                "/images/barras-proteicas.jpg",
            ),
        ];

        let products = seeds
            .into_iter()
            .zip(1..)
            .map(|((name, description, line, base_price, prices, stock, image), id)| {
                let input = CreateStorefrontProduct {
                    name: name.into(),
                    description: description.into(),
                    product_line: line,
                    base_price,
                    stock,
                    image_url: Some(image.into()),
                };
                StorefrontProduct::priced(id, &input, prices)
            })
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl StorefrontRepository for InMemoryStorefrontRepo {
    async fn list(&self, line: Option<ProductLine>) -> StoreResult<Vec<StorefrontProduct>> {
        let products = self.products.read().map_err(|_| poisoned("storefront"))?;
        Ok(products
            .iter()
            .filter(|p| line.map_or(true, |line| p.product_line == line))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<StorefrontProduct>> {
        let products = self.products.read().map_err(|_| poisoned("storefront"))?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(
        &self,
        input: &CreateStorefrontProduct,
        prices: SegmentPrices,
    ) -> StoreResult<StorefrontProduct> {
        let mut products = self.products.write().map_err(|_| poisoned("storefront"))?;
        let id = next_id(products.iter().map(|p| p.id));
        let product = StorefrontProduct::priced(id, input, prices);
        products.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateStorefrontProduct,
    ) -> StoreResult<Option<StorefrontProduct>> {
        let mut products = self.products.write().map_err(|_| poisoned("storefront"))?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            product.name = name.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(line) = input.product_line {
            product.product_line = line;
        }
        if let Some(base_price) = input.base_price {
            product.base_price = base_price;
        }
        if let Some(stock) = input.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &input.image_url {
            product.image_url = Some(image_url.clone());
        }
        if let Some(is_active) = input.is_active {
            product.is_active = is_active;
        }
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut products = self.products.write().map_err(|_| poisoned("storefront"))?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}
