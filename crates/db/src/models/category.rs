//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use dulpromax_core::catalog::{validate_slug, MAX_CATEGORY_SLUG_LEN};
use dulpromax_core::error::CoreError;
use dulpromax_core::types::{DbId, Timestamp};
use dulpromax_core::validation::validate_input;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The slice of a category embedded in product reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

impl CreateCategory {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        validate_slug(&self.slug, MAX_CATEGORY_SLUG_LEN)
    }
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCategory {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        match &self.slug {
            Some(slug) => validate_slug(slug, MAX_CATEGORY_SLUG_LEN),
            None => Ok(()),
        }
    }
}
