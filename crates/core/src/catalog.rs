//! Catalog integrity rules: slug format, uniqueness guards, the category
//! delete guard, and id assignment for fixture registries.
//!
//! The datastore does not enforce the category -> product reference, so
//! callers check it here before deleting.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum slug length for categories.
pub const MAX_CATEGORY_SLUG_LEN: usize = 100;

/// Maximum slug length for products.
pub const MAX_PRODUCT_SLUG_LEN: usize = 200;

/// Validate that a slug is non-empty, URL-safe and within `max_len`.
///
/// URL-safe means ASCII letters, digits, `-` and `_`. Case is preserved;
/// uniqueness checks compare slugs case-sensitively.
pub fn validate_slug(slug: &str, max_len: usize) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("slug must not be empty".to_string()));
    }
    if slug.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "slug must be at most {max_len} characters"
        )));
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::Validation(format!(
            "slug '{slug}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Reject a unique value (slug, SKU) already held by a different row.
///
/// `holder` is the id of the row currently using `value`, if any; `self_id`
/// is the row being written (`None` on create). A row keeping its own value
/// is not a conflict.
pub fn ensure_unique(
    entity: &str,
    field: &str,
    value: &str,
    holder: Option<DbId>,
    self_id: Option<DbId>,
) -> Result<(), CoreError> {
    match holder {
        Some(existing) if Some(existing) != self_id => Err(CoreError::Conflict(format!(
            "a {entity} with {field} '{value}' already exists"
        ))),
        _ => Ok(()),
    }
}

/// Refuse to delete a category that products still reference.
pub fn ensure_category_unreferenced(category_id: DbId, product_count: i64) -> Result<(), CoreError> {
    if product_count > 0 {
        return Err(CoreError::Conflict(format!(
            "category {category_id} still has {product_count} associated product(s)"
        )));
    }
    Ok(())
}

/// Next id for a fixture registry: `max(existing) + 1`, or `1` when empty.
pub fn next_id<I>(existing: I) -> DbId
where
    I: IntoIterator<Item = DbId>,
{
    existing.into_iter().max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- validate_slug ---------------------------------------------------------

    #[test]
    fn accepts_url_safe_slugs() {
        assert!(validate_slug("granola-premium", MAX_PRODUCT_SLUG_LEN).is_ok());
        assert!(validate_slug("Pan_Integral-2", MAX_PRODUCT_SLUG_LEN).is_ok());
    }

    #[test]
    fn rejects_empty_slug() {
        assert!(validate_slug("", MAX_CATEGORY_SLUG_LEN).is_err());
    }

    #[test]
    fn rejects_slug_with_spaces_or_slashes() {
        assert!(validate_slug("pan integral", MAX_CATEGORY_SLUG_LEN).is_err());
        assert!(validate_slug("pan/integral", MAX_CATEGORY_SLUG_LEN).is_err());
    }

    #[test]
    fn rejects_overlong_slug() {
        let slug = "a".repeat(MAX_CATEGORY_SLUG_LEN + 1);
        assert!(validate_slug(&slug, MAX_CATEGORY_SLUG_LEN).is_err());
        let slug = "a".repeat(MAX_CATEGORY_SLUG_LEN);
        assert!(validate_slug(&slug, MAX_CATEGORY_SLUG_LEN).is_ok());
    }

    // -- ensure_unique ---------------------------------------------------------

    #[test]
    fn unused_value_is_free() {
        assert!(ensure_unique("category", "slug", "bakery", None, None).is_ok());
    }

    #[test]
    fn value_held_by_other_row_conflicts() {
        assert_matches!(
            ensure_unique("category", "slug", "bakery", Some(7), None),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            ensure_unique("category", "slug", "bakery", Some(7), Some(8)),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn row_keeping_its_own_value_is_not_a_conflict() {
        assert!(ensure_unique("category", "slug", "bakery", Some(7), Some(7)).is_ok());
    }

    // -- ensure_category_unreferenced -----------------------------------------

    #[test]
    fn category_without_products_can_be_deleted() {
        assert!(ensure_category_unreferenced(1, 0).is_ok());
    }

    #[test]
    fn category_with_products_cannot_be_deleted() {
        assert_matches!(
            ensure_category_unreferenced(1, 3),
            Err(CoreError::Conflict(msg)) if msg.contains("3 associated")
        );
    }

    // -- next_id ---------------------------------------------------------------

    #[test]
    fn next_id_of_empty_registry_is_one() {
        assert_eq!(next_id(Vec::<DbId>::new()), 1);
    }

    #[test]
    fn next_id_follows_the_maximum() {
        assert_eq!(next_id([1, 2]), 3);
        assert_eq!(next_id([5, 2, 9, 4]), 10);
    }
}
