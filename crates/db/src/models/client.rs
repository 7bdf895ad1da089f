//! B2B client model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;
use dulpromax_core::error::CoreError;
use dulpromax_core::pricing::Segment;
use dulpromax_core::types::DbId;
use dulpromax_core::validation::validate_input;

/// A B2B client.
///
/// `base_discount` is fixed from the segment when the client is created and
/// only changes when an update sets it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub segment: Segment,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub base_discount: f64,
}

/// DTO for registering a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub segment: Segment,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub phone: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
}

impl CreateClient {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)
    }
}

/// DTO for updating a client. All fields are optional.
///
/// Changing `segment` does not re-derive `base_discount`; set it explicitly.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub segment: Option<Segment>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: Option<String>,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    pub base_discount: Option<f64>,
}

impl UpdateClient {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)
    }
}
