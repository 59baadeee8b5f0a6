//! Input validation utilities
//!
//! Request shape is validated before any store call; failures map to a 400
//! response through [`ApiError::Validation`].

use mongodb::bson::{Document, oid::ObjectId};
use regex::Regex;
use std::sync::OnceLock;

use crate::{error::ApiError, models::number_field};

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }

    if email.len() > 254 {
        return Err(ApiError::Validation(
            "Email must be at most 254 characters long".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Validate a price is a positive, finite amount
pub fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() {
        return Err(ApiError::Validation("Price must be a number".to_string()));
    }

    if price <= 0.0 {
        return Err(ApiError::Validation("Price must be positive".to_string()));
    }

    Ok(())
}

/// Validate a document's price field when present
pub fn validate_price_field(doc: &Document, key: &str) -> Result<(), ApiError> {
    if !doc.contains_key(key) {
        return Ok(());
    }

    let price = number_field(doc, key)
        .ok_or_else(|| ApiError::Validation("Price must be a number".to_string()))?;

    validate_price(price)
}

/// Parse an identifier path/body parameter into an ObjectId
pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|_| ApiError::Validation(format!("Invalid identifier: {}", id)))
}
