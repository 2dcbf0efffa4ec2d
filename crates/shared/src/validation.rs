//! Common validation utilities used by request DTOs.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Content block keys and caller supplied ids: lowercase slug.
    static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Maximum length of a slug.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Validates a review rating (1 to 5 stars).
pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 1 and 5".into());
        Err(err)
    }
}

/// Validates a non-negative price in whole currency units.
pub fn validate_price(price: i32) -> Result<(), ValidationError> {
    if price >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("price_range");
        err.message = Some("Price cannot be negative".into());
        Err(err)
    }
}

/// Validates a lowercase slug such as `about-us` or `summer-2025`.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value.len() <= MAX_SLUG_LENGTH && SLUG_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Must be lowercase letters, digits and single dashes (max 64 chars)".into());
        Err(err)
    }
}

/// Validates that a string is not blank after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that an image or photo link is an absolute http(s) URL.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("url_scheme");
        err.message = Some("URL must start with http:// or https://".into());
        Err(err)
    }
}
