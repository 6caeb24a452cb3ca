//! Input validation for API requests.
//!
//! Each function checks one field and returns a human-readable message on
//! failure. Collect them with `ValidationErrorBuilder::check` from the
//! `error` module to report every bad field at once.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Usernames: letters, digits, underscore, dot and dash
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();

    /// Loose email check: something@something.tld
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    /// HTTP/HTTPS URLs for images
    static ref IMAGE_URL_REGEX: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
}

pub const MAX_MESSAGE_LENGTH: usize = 5000;
const MAX_IMAGES: usize = 10;

pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    let len = username.chars().count();
    if len < 3 {
        return Err("Username is too short (min 3 characters)".to_string());
    }
    if len > 32 {
        return Err("Username is too long (max 32 characters)".to_string());
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        );
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a required, bounded display string (user name, pet name, species)
pub fn validate_required_text(value: &str, label: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }

    if value.chars().count() > max {
        return Err(format!("{} is too long (max {} characters)", label, max));
    }

    Ok(())
}

/// Validate an optional free-text field against a length limit
pub fn validate_optional_text(value: &Option<String>, label: &str, max: usize) -> Result<(), String> {
    if let Some(v) = value {
        if v.chars().count() > max {
            return Err(format!("{} is too long (max {} characters)", label, max));
        }
    }

    Ok(())
}

pub fn validate_image_url(url: &Option<String>) -> Result<(), String> {
    if let Some(u) = url {
        if u.is_empty() {
            return Ok(()); // Empty string treated as no image
        }

        if u.len() > 2048 {
            return Err("Image URL is too long (max 2048 characters)".to_string());
        }

        if !IMAGE_URL_REGEX.is_match(u) {
            return Err("Image URL must be an http(s) URL".to_string());
        }
    }

    Ok(())
}

pub fn validate_images(images: &[String]) -> Result<(), String> {
    if images.len() > MAX_IMAGES {
        return Err(format!("At most {} images are allowed", MAX_IMAGES));
    }

    for image in images {
        if !IMAGE_URL_REGEX.is_match(image) {
            return Err(format!("Invalid image URL: {}", image));
        }
    }

    Ok(())
}

/// Age in months (optional field)
pub fn validate_age(age: Option<i32>) -> Result<(), String> {
    match age {
        Some(a) if a < 0 => Err("Age cannot be negative".to_string()),
        Some(a) if a > 600 => Err("Age is unrealistically high (max 600 months)".to_string()),
        _ => Ok(()),
    }
}

/// Price (optional field)
pub fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        Some(p) if !p.is_finite() => Err("Price must be a number".to_string()),
        Some(p) if p < 0.0 => Err("Price cannot be negative".to_string()),
        _ => Ok(()),
    }
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Message content is required".to_string());
    }

    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message is too long (max {} characters)",
            MAX_MESSAGE_LENGTH
        ));
    }

    Ok(())
}
