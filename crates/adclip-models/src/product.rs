//! Product descriptor supplied by the ad-scheduling caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Everything the generation prompt knows about the advertised product.
///
/// All fields are required and non-empty; `benefits` carries exactly three
/// entries and `gradient_colors` exactly two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    /// Brand name shown in the ad
    #[validate(length(min = 1, max = 120))]
    pub brand: String,

    /// Product name
    #[validate(length(min = 1, max = 160))]
    pub product: String,

    /// Short tagline
    #[validate(length(min = 1, max = 240))]
    pub tagline: String,

    /// What the product looks like, for the model
    #[validate(length(min = 1, max = 2000))]
    pub visual_description: String,

    /// What happens in the ad
    #[validate(length(min = 1, max = 2000))]
    pub action_script: String,

    /// Exactly three benefit statements
    #[validate(length(min = 3, max = 3), custom(function = non_empty_items))]
    pub benefits: Vec<String>,

    /// Exactly two gradient colors for brand styling
    #[validate(length(min = 2, max = 2), custom(function = non_empty_items))]
    pub gradient_colors: Vec<String>,
}

impl ProductDescriptor {
    /// Stable identifier used inside the cache key.
    ///
    /// Lowercased brand + product with runs of non-alphanumerics collapsed
    /// to single hyphens.
    pub fn slug(&self) -> String {
        let raw = format!("{} {}", self.brand, self.product);
        let mut slug = String::with_capacity(raw.len());
        let mut last_was_hyphen = true;

        for c in raw.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
                last_was_hyphen = false;
            } else if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        }

        while slug.ends_with('-') {
            slug.pop();
        }

        if slug.is_empty() {
            slug.push_str("product");
        }

        slug
    }
}

fn non_empty_items(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|s| s.trim().is_empty()) {
        return Err(ValidationError::new("empty_item"));
    }
    Ok(())
}
