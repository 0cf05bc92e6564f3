//! ProductRecord - A matching-app product loaded from the catalog table

use serde::{Deserialize, Serialize};

/// A single product from the catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Unique human-readable product name (catalog key).
    pub name: String,
    /// Enumerable category tag, e.g. "casual", "serious".
    pub category: String,
    /// Free-text price including currency and billing period.
    pub price: String,
    /// Target age range, e.g. "20-35".
    pub target_age: String,
    /// Ordered feature list, normalized from the table's delimited field.
    pub features: Vec<String>,
    /// Affiliate link for the product.
    pub affiliate_url: String,
    /// Rating in [1.0, 5.0].
    pub rating: f32,
}

impl ProductRecord {
    /// Slug token derived from the product name: lowercased, spaces
    /// collapsed to hyphens, punctuation dropped. Unicode letters and
    /// digits are kept so Japanese product names stay distinguishable.
    pub fn slug_token(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut last_hyphen = true;
        for c in self.name.to_lowercase().chars() {
            if c.is_alphanumeric() {
                out.push(c);
                last_hyphen = false;
            } else if (c == ' ' || c == '-' || c == '_') && !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            category: "casual".to_string(),
            price: "無料(App内課金あり)".to_string(),
            target_age: "20-35".to_string(),
            features: vec!["スワイプ式".to_string()],
            affiliate_url: "https://example.com/aff".to_string(),
            rating: 4.2,
        }
    }

    #[test]
    fn test_slug_token_normalizes() {
        assert_eq!(product("Tinder").slug_token(), "tinder");
        assert_eq!(product("Pairs Engage").slug_token(), "pairs-engage");
        assert_eq!(product("with.").slug_token(), "with");
    }

    #[test]
    fn test_slug_token_keeps_japanese_names() {
        assert_eq!(product("タップル").slug_token(), "タップル");
        assert_eq!(product("ゼクシィ縁結び").slug_token(), "ゼクシィ縁結び");
        // Distinct Japanese names must yield distinct tokens so their
        // same-day drafts never collide.
        assert_ne!(
            product("タップル").slug_token(),
            product("ゼクシィ縁結び").slug_token()
        );
    }
}
