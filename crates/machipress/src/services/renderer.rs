//! TemplateRenderer - placeholder substitution into prompt templates
//!
//! Pure and deterministic. The recognized placeholder set is closed; a
//! token outside it is assumed to be literal text the template author
//! intended and is left verbatim. A recognized placeholder with no
//! supplied value renders as an empty string. This asymmetry is load-
//! bearing for existing templates and must not be "fixed".

use chrono::NaiveDate;

use crate::domain::ProductRecord;

/// Separator used when joining feature lists into prose.
const FEATURE_SEPARATOR: &str = ", ";

/// Recognized placeholder names, in substitution order.
const RECOGNIZED: [&str; 8] = [
    "app_name",
    "category",
    "price",
    "target_age",
    "features",
    "date",
    "rating",
    "app_name_slug",
];

/// Variable map for one rendering pass
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    pub app_name: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub target_age: Option<String>,
    pub features: Option<String>,
    pub date: Option<String>,
    pub rating: Option<String>,
    pub app_name_slug: Option<String>,
}

impl TemplateVars {
    /// Build the full variable map from a product record and a date.
    pub fn from_product(product: &ProductRecord, date: NaiveDate) -> Self {
        Self {
            app_name: Some(product.name.clone()),
            category: Some(product.category.clone()),
            price: Some(product.price.clone()),
            target_age: Some(product.target_age.clone()),
            features: Some(product.features.join(FEATURE_SEPARATOR)),
            date: Some(date.format("%Y-%m-%d").to_string()),
            rating: Some(product.rating.to_string()),
            app_name_slug: Some(product.slug_token()),
        }
    }

    fn value_of(&self, name: &str) -> &str {
        let slot = match name {
            "app_name" => &self.app_name,
            "category" => &self.category,
            "price" => &self.price,
            "target_age" => &self.target_age,
            "features" => &self.features,
            "date" => &self.date,
            "rating" => &self.rating,
            "app_name_slug" => &self.app_name_slug,
            _ => &None,
        };
        slot.as_deref().unwrap_or("")
    }
}

/// Substitute recognized `{placeholder}` tokens into a template body.
pub fn render(template_body: &str, vars: &TemplateVars) -> String {
    let mut out = template_body.to_string();
    for name in RECOGNIZED {
        let token = format!("{{{}}}", name);
        if out.contains(&token) {
            out = out.replace(&token, vars.value_of(name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars {
            app_name: Some("Tinder".to_string()),
            category: Some("casual".to_string()),
            features: Some("スワイプ式, 位置情報".to_string()),
            date: Some("2026-02-08".to_string()),
            rating: Some("4.2".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_recognized_tokens_substituted() {
        let out = render("{app_name}({category})の評価は{rating}です。", &vars());
        assert_eq!(out, "Tinder(casual)の評価は4.2です。");
    }

    #[test]
    fn test_unrecognized_token_left_verbatim() {
        let out = render("条件: {app_name} / {budget} 円以内", &vars());
        assert_eq!(out, "条件: Tinder / {budget} 円以内");
    }

    #[test]
    fn test_recognized_without_value_renders_empty() {
        // price is recognized but unsupplied here.
        let out = render("料金: {price}。", &vars());
        assert_eq!(out, "料金: 。");
    }

    #[test]
    fn test_render_is_idempotent() {
        let template = "{app_name} {features} {unknown} {price}";
        let v = vars();
        let first = render(template, &v);
        let second = render(template, &v);
        assert_eq!(first, second);
    }

    #[test]
    fn test_features_joined_with_fixed_separator() {
        let product = ProductRecord {
            name: "Tinder".to_string(),
            category: "casual".to_string(),
            price: "無料".to_string(),
            target_age: "20-35".to_string(),
            features: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            affiliate_url: "https://example.com".to_string(),
            rating: 4.2,
        };
        let v = TemplateVars::from_product(&product, chrono::NaiveDate::from_ymd_opt(2026, 2, 8).unwrap());
        assert_eq!(v.features.as_deref(), Some("a, b, c"));
        assert_eq!(v.app_name_slug.as_deref(), Some("tinder"));
    }
}
