//! ArticleType - Classification of generated articles

use serde::{Deserialize, Serialize};

/// Article type classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    #[default]
    Review,
    Ranking,
    Howto,
}

impl ArticleType {
    /// All supported types, in display order.
    pub const ALL: [ArticleType; 3] = [ArticleType::Review, ArticleType::Ranking, ArticleType::Howto];

    /// Human-readable suffix used for fallback article titles.
    pub fn title_label(&self) -> &'static str {
        match self {
            ArticleType::Review => "徹底レビュー",
            ArticleType::Ranking => "ランキング",
            ArticleType::Howto => "使い方ガイド",
        }
    }
}

impl std::fmt::Display for ArticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleType::Review => write!(f, "review"),
            ArticleType::Ranking => write!(f, "ranking"),
            ArticleType::Howto => write!(f, "howto"),
        }
    }
}

impl std::str::FromStr for ArticleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" => Ok(ArticleType::Review),
            "ranking" => Ok(ArticleType::Ranking),
            "howto" => Ok(ArticleType::Howto),
            _ => Err(format!("Unknown article type: {}", s)),
        }
    }
}
