//! SeoValidator - advisory search-optimization checks over a draft
//!
//! Pure and read-only: builds a fresh report from the draft's current
//! contents, never mutates it, never blocks generation or publication.

use regex::Regex;

use crate::domain::{Draft, SeoReport, Verdict};

// Title length band (characters).
const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const TITLE_HARD_MAX: usize = 80;

// Derived meta-description band (characters).
const DESCRIPTION_MIN: usize = 80;
const DESCRIPTION_MAX: usize = 160;

// Structural subheading target.
const HEADING_MIN: usize = 3;

// Recommended body length band (characters).
const BODY_MIN: usize = 3000;
const BODY_MAX: usize = 4000;

// Product-name density band, in percent of body characters.
const DENSITY_MIN: f64 = 1.0;
const DENSITY_MAX: f64 = 4.0;

/// Heuristic SEO analyzer
pub struct SeoValidator {
    heading: Regex,
    sub_heading: Regex,
    outbound_link: Regex,
}

impl Default for SeoValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoValidator {
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"(?m)^##\s+\S").expect("valid heading pattern"),
            sub_heading: Regex::new(r"(?m)^###\s+\S").expect("valid sub-heading pattern"),
            outbound_link: Regex::new(r"\[[^\]]*\]\(https?://[^)]+\)")
                .expect("valid link pattern"),
        }
    }

    /// Analyze a draft and produce an advisory report.
    pub fn analyze(&self, draft: &Draft) -> SeoReport {
        let mut report = SeoReport::default();
        self.check_title(draft, &mut report);
        self.check_description(draft, &mut report);
        self.check_body_length(draft, &mut report);
        self.check_headings(draft, &mut report);
        self.check_keyword_density(draft, &mut report);
        self.check_outbound_link(draft, &mut report);
        report
    }

    fn check_title(&self, draft: &Draft, report: &mut SeoReport) {
        let len = draft.title().chars().count();
        let (verdict, message) = if len == 0 {
            (Verdict::Fail, "Title is empty".to_string())
        } else if len > TITLE_HARD_MAX {
            (
                Verdict::Fail,
                format!(
                    "Title is {} characters; search results truncate well before {}",
                    len, TITLE_HARD_MAX
                ),
            )
        } else if len < TITLE_MIN || len > TITLE_MAX {
            (
                Verdict::Warn,
                format!(
                    "Title is {} characters; {}-{} is recommended",
                    len, TITLE_MIN, TITLE_MAX
                ),
            )
        } else {
            (Verdict::Pass, format!("Title length {} is in range", len))
        };
        report.push("title-length", verdict, message);
    }

    fn check_description(&self, draft: &Draft, report: &mut SeoReport) {
        match derive_description(&draft.body) {
            None => report.push(
                "meta-description",
                Verdict::Fail,
                "No paragraph available to derive a meta description from",
            ),
            Some(description) => {
                let len = description.chars().count();
                if len < DESCRIPTION_MIN {
                    report.push(
                        "meta-description",
                        Verdict::Warn,
                        format!(
                            "Derived description is {} characters; {}-{} is recommended",
                            len, DESCRIPTION_MIN, DESCRIPTION_MAX
                        ),
                    );
                } else {
                    report.push(
                        "meta-description",
                        Verdict::Pass,
                        format!("Derived description length {} is in range", len),
                    );
                }
            }
        }
    }

    fn check_body_length(&self, draft: &Draft, report: &mut SeoReport) {
        let len = draft.body.chars().count();
        let (verdict, message) = if len < BODY_MIN {
            (
                Verdict::Warn,
                format!(
                    "Body is {} characters; {}-{} is recommended for ranking",
                    len, BODY_MIN, BODY_MAX
                ),
            )
        } else if len > BODY_MAX {
            (
                Verdict::Warn,
                format!(
                    "Body is {} characters; readers tend to drop off past {}",
                    len, BODY_MAX
                ),
            )
        } else {
            (Verdict::Pass, format!("Body length {} is in range", len))
        };
        report.push("body-length", verdict, message);
    }

    fn check_headings(&self, draft: &Draft, report: &mut SeoReport) {
        let count = self.heading.find_iter(&draft.body).count();
        let (verdict, message) = if count == 0 {
            (
                Verdict::Fail,
                "No '##' subheadings found; the article has no structure".to_string(),
            )
        } else if count < HEADING_MIN {
            (
                Verdict::Warn,
                format!("Only {} subheadings; at least {} recommended", count, HEADING_MIN),
            )
        } else {
            (Verdict::Pass, format!("{} subheadings found", count))
        };
        report.push("subheadings", verdict, message);

        if self.sub_heading.is_match(&draft.body) {
            report.push("sub-sections", Verdict::Pass, "'###' sub-sections present");
        } else {
            report.push(
                "sub-sections",
                Verdict::Warn,
                "No '###' sub-sections; deeper structure helps long articles",
            );
        }
    }

    fn check_keyword_density(&self, draft: &Draft, report: &mut SeoReport) {
        let keyword = draft.front_matter.source.to_lowercase();
        let body = draft.body.to_lowercase();
        let total_chars = body.chars().count();
        if keyword.is_empty() || total_chars == 0 {
            report.push("keyword-density", Verdict::Fail, "Empty body or product name");
            return;
        }

        let occurrences = body.matches(&keyword).count();
        if occurrences == 0 {
            report.push(
                "keyword-density",
                Verdict::Fail,
                format!(
                    "Product name '{}' never appears in the body; content may be off-topic",
                    draft.front_matter.source
                ),
            );
            return;
        }

        let density =
            (keyword.chars().count() * occurrences) as f64 / total_chars as f64 * 100.0;
        let (verdict, message) = if density < DENSITY_MIN {
            (
                Verdict::Warn,
                format!(
                    "Product name density {:.1}% is low; content may have drifted off-topic",
                    density
                ),
            )
        } else if density > DENSITY_MAX {
            (
                Verdict::Warn,
                format!("Product name density {:.1}% looks like keyword stuffing", density),
            )
        } else {
            (
                Verdict::Pass,
                format!("Product name density {:.1}% ({} occurrences)", density, occurrences),
            )
        };
        report.push("keyword-density", verdict, message);
    }

    fn check_outbound_link(&self, draft: &Draft, report: &mut SeoReport) {
        if self.outbound_link.is_match(&draft.body) {
            report.push("outbound-link", Verdict::Pass, "Outbound link present");
        } else {
            report.push(
                "outbound-link",
                Verdict::Fail,
                "No outbound link found; the affiliate link is missing",
            );
        }
    }
}

/// First non-heading paragraph, truncated to the description limit.
fn derive_description(body: &str) -> Option<String> {
    for block in body.split("\n\n") {
        let text = block.trim();
        if text.is_empty() || text.starts_with('#') || text.starts_with("![") {
            continue;
        }
        let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let truncated: String = flat.chars().take(DESCRIPTION_MAX).collect();
        return Some(truncated);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleType, FrontMatter};
    use chrono::{NaiveDate, Utc};

    fn draft_with(title: &str, body: &str) -> Draft {
        Draft {
            slug: "2026-02-08-tinder-review".to_string(),
            front_matter: FrontMatter {
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
                article_type: ArticleType::Review,
                source: "Tinder".to_string(),
                rating: 4.2,
                categories: vec!["casual".to_string()],
            },
            body: body.to_string(),
            generated_at: Utc::now(),
            prompt_id: "default-review".to_string(),
        }
    }

    fn healthy_body() -> String {
        let intro = "Tinderはカジュアル層に圧倒的な人気を誇るマッチングアプリで、スワイプ操作だけで気軽に出会いを探せるのが最大の特徴です。この記事では料金や機能を徹底的に解説します。";
        format!(
            "{}\n\n## Tinderの特徴\n\n位置情報ベースでTinderの相手を探せます。\n\n## 料金プラン\n\nTinderの基本機能は無料です。\n\n## まとめ\n\nTinderはまず試す価値があります。[公式サイト](https://example.com/tinder)\n",
            intro
        )
    }

    #[test]
    fn test_title_45_chars_passes() {
        let title: String = "あ".repeat(45);
        let report = SeoValidator::new().analyze(&draft_with(&title, &healthy_body()));
        assert_eq!(report.check("title-length").unwrap().verdict, Verdict::Pass);
    }

    #[test]
    fn test_title_90_chars_fails() {
        let title: String = "あ".repeat(90);
        let report = SeoValidator::new().analyze(&draft_with(&title, &healthy_body()));
        assert_eq!(report.check("title-length").unwrap().verdict, Verdict::Fail);
    }

    #[test]
    fn test_short_title_warns() {
        let report = SeoValidator::new().analyze(&draft_with("短いタイトル", &healthy_body()));
        assert_eq!(report.check("title-length").unwrap().verdict, Verdict::Warn);
    }

    #[test]
    fn test_healthy_draft_has_no_failures() {
        let title: String = "あ".repeat(45);
        let report = SeoValidator::new().analyze(&draft_with(&title, &healthy_body()));
        assert!(!report.has_failures(), "checks: {:?}", report.checks);
    }

    #[test]
    fn test_short_body_warns_long_enough_passes() {
        let validator = SeoValidator::new();
        let report = validator.analyze(&draft_with(&"あ".repeat(45), &healthy_body()));
        assert_eq!(report.check("body-length").unwrap().verdict, Verdict::Warn);

        let padding = "Tinderの使い方を丁寧に解説します。".repeat(180);
        let body = format!("{}\n\n{}", healthy_body(), padding);
        let report = validator.analyze(&draft_with(&"あ".repeat(45), &body));
        assert_eq!(report.check("body-length").unwrap().verdict, Verdict::Pass);
    }

    #[test]
    fn test_missing_sub_sections_warn_present_pass() {
        let validator = SeoValidator::new();
        let report = validator.analyze(&draft_with(&"あ".repeat(45), &healthy_body()));
        assert_eq!(report.check("sub-sections").unwrap().verdict, Verdict::Warn);

        let body = format!("{}\n\n### 無料プラン\n\n詳細です。", healthy_body());
        let report = validator.analyze(&draft_with(&"あ".repeat(45), &body));
        assert_eq!(report.check("sub-sections").unwrap().verdict, Verdict::Pass);
    }

    #[test]
    fn test_missing_headings_fail() {
        let report = SeoValidator::new().analyze(&draft_with(
            &"あ".repeat(45),
            "Tinderの説明だけが続く本文です。[リンク](https://example.com)",
        ));
        assert_eq!(report.check("subheadings").unwrap().verdict, Verdict::Fail);
    }

    #[test]
    fn test_keyword_absent_fails() {
        let body = "## 概要\n\n別のアプリについてだけ書かれた本文です。出会いのコツを紹介します。\n\n[リンク](https://example.com)";
        let report = SeoValidator::new().analyze(&draft_with(&"あ".repeat(45), body));
        assert_eq!(
            report.check("keyword-density").unwrap().verdict,
            Verdict::Fail
        );
    }

    #[test]
    fn test_keyword_stuffing_warns() {
        let body = format!("## 概要\n\n{}\n\n[リンク](https://example.com)", "Tinder".repeat(40));
        let report = SeoValidator::new().analyze(&draft_with(&"あ".repeat(45), &body));
        assert_eq!(
            report.check("keyword-density").unwrap().verdict,
            Verdict::Warn
        );
    }

    #[test]
    fn test_missing_outbound_link_fails() {
        let body = "## 概要\n\nTinderの紹介です。リンクはありません。";
        let report = SeoValidator::new().analyze(&draft_with(&"あ".repeat(45), body));
        assert_eq!(
            report.check("outbound-link").unwrap().verdict,
            Verdict::Fail
        );
    }

    #[test]
    fn test_analyze_does_not_mutate_draft() {
        let draft = draft_with(&"あ".repeat(45), &healthy_body());
        let before = draft.clone();
        let _ = SeoValidator::new().analyze(&draft);
        assert_eq!(draft, before);
    }
}
