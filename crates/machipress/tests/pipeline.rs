//! Full pipeline integration: generate → seo → publish.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;

use machipress::adapters::{DraftStore, FsPromptRepository};
use machipress::{
    ArticleGenerator, ArticleType, GenerationRequest, GenerationResponse, LengthBand, LlmProvider,
    PipelineError, ProductCatalog, Publisher, RetryPolicy, SeoValidator, VersionControl,
};

struct CannedProvider {
    content: String,
}

#[async_trait]
impl LlmProvider for CannedProvider {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, PipelineError> {
        Ok(GenerationResponse {
            content: self.content.clone(),
            model: "test-model".to_string(),
        })
    }

    fn model_id(&self) -> &str {
        "test-model"
    }
}

#[derive(Default)]
struct RecordingVcs {
    commits: Mutex<Vec<String>>,
}

#[async_trait]
impl VersionControl for RecordingVcs {
    async fn stage(&self, _path: &Path) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), PipelineError> {
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn push(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn unstage(&self, _path: &Path) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn undo_last_commit(&self) -> Result<(), PipelineError> {
        Ok(())
    }
}

fn canned_article() -> String {
    let mut body = String::from(
        "# 「Tinder」徹底レビュー|カジュアル派におすすめの定番マッチングアプリ\n\n\
         Tinderはスワイプ操作で気軽に出会いを探せる定番のマッチングアプリです。\
         この記事では料金プランから実際の使い勝手まで、登録前に知っておきたいポイントを徹底的に解説します。\n\n\
         ## Tinderの基本情報\n\nTinderは位置情報をもとに近くの相手を表示します。\n\n\
         ## 料金プラン\n\nTinderの基本機能は無料で使えます。\n\n\
         ## 実際に使ってみた感想\n\nマッチングまでの速度は他のアプリと比べても早い印象です。\n\n\
         ## まとめ\n\nカジュアルな出会いを探すならまずTinderから。\
         [公式サイトはこちら](https://example.com/tinder)\n",
    );
    while body.chars().count() < 3500 {
        body.push_str("Tinderを使う際のコツを補足します。プロフィール写真は明るい場所で撮ると反応が良くなります。");
    }
    body
}

#[tokio::test]
async fn test_generate_analyze_publish_flow() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data/apps.csv"),
        "name,category,price,target_age,features,affiliate_url,rating\n\
         Tinder,casual,無料(App内課金あり),20-35,\"スワイプ式,位置情報\",https://example.com/tinder,4.2\n",
    )
    .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 2, 8).unwrap();

    // Generate.
    let generator = ArticleGenerator::new(
        ProductCatalog::new(dir.path().join("data/apps.csv")),
        Arc::new(FsPromptRepository::open(dir.path().join("data/prompts")).unwrap()),
        Arc::new(CannedProvider {
            content: canned_article(),
        }),
        DraftStore::new(dir.path().join("_drafts")),
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        },
        LengthBand {
            min_chars: 800,
            max_chars: 20_000,
        },
    );
    let draft = generator
        .generate_on("Tinder", ArticleType::Review, None, date)
        .await
        .unwrap();

    assert_eq!(draft.slug, "2026-02-08-tinder-review");
    assert_eq!(draft.front_matter.source, "Tinder");
    assert_eq!(draft.front_matter.rating, 4.2);
    assert_eq!(draft.front_matter.article_type, ArticleType::Review);
    assert!(dir.path().join("_drafts/2026-02-08-tinder-review.md").exists());

    // Analyze: the canned article is healthy.
    let report = SeoValidator::new().analyze(&draft);
    assert!(!report.has_failures(), "checks: {:?}", report.checks);

    // Publish.
    let vcs = Arc::new(RecordingVcs::default());
    let publisher = Publisher::new(
        DraftStore::new(dir.path().join("_drafts")),
        dir.path().join("_posts"),
        dir.path(),
        vcs.clone(),
    );
    let post = publisher
        .publish("2026-02-08-tinder-review", true)
        .await
        .unwrap();

    assert!(post.exists());
    // Published draft no longer exists in the draft store.
    assert!(!dir.path().join("_drafts/2026-02-08-tinder-review.md").exists());
    let commits = vcs.commits.lock().unwrap();
    assert_eq!(commits.len(), 1);
    assert!(commits[0].contains("Tinder"));
    assert!(commits[0].contains("review"));
}
