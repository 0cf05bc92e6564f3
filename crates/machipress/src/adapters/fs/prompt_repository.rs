//! Filesystem implementation of PromptRepository
//!
//! Layout under the prompts directory:
//!
//! ```text
//! prompts/
//!   index.json        # metadata for every template + per-type defaults
//!   bodies/<id>.txt   # one body file per template
//! ```
//!
//! Every mutation writes through a sibling temp file and `fs::rename`, so
//! readers always observe either the old or the new complete state. On
//! `add` the body lands before the index entry; on `delete` the index entry
//! is dropped before the body file. An orphaned body is harmless, an index
//! entry without a body is not.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{ArticleType, PipelineError, PromptSummary, PromptTemplate};
use crate::ports::PromptRepository;

const INDEX_FILE: &str = "index.json";
const BODIES_DIR: &str = "bodies";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    prompts: Vec<PromptSummary>,
    #[serde(default)]
    defaults: BTreeMap<String, String>,
}

/// File-backed prompt registry
pub struct FsPromptRepository {
    dir: PathBuf,
}

impl FsPromptRepository {
    /// Open (or initialize) the registry at `dir`.
    ///
    /// An empty registry is seeded with one built-in template per article
    /// type, registered as that type's default.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let repo = Self { dir: dir.into() };
        fs::create_dir_all(repo.bodies_dir())
            .map_err(|e| PipelineError::Io(format!("Failed to create prompt store: {}", e)))?;
        if repo.load_index()?.prompts.is_empty() {
            repo.seed_defaults()?;
        }
        Ok(repo)
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn bodies_dir(&self) -> PathBuf {
        self.dir.join(BODIES_DIR)
    }

    fn body_path(&self, id: &str) -> PathBuf {
        self.bodies_dir().join(format!("{}.txt", id))
    }

    fn load_index(&self) -> Result<Index, PipelineError> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Index::default());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| PipelineError::Io(format!("Failed to read prompt index: {}", e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Io(format!("Prompt index is corrupt: {}", e)))
    }

    fn store_index(&self, index: &Index) -> Result<(), PipelineError> {
        let raw = serde_json::to_string_pretty(index)
            .map_err(|e| PipelineError::Io(format!("Failed to encode prompt index: {}", e)))?;
        write_atomic(&self.index_path(), raw.as_bytes())
    }

    fn seed_defaults(&self) -> Result<(), PipelineError> {
        for (id, name, article_type, description, body) in builtin_templates() {
            let template = PromptTemplate::new(id, name, article_type, description, body);
            self.add(&template)?;
            self.set_default(article_type, &template.id)?;
        }
        tracing::info!("Seeded built-in prompt templates");
        Ok(())
    }
}

impl PromptRepository for FsPromptRepository {
    fn list(&self) -> Result<Vec<PromptSummary>, PipelineError> {
        Ok(self.load_index()?.prompts)
    }

    fn get(&self, id: &str) -> Result<PromptTemplate, PipelineError> {
        let index = self.load_index()?;
        let summary = index
            .prompts
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PipelineError::not_found("prompt template", id))?;
        let body = fs::read_to_string(self.body_path(id))
            .map_err(|e| PipelineError::Io(format!("Failed to read prompt body '{}': {}", id, e)))?;
        Ok(PromptTemplate {
            id: summary.id,
            name: summary.name,
            article_type: summary.article_type,
            description: summary.description,
            body,
            created_at: summary.created_at,
        })
    }

    fn add(&self, template: &PromptTemplate) -> Result<(), PipelineError> {
        let mut index = self.load_index()?;
        if index.prompts.iter().any(|p| p.id == template.id) {
            return Err(PipelineError::Conflict(format!(
                "Prompt template '{}' already exists",
                template.id
            )));
        }
        write_atomic(&self.body_path(&template.id), template.body.as_bytes())?;
        index.prompts.push(template.summary());
        self.store_index(&index)
    }

    fn delete(&self, id: &str) -> Result<(), PipelineError> {
        let mut index = self.load_index()?;
        let before = index.prompts.len();
        index.prompts.retain(|p| p.id != id);
        if index.prompts.len() == before {
            return Err(PipelineError::not_found("prompt template", id));
        }
        index.defaults.retain(|_, default_id| default_id != id);
        self.store_index(&index)?;
        // Index no longer references the body; a leftover file is inert.
        let _ = fs::remove_file(self.body_path(id));
        Ok(())
    }

    fn export(&self, id: &str, destination: &Path) -> Result<(), PipelineError> {
        let template = self.get(id)?;
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| PipelineError::Io(format!("Failed to create {:?}: {}", parent, e)))?;
            }
        }
        fs::write(destination, template.body.as_bytes())
            .map_err(|e| PipelineError::Io(format!("Failed to export to {:?}: {}", destination, e)))
    }

    fn default_for(&self, article_type: ArticleType) -> Result<String, PipelineError> {
        self.load_index()?
            .defaults
            .get(&article_type.to_string())
            .cloned()
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "No default prompt template registered for type '{}'",
                    article_type
                ))
            })
    }

    fn set_default(&self, article_type: ArticleType, id: &str) -> Result<(), PipelineError> {
        let mut index = self.load_index()?;
        let summary = index
            .prompts
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PipelineError::not_found("prompt template", id))?;
        if summary.article_type != article_type {
            return Err(PipelineError::Config(format!(
                "Template '{}' is a {} template, cannot be the {} default",
                id, summary.article_type, article_type
            )));
        }
        index.defaults.insert(article_type.to_string(), id.to_string());
        self.store_index(&index)
    }
}

/// Write `contents` to `path` through a temp file and an atomic rename.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut file = fs::File::create(&tmp)
            .map_err(|e| PipelineError::Io(format!("Failed to write {:?}: {}", tmp, e)))?;
        file.write_all(contents)
            .map_err(|e| PipelineError::Io(format!("Failed to write {:?}: {}", tmp, e)))?;
        file.sync_all()
            .map_err(|e| PipelineError::Io(format!("Failed to sync {:?}: {}", tmp, e)))?;
    }
    fs::rename(&tmp, path)
        .map_err(|e| PipelineError::Io(format!("Failed to replace {:?}: {}", path, e)))
}

/// Built-in starter templates, one per article type.
fn builtin_templates() -> Vec<(&'static str, &'static str, ArticleType, &'static str, &'static str)>
{
    vec![
        (
            "default-review",
            "標準レビュー記事",
            ArticleType::Review,
            "単一アプリの徹底レビュー記事を生成する標準プロンプト",
            DEFAULT_REVIEW_BODY,
        ),
        (
            "default-ranking",
            "標準ランキング記事",
            ArticleType::Ranking,
            "カテゴリ内ランキング記事を生成する標準プロンプト",
            DEFAULT_RANKING_BODY,
        ),
        (
            "default-howto",
            "標準使い方ガイド",
            ArticleType::Howto,
            "アプリの使い方ガイド記事を生成する標準プロンプト",
            DEFAULT_HOWTO_BODY,
        ),
    ]
}

const DEFAULT_REVIEW_BODY: &str = "\
あなたはマッチングアプリに詳しいアフィリエイトライターです。
以下のアプリのレビュー記事をMarkdown形式で書いてください。

アプリ名: {app_name}
カテゴリ: {category}
料金: {price}
対象年齢層: {target_age}
主な機能: {features}
評価: {rating} / 5.0
執筆日: {date}

要件:
- 最初の行に `# ` で始まる記事タイトル(30〜60文字)を置くこと
- `## ` の見出しを5〜7個使って構成すること
- 本文は3000〜4000文字程度
- 実際の利用シーンを想定した具体的な記述にすること
- 記事の終盤に公式サイトへのリンクを1つ含めること
";

const DEFAULT_RANKING_BODY: &str = "\
あなたはマッチングアプリに詳しいアフィリエイトライターです。
{category}カテゴリのおすすめランキング記事をMarkdown形式で書いてください。
{app_name}を上位に含め、選定理由を具体的に説明すること。

アプリ名: {app_name}
料金: {price}
対象年齢層: {target_age}
主な機能: {features}
評価: {rating} / 5.0
執筆日: {date}

要件:
- 最初の行に `# ` で始まる記事タイトル(30〜60文字)を置くこと
- `## ` の見出しでランキング順に構成すること
- 記事の終盤に公式サイトへのリンクを1つ含めること
";

const DEFAULT_HOWTO_BODY: &str = "\
あなたはマッチングアプリに詳しいアフィリエイトライターです。
{app_name}の使い方ガイド記事をMarkdown形式で書いてください。

アプリ名: {app_name}
カテゴリ: {category}
料金: {price}
対象年齢層: {target_age}
主な機能: {features}
執筆日: {date}

要件:
- 最初の行に `# ` で始まる記事タイトル(30〜60文字)を置くこと
- 登録から最初のマッチングまでを `## ` の見出しで手順化すること
- 記事の終盤に公式サイトへのリンクを1つ含めること
";
