//! Machipress CLI - article generation and publication
//!
//! Subcommands: `generate`, `prompt`, `seo`, `publish`. Every error is
//! mapped to a stable exit code: 1 user/configuration, 2 generation
//! service, 3 validation, 4 publish contention.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use tracing_subscriber::EnvFilter;

use machipress::adapters::{AnthropicProvider, DraftStore, FsPromptRepository, GitCli};
use machipress::{
    ArticleGenerator, ArticleType, Config, Draft, LengthBand, PipelineError, ProductCatalog,
    PromptRepository, PromptTemplate, Publisher, RetryPolicy, SeoValidator, Verdict,
};

#[derive(Parser)]
#[command(name = "machipress")]
#[command(about = "Generate and publish matching-app affiliate articles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an article draft for a product
    Generate {
        /// Product name as it appears in data/apps.csv (e.g. Tinder)
        app: String,
        /// Article type: review, ranking, howto
        #[arg(short = 't', long = "type", default_value = "review")]
        article_type: String,
        /// Prompt template id (defaults to the registered default for the type)
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Manage prompt templates
    Prompt {
        #[command(subcommand)]
        action: PromptAction,
    },

    /// Run SEO checks against a draft
    Seo {
        /// Path to the draft markdown file
        file: PathBuf,
    },

    /// Publish a draft into _posts/ and commit it
    Publish {
        /// Path to the draft markdown file
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        no_confirm: bool,
        /// Commit locally but do not push to the remote
        #[arg(long)]
        no_push: bool,
    },
}

#[derive(Subcommand)]
enum PromptAction {
    /// List registered templates
    List,
    /// Show a template, body included
    Show { id: String },
    /// Register a new template
    Add {
        /// Template id (e.g. custom-review-1); prompted for if omitted
        #[arg(long)]
        id: Option<String>,
        /// Display name; prompted for if omitted
        #[arg(long)]
        name: Option<String>,
        /// Article type: review, ranking, howto
        #[arg(short = 't', long = "type", default_value = "review")]
        article_type: String,
        /// Short description
        #[arg(long)]
        description: Option<String>,
        /// Read the template body from a file (otherwise from stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a template
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Export a template body to a standalone file
    Export {
        id: String,
        /// Output path (defaults to data/prompts/<id>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Register a template as the default for its article type
    SetDefault { article_type: String, id: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version output are not errors.
            if e.use_stderr() {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            e.print().ok();
            std::process::exit(0);
        }
    };

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = Config::from_env()?;

    match cli.command {
        Commands::Generate {
            app,
            article_type,
            prompt,
        } => cmd_generate(&config, &app, &article_type, prompt.as_deref()).await,
        Commands::Prompt { action } => cmd_prompt(&config, action),
        Commands::Seo { file } => cmd_seo(&file),
        Commands::Publish {
            file,
            no_confirm,
            no_push,
        } => cmd_publish(&config, &file, no_confirm, no_push).await,
    }
}

fn parse_article_type(raw: &str) -> Result<ArticleType, PipelineError> {
    ArticleType::from_str(raw).map_err(PipelineError::Config)
}

fn open_registry(config: &Config) -> Result<FsPromptRepository, PipelineError> {
    FsPromptRepository::open(config.prompts_dir())
}

async fn cmd_generate(
    config: &Config,
    app: &str,
    article_type: &str,
    prompt_id: Option<&str>,
) -> Result<(), PipelineError> {
    let article_type = parse_article_type(article_type)?;
    let api_key = config.require_api_key()?;

    println!("{} Generating a {} article for {}...", "▶".cyan(), article_type, app.bold());
    println!("  (this can take a minute or two)");

    let generator = ArticleGenerator::new(
        ProductCatalog::new(config.catalog_path()),
        Arc::new(open_registry(config)?),
        Arc::new(AnthropicProvider::new(
            api_key,
            config.model.clone(),
            config.request_timeout_secs,
        )),
        DraftStore::new(config.drafts_dir()),
        RetryPolicy::default(),
        LengthBand {
            min_chars: config.min_article_chars,
            max_chars: config.max_article_chars,
        },
    );

    let draft = generator.generate(app, article_type, prompt_id).await?;
    let path = config.drafts_dir().join(draft.file_name());

    println!("{} Draft saved: {}", "✓".green(), path.display());
    println!("\nNext steps:");
    println!("  machipress seo {}", path.display());
    println!("  machipress publish {}", path.display());
    Ok(())
}

fn cmd_prompt(config: &Config, action: PromptAction) -> Result<(), PipelineError> {
    let registry = open_registry(config)?;

    match action {
        PromptAction::List => {
            let summaries = registry.list()?;
            if summaries.is_empty() {
                println!("No prompt templates registered.");
                return Ok(());
            }
            println!("{}", "Prompt templates:".bold());
            for summary in summaries {
                println!(
                    "  {} {} [{}] {}",
                    summary.id.cyan(),
                    summary.name,
                    summary.article_type,
                    summary.description.dimmed()
                );
            }
        }

        PromptAction::Show { id } => {
            let template = registry.get(&id)?;
            println!("{}: {}", "ID".bold(), template.id);
            println!("{}: {}", "Name".bold(), template.name);
            println!("{}: {}", "Type".bold(), template.article_type);
            println!("{}: {}", "Description".bold(), template.description);
            println!("{}: {}", "Created".bold(), template.created_at.format("%Y-%m-%d %H:%M"));
            println!("\n{}\n{}", "Body:".bold(), template.body);
        }

        PromptAction::Add {
            id,
            name,
            article_type,
            description,
            file,
        } => {
            let article_type = parse_article_type(&article_type)?;
            let id = prompt_for("Template id (e.g. custom-review-1)", id)?;
            let name = prompt_for("Template name", name)?;
            let description = description.unwrap_or_default();
            let body = read_body(file.as_deref())?;
            if body.trim().is_empty() {
                return Err(PipelineError::Config("Template body is empty".to_string()));
            }

            let template = PromptTemplate::new(&id, name, article_type, description, body);
            registry.add(&template)?;
            println!("{} Template '{}' registered", "✓".green(), id);
            println!("\nUse it with:");
            println!("  machipress generate <app> --type {} --prompt {}", article_type, id);
        }

        PromptAction::Delete { id, yes } => {
            let template = registry.get(&id)?;
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete template '{}' ({})?", template.name, id))
                    .default(false)
                    .interact()
                    .map_err(|e| PipelineError::Io(e.to_string()))?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            registry.delete(&id)?;
            println!("{} Template '{}' deleted", "✓".green(), id);
        }

        PromptAction::Export { id, output } => {
            let destination =
                output.unwrap_or_else(|| config.prompts_dir().join(format!("{}.txt", id)));
            registry.export(&id, &destination)?;
            println!("{} Exported to {}", "✓".green(), destination.display());
        }

        PromptAction::SetDefault { article_type, id } => {
            let article_type = parse_article_type(&article_type)?;
            registry.set_default(article_type, &id)?;
            println!("{} '{}' is now the default {} template", "✓".green(), id, article_type);
        }
    }
    Ok(())
}

fn cmd_seo(file: &Path) -> Result<(), PipelineError> {
    let draft = load_draft(file)?;
    let report = SeoValidator::new().analyze(&draft);

    println!("{} {}", "SEO report for".bold(), file.display());
    for check in &report.checks {
        let mark = match check.verdict {
            Verdict::Pass => "✓".green(),
            Verdict::Warn => "!".yellow(),
            Verdict::Fail => "✗".red(),
        };
        println!("  {} {:<16} {}", mark, check.name, check.message);
    }

    let score = report.score();
    let styled = if score >= 80 {
        score.to_string().green()
    } else if score >= 60 {
        score.to_string().yellow()
    } else {
        score.to_string().red()
    };
    println!("\nScore: {}/100", styled);

    if report.has_failures() {
        println!("{}", "Fix the failing checks before publishing.".dimmed());
    }
    Ok(())
}

async fn cmd_publish(
    config: &Config,
    file: &Path,
    no_confirm: bool,
    no_push: bool,
) -> Result<(), PipelineError> {
    let slug = slug_of(file)?;
    let draft = load_draft(file)?;

    if !no_confirm {
        println!("{}", "About to publish:".bold());
        println!("  {} ({})", draft.title(), slug);
        let confirmed = Confirm::new()
            .with_prompt("Publish this article?")
            .default(false)
            .interact()
            .map_err(|e| PipelineError::Io(e.to_string()))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let publisher = Publisher::new(
        DraftStore::new(config.drafts_dir()),
        config.posts_dir(),
        config.content_root.clone(),
        Arc::new(GitCli::new(config.content_root.clone())),
    );

    let post = publisher.publish(&slug, !no_push).await?;
    println!("{} Published: {}", "✓".green(), post.display());
    if no_push {
        println!("\nPush when ready:");
        println!("  git push");
    }
    Ok(())
}

fn slug_of(file: &Path) -> Result<String, PipelineError> {
    if file.extension().map(|e| e != "md").unwrap_or(true) {
        return Err(PipelineError::Config(format!(
            "'{}' is not a markdown file",
            file.display()
        )));
    }
    file.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| PipelineError::Config(format!("Invalid path '{}'", file.display())))
}

fn load_draft(file: &Path) -> Result<Draft, PipelineError> {
    let slug = slug_of(file)?;
    if !file.exists() {
        return Err(PipelineError::not_found("draft", file.to_string_lossy()));
    }
    let content = std::fs::read_to_string(file)
        .map_err(|e| PipelineError::Io(format!("Failed to read {}: {}", file.display(), e)))?;
    Draft::from_markdown(slug, &content)
}

fn prompt_for(label: &str, preset: Option<String>) -> Result<String, PipelineError> {
    match preset {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .map_err(|e| PipelineError::Io(e.to_string())),
    }
}

fn read_body(file: Option<&Path>) -> Result<String, PipelineError> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Io(format!("Failed to read {}: {}", path.display(), e))),
        None => {
            println!("Enter the template body, then press Ctrl+D:");
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .map_err(|e| PipelineError::Io(e.to_string()))?;
            Ok(body)
        }
    }
}
