//! SEOForge command line.
//!
//! Runs the same operations the dashboard drives over JSON-RPC: generate
//! content, research and export keywords, inspect the recently viewed list,
//! search stored documents, undo and diff edits, and check the environment.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use seoforge::app::App;
use seoforge::managers::content_manager::{ContentManager, ContentManagerTrait};
use seoforge::managers::recent_manager::{format_entry, RecentManager, RecentManagerTrait};
use seoforge::platform;
use seoforge::services::content_length::{count_words_from_html, estimate_read_minutes, strip_tags};
use seoforge::services::env_config::{load_dotenv, EnvConfig, IssueLevel};
use seoforge::services::export::{write_html_document, write_keywords_csv};
use seoforge::services::fuzzy_search::simple_fuzzy_search;
use seoforge::services::generation_client::regenerate_section;
use seoforge::services::settings_engine::SettingsEngineTrait;
use seoforge::types::content::{DiffKind, Tone};
use seoforge::types::search::{SearchItem, SearchWeights};

#[derive(Parser, Debug)]
#[command(name = "seoforge", version, about = "SEO content generation from the command line")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SEOFORGE_DB")]
    db: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a document and store it
    Generate {
        /// Document title
        #[arg(long)]
        title: String,
        /// Target keyword; repeat for several
        #[arg(long = "keyword", short = 'k')]
        keywords: Vec<String>,
        /// Section heading in order; repeat for several
        #[arg(long = "section", short = 's')]
        outline: Vec<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        words: Option<u32>,
        /// Print the stored HTML instead of a summary
        #[arg(long, default_value_t = false)]
        html: bool,
    },
    /// Regenerate one section of a stored document
    Regenerate {
        id: String,
        #[arg(long)]
        heading: String,
    },
    /// Research keywords for a seed and optionally export them as CSV
    Keywords {
        seed: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        language: Option<String>,
        /// Directory to write `{seed}-keywords.csv` into
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Show the recently viewed list
    Recent {
        #[arg(long)]
        limit: Option<usize>,
        /// Empty the list instead of showing it
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Fuzzy-search stored documents
    Search { query: String },
    /// Validate environment configuration
    CheckEnv,
    /// Restore the previous HTML of a document
    Undo { id: String },
    /// Section diff of a document against a revision (newest by default)
    Diff {
        id: String,
        #[arg(long)]
        revision: Option<String>,
    },
    /// Write a document as a standalone HTML page
    Export {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn open_app(cli: &Cli, env: EnvConfig) -> Result<App> {
    let db_path = cli.db.clone().unwrap_or_else(platform::get_database_path);
    App::new(&db_path, cli.settings.clone(), env)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("failed to open {}", db_path.display()))
}

fn check_env(env: &EnvConfig) -> Result<()> {
    let issues = env.validate();
    println!("mock content:  {}", env.use_mock_content);
    println!("bypass auth:   {}", env.bypass_auth);
    println!("serpapi:       {}", env.enable_serpapi);
    println!("supabase url:  {}", env.supabase_url.as_deref().unwrap_or("(unset)"));
    if issues.is_empty() {
        println!("configuration OK");
        return Ok(());
    }
    for issue in &issues {
        let label = match issue.level {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
        };
        println!("{}: {} {}", label, issue.variable, issue.message);
    }
    if env.is_valid() {
        Ok(())
    } else {
        bail!("configuration has errors")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    seoforge::logging::init();

    let cli = Cli::parse();
    let env = EnvConfig::from_env();

    if let Command::CheckEnv = cli.command {
        return check_env(&env);
    }

    let app = open_app(&cli, env)?;
    let conn = app.db.connection();

    match &cli.command {
        Command::Generate { title, keywords, outline, language, tone, words, html } => {
            let request = app.generation_request(
                title,
                keywords.clone(),
                language.clone(),
                tone.as_deref().map(Tone::parse),
                *words,
                Some(outline.clone()),
            );
            let provider = app.generator().get().await?.clone();
            let result = provider.generate(&request).await?;
            let doc = ContentManager::new(conn).create(
                &request,
                &result.content,
                Some(result.provider_used.as_str()),
                Some(result.request_id.as_str()),
            )?;
            if *html {
                println!("{}", doc.html);
            } else {
                println!("{}  {}", doc.id, doc.title);
                println!(
                    "  {} words, ~{} min read, SEO {}, via {}",
                    count_words_from_html(&doc.html),
                    estimate_read_minutes(&doc.html),
                    doc.seo_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    result.provider_used
                );
                println!("  {}", doc.meta_description);
            }
        }
        Command::Regenerate { id, heading } => {
            let mut mgr = ContentManager::new(conn);
            let doc = mgr.get(id)?;
            let provider = app.generator().get().await?.clone();
            let html = regenerate_section(provider.as_ref(), &doc, heading).await?;
            mgr.update_html(id, &html, &format!("regenerate section: {}", heading))?;
            println!("regenerated \"{}\" in {}", heading, id);
        }
        Command::Keywords { seed, location, language, export } => {
            let provider = app.keyword_provider();
            let options = app.keyword_options(language.clone(), location.clone());
            let research = provider.research(seed, &options).await?;
            println!("{:<40} {:>10} {:>6} {:>8} {:>6}", "keyword", "volume", "diff", "comp", "cpc");
            for k in &research.keywords {
                println!(
                    "{:<40} {:>10} {:>6} {:>8} {:>6.2}",
                    k.keyword, k.search_volume, k.difficulty, k.competition, k.cpc
                );
            }
            if let Some(dir) = export {
                let path = write_keywords_csv(dir, seed, &research.keywords)?;
                println!("wrote {}", path.display());
            }
        }
        Command::Recent { limit, clear } => {
            let mut mgr = RecentManager::new(conn);
            if *clear {
                mgr.clear()?;
                println!("recent list cleared");
            } else {
                let settings = &app.settings_engine.get_settings().recent;
                let items = mgr.list(limit.unwrap_or(settings.display_limit))?;
                if items.is_empty() {
                    println!("no recent content");
                }
                for item in &items {
                    println!("{}  {}", item.id, format_entry(item, &settings.date_locale));
                }
            }
        }
        Command::Search { query } => {
            let docs = ContentManager::new(conn).list()?;
            let items: Vec<SearchItem> = docs
                .iter()
                .map(|d| SearchItem {
                    id: d.id.clone(),
                    title: d.title.clone(),
                    content: strip_tags(&d.html),
                    keywords: d.keywords.clone(),
                })
                .collect();
            for id in simple_fuzzy_search(query, &items, &SearchWeights::default()) {
                if let Some(doc) = docs.iter().find(|d| d.id == id) {
                    println!("{}  {}", doc.id, doc.title);
                }
            }
        }
        Command::Undo { id } => {
            let doc = ContentManager::new(conn).undo(id)?;
            println!("restored previous version of {} ({} words)", doc.id, count_words_from_html(&doc.html));
        }
        Command::Diff { id, revision } => {
            let diff = ContentManager::new(conn).diff(id, revision.as_deref())?;
            for entry in diff {
                let marker = match entry.kind {
                    DiffKind::Added => "+",
                    DiffKind::Removed => "-",
                    DiffKind::Changed => "~",
                    DiffKind::Unchanged => " ",
                };
                println!("{} {}", marker, entry.heading.as_deref().unwrap_or("(intro)"));
            }
        }
        Command::Export { id, out } => {
            let doc = ContentManager::new(conn).get(id)?;
            let dir = out.clone().unwrap_or_else(|| app.export_dir.clone());
            let path = write_html_document(&dir, &doc)?;
            println!("wrote {}", path.display());
        }
        Command::CheckEnv => {}
    }

    Ok(())
}
