//! App Core for SEOForge.
//!
//! Central struct holding the database, settings and the remote providers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::local_store::{LocalStore, BYPASS_AUTH_KEY, SERPAPI_API_KEY};
use crate::platform;
use crate::services::env_config::EnvConfig;
use crate::services::generation_client::{select_content_provider, ContentProvider};
use crate::services::keyword_client::{select_keyword_provider, KeywordProvider};
use crate::services::lazy_retry::{LazyWithRetry, RetryPolicy};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::content::GenerateRequest;
use crate::types::errors::{GenerationError, LoadError};
use crate::types::keyword::KeywordOptions;

/// Content provider built on first use.
pub type LazyContentProvider = LazyWithRetry<Arc<dyn ContentProvider>>;

/// Central application struct.
///
/// ContentManager and RecentManager are created on demand via
/// `db.connection()` because they borrow the connection with a lifetime.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub env: EnvConfig,
    pub export_dir: PathBuf,
    policy: RetryPolicy,
    generator: Arc<LazyContentProvider>,
}

fn lazy_generator(env: &EnvConfig, policy: RetryPolicy) -> Arc<LazyContentProvider> {
    let env = env.clone();
    Arc::new(LazyWithRetry::new(policy, move || {
        let env = env.clone();
        async move {
            select_content_provider(&env, policy).map_err(|e| match e {
                GenerationError::Network(msg) => LoadError::Transient(msg),
                other => LoadError::Fatal(other.to_string()),
            })
        }
    }))
}

fn stored_bypass_flag(db: &Database) -> bool {
    LocalStore::new(db.connection())
        .get_flag(BYPASS_AUTH_KEY)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored bypass flag");
            false
        })
}

impl App {
    /// Opens the database at `db_path` and loads settings from
    /// `settings_path` (platform default when `None`).
    pub fn new(
        db_path: &Path,
        settings_path: Option<String>,
        env: EnvConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_database(db, SettingsEngine::new(settings_path), env))
    }

    /// Builds the app around an already opened database.
    pub fn with_database(db: Arc<Database>, mut settings_engine: SettingsEngine, env: EnvConfig) -> Self {
        if let Err(e) = settings_engine.load() {
            tracing::warn!(error = %e, "settings unreadable, using defaults");
        }
        let policy = RetryPolicy::default();
        let stored_bypass = stored_bypass_flag(&db);
        let effective = EnvConfig {
            bypass_auth: env.bypass_auth || stored_bypass,
            ..env.clone()
        };
        Self {
            generator: lazy_generator(&effective, policy),
            db,
            settings_engine,
            env,
            export_dir: platform::get_data_dir().join("exports"),
            policy,
        }
    }

    /// The environment with the stored bypass flag folded in. Provider
    /// selection and validation read this, not `env`.
    pub fn effective_env(&self) -> EnvConfig {
        EnvConfig {
            bypass_auth: self.bypass_auth(),
            ..self.env.clone()
        }
    }

    /// Stores the bypass flag and rebuilds the content provider with it.
    pub fn set_bypass_auth(&mut self, enabled: bool) -> Result<(), rusqlite::Error> {
        LocalStore::new(self.db.connection()).set_flag(BYPASS_AUTH_KEY, enabled)?;
        self.generator = lazy_generator(&self.effective_env(), self.policy);
        tracing::info!(enabled, effective = self.bypass_auth(), "auth bypass updated");
        Ok(())
    }

    /// Handle to the lazily built content provider. Clone it out before
    /// awaiting so the app lock is not held across the request.
    pub fn generator(&self) -> Arc<LazyContentProvider> {
        self.generator.clone()
    }

    /// Replaces the content provider, e.g. with a test double.
    pub fn set_generator(&mut self, provider: Arc<dyn ContentProvider>) {
        self.generator = Arc::new(LazyWithRetry::new(self.policy, move || {
            let provider = provider.clone();
            async move { Ok::<_, LoadError>(provider) }
        }));
    }

    /// Keyword provider for the current configuration and stored SerpApi key.
    pub fn keyword_provider(&self) -> Arc<dyn KeywordProvider> {
        let key = LocalStore::new(self.db.connection())
            .get(SERPAPI_API_KEY)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not read stored SerpApi key");
                None
            });
        select_keyword_provider(&self.env, key, self.policy)
    }

    /// True when either the environment or the stored flag bypasses auth.
    pub fn bypass_auth(&self) -> bool {
        self.env.bypass_auth || stored_bypass_flag(&self.db)
    }

    /// Builds a generation request from `params`, filling gaps from settings.
    pub fn generation_request(
        &self,
        title: &str,
        keywords: Vec<String>,
        language: Option<String>,
        tone: Option<crate::types::content::Tone>,
        word_count: Option<u32>,
        outline: Option<Vec<String>>,
    ) -> GenerateRequest {
        let defaults = &self.settings_engine.get_settings().generation;
        let outline = outline
            .filter(|o| !o.is_empty())
            .or_else(|| Some(defaults.default_outline.clone()).filter(|o| !o.is_empty()));
        GenerateRequest {
            title: title.trim().to_string(),
            keywords,
            language: language.unwrap_or_else(|| defaults.language.clone()),
            tone: tone.unwrap_or(defaults.tone),
            word_count: word_count.unwrap_or(defaults.word_count),
            outline,
        }
    }

    /// Keyword options with settings defaults for missing fields.
    pub fn keyword_options(&self, language: Option<String>, location: Option<String>) -> KeywordOptions {
        let defaults = &self.settings_engine.get_settings().keywords;
        KeywordOptions {
            language: language.unwrap_or_else(|| defaults.language.clone()),
            location: location.unwrap_or_else(|| defaults.location.clone()),
        }
    }
}
