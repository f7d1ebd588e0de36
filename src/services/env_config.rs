//! Environment-driven configuration.
//!
//! Reads the flags that select backend behaviour (mock content, auth bypass,
//! SerpApi) and the edge function endpoint. Each variable is also accepted
//! with the `VITE_` prefix used by the web build.

use serde::Serialize;

use crate::types::errors::ConfigError;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const USE_MOCK_CONTENT: &str = "USE_MOCK_CONTENT";
pub const BYPASS_AUTH: &str = "BYPASS_AUTH";
pub const ENABLE_SERPAPI: &str = "ENABLE_SERPAPI";

/// Configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnvConfig {
    pub supabase_url: Option<String>,
    #[serde(skip_serializing)]
    pub supabase_anon_key: Option<String>,
    pub use_mock_content: bool,
    pub bypass_auth: bool,
    pub enable_serpapi: bool,
}

/// Severity of a configuration finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
}

/// One finding from [`EnvConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    pub level: IssueLevel,
    pub variable: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(variable: &str, message: &str) -> Self {
        Self {
            level: IssueLevel::Error,
            variable: variable.to_string(),
            message: message.to_string(),
        }
    }

    fn warning(variable: &str, message: &str) -> Self {
        Self {
            level: IssueLevel::Warning,
            variable: variable.to_string(),
            message: message.to_string(),
        }
    }
}

/// Loads `.env` from the working directory if present. Missing files are fine.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to parse .env"),
    }
}

/// `true`, `1`, `yes`, `on` (any case) are true; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl EnvConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves every variable through `lookup`, trying `NAME` then `VITE_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&format!("VITE_{}", name)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |name: &str| get(name).map(|v| parse_flag(&v)).unwrap_or(false);

        Self {
            supabase_url: get(SUPABASE_URL).map(|u| u.trim_end_matches('/').to_string()),
            supabase_anon_key: get(SUPABASE_ANON_KEY),
            use_mock_content: flag(USE_MOCK_CONTENT),
            bypass_auth: flag(BYPASS_AUTH),
            enable_serpapi: flag(ENABLE_SERPAPI),
        }
    }

    /// Base URL of the edge functions, or an error naming what is missing.
    pub fn functions_base(&self) -> Result<String, ConfigError> {
        let url = self
            .supabase_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar(SUPABASE_URL.to_string()))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "{} must start with http:// or https://",
                SUPABASE_URL
            )));
        }
        Ok(format!("{}/functions/v1", url))
    }

    /// Lists everything wrong or suspicious in the configuration.
    ///
    /// Mock mode needs nothing. Otherwise the URL is required, and so is the
    /// anon key unless auth is bypassed.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(url) = &self.supabase_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                issues.push(ConfigIssue::error(
                    SUPABASE_URL,
                    "must start with http:// or https://",
                ));
            }
        }

        if !self.use_mock_content {
            if self.supabase_url.is_none() {
                issues.push(ConfigIssue::error(
                    SUPABASE_URL,
                    "required unless USE_MOCK_CONTENT is enabled",
                ));
            }
            if self.supabase_anon_key.is_none() && !self.bypass_auth {
                issues.push(ConfigIssue::error(
                    SUPABASE_ANON_KEY,
                    "required unless USE_MOCK_CONTENT or BYPASS_AUTH is enabled",
                ));
            }
        }

        if self.enable_serpapi && self.supabase_url.is_none() {
            issues.push(ConfigIssue::warning(
                ENABLE_SERPAPI,
                "SerpApi is enabled but SUPABASE_URL is not set; keyword research falls back to mock data",
            ));
        }

        if self.use_mock_content && self.enable_serpapi {
            issues.push(ConfigIssue::warning(
                ENABLE_SERPAPI,
                "ignored while USE_MOCK_CONTENT is enabled",
            ));
        }

        issues
    }

    /// True when [`validate`](Self::validate) reports no errors.
    pub fn is_valid(&self) -> bool {
        !self.validate().iter().any(|i| i.level == IssueLevel::Error)
    }
}
