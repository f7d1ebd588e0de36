//! Keyword research providers.
//!
//! The hosted `serpapi-keywords` function is used when SerpApi is enabled and
//! mock mode is off; otherwise [`MockKeywordProvider`] derives stable numbers
//! from the seed so exports and charts still have data.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;

use crate::services::env_config::EnvConfig;
use crate::services::lazy_retry::{retry_load, RetryPolicy};
use crate::types::errors::KeywordError;
use crate::types::keyword::{
    KeywordMetrics, KeywordOptions, KeywordRequest, KeywordResearch, TrendPoint,
};

/// Header carrying a user-supplied SerpApi key to the edge function.
pub const SERPAPI_KEY_HEADER: &str = "x-serpapi-key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of monthly trend points returned by the mock.
pub const TREND_MONTHS: usize = 12;

/// A source of keyword metrics.
#[async_trait]
pub trait KeywordProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn research(&self, seed: &str, options: &KeywordOptions) -> Result<KeywordResearch, KeywordError>;
}

fn clean_seed(seed: &str) -> Result<String, KeywordError> {
    let seed = seed.split_whitespace().collect::<Vec<_>>().join(" ");
    if seed.is_empty() {
        Err(KeywordError::EmptySeed)
    } else {
        Ok(seed)
    }
}

/// Client for `{base}/serpapi-keywords`.
#[derive(Clone)]
pub struct EdgeKeywordProvider {
    client: reqwest::Client,
    functions_base: String,
    anon_key: Option<String>,
    serpapi_key: Option<String>,
    policy: RetryPolicy,
}

impl EdgeKeywordProvider {
    pub fn new(
        functions_base: impl Into<String>,
        anon_key: Option<String>,
        policy: RetryPolicy,
    ) -> Result<Self, KeywordError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KeywordError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            functions_base: functions_base.into().trim_end_matches('/').to_string(),
            anon_key,
            serpapi_key: None,
            policy,
        })
    }

    /// Forwards a user-supplied SerpApi key with every request.
    pub fn with_serpapi_key(mut self, key: Option<String>) -> Self {
        self.serpapi_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    async fn send_once(builder: reqwest::RequestBuilder) -> Result<KeywordResearch, KeywordError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(KeywordError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| KeywordError::Parse(e.to_string()))
    }
}

#[async_trait]
impl KeywordProvider for EdgeKeywordProvider {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn research(&self, seed: &str, options: &KeywordOptions) -> Result<KeywordResearch, KeywordError> {
        let body = KeywordRequest {
            seed_keyword: clean_seed(seed)?,
            options: options.clone(),
        };
        let url = format!("{}/serpapi-keywords", self.functions_base);
        tracing::info!(seed = %body.seed_keyword, location = %options.location, "requesting keyword research");

        let research = retry_load(&self.policy, || {
            let mut builder = self.client.post(&url).json(&body);
            if let Some(key) = &self.anon_key {
                builder = builder.bearer_auth(key).header("apikey", key);
            }
            if let Some(key) = &self.serpapi_key {
                builder = builder.header(SERPAPI_KEY_HEADER, key);
            }
            Self::send_once(builder)
        })
        .await?;

        tracing::info!(keywords = research.keywords.len(), "keyword research complete");
        Ok(research)
    }
}

const MOCK_VARIATIONS: [&str; 8] = [
    "{seed}",
    "best {seed}",
    "{seed} guide",
    "how to use {seed}",
    "{seed} tips",
    "{seed} vs alternatives",
    "free {seed}",
    "{seed} for beginners",
];

/// Deterministic offline keyword data.
#[derive(Debug, Clone, Default)]
pub struct MockKeywordProvider;

impl MockKeywordProvider {
    pub fn new() -> Self {
        Self
    }

    /// FNV-1a; stable across runs and platforms.
    fn hash(text: &str) -> u64 {
        text.bytes().fold(0xcbf2_9ce4_8422_2325, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
        })
    }

    fn competition_label(index: u8) -> &'static str {
        match index {
            0..=33 => "LOW",
            34..=66 => "MEDIUM",
            _ => "HIGH",
        }
    }

    fn metrics(keyword: String, rank: usize) -> KeywordMetrics {
        let h = Self::hash(&keyword);
        let base_volume = 1_000 + (h % 49_000);
        let search_volume = (base_volume / (rank as u64 + 1)).max(10) / 10 * 10;
        let competition_index = ((h >> 16) % 101) as u8;
        let difficulty = (((h >> 24) % 71) as u8 + 15).min(100);
        let cpc = (((h >> 32) % 900) as f64 + 20.0) / 100.0;
        KeywordMetrics {
            keyword,
            search_volume,
            difficulty,
            competition: Self::competition_label(competition_index).to_string(),
            competition_index,
            cpc,
        }
    }

    fn trends(seed: &str) -> Vec<TrendPoint> {
        let h = Self::hash(seed);
        let today = chrono::Utc::now().date_naive();
        let start = today
            .with_day(1)
            .unwrap_or(today)
            .checked_sub_months(chrono::Months::new(TREND_MONTHS as u32 - 1))
            .unwrap_or(today);
        (0..TREND_MONTHS)
            .map(|i| {
                let month = start
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap_or(start);
                let wave = ((i as u64 * 7 + (h % 13)) % 40) as u32;
                TrendPoint {
                    date: month.format("%Y-%m").to_string(),
                    value: 45 + wave + ((h >> (i % 8)) % 16) as u32,
                }
            })
            .collect()
    }

    /// Builds the research result synchronously.
    pub fn build(&self, seed: &str) -> Result<KeywordResearch, KeywordError> {
        let seed = clean_seed(seed)?.to_lowercase();
        let keywords = MOCK_VARIATIONS
            .iter()
            .enumerate()
            .map(|(rank, pattern)| Self::metrics(pattern.replace("{seed}", &seed), rank))
            .collect();
        Ok(KeywordResearch {
            keywords,
            trends: Self::trends(&seed),
        })
    }
}

#[async_trait]
impl KeywordProvider for MockKeywordProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn research(&self, seed: &str, _options: &KeywordOptions) -> Result<KeywordResearch, KeywordError> {
        let research = self.build(seed)?;
        tracing::debug!(seed, keywords = research.keywords.len(), "mock keyword research");
        Ok(research)
    }
}

/// Picks the keyword provider for `config`.
///
/// The edge function is used only when SerpApi is enabled, mock mode is off
/// and the functions URL resolves; anything else yields the mock.
pub fn select_keyword_provider(
    config: &EnvConfig,
    serpapi_key: Option<String>,
    policy: RetryPolicy,
) -> Arc<dyn KeywordProvider> {
    if config.enable_serpapi && !config.use_mock_content {
        match config.functions_base() {
            Ok(base) => match EdgeKeywordProvider::new(base, config.supabase_anon_key.clone(), policy) {
                Ok(provider) => return Arc::new(provider.with_serpapi_key(serpapi_key)),
                Err(e) => tracing::warn!(error = %e, "keyword client unavailable, using mock data"),
            },
            Err(e) => tracing::warn!(error = %e, "SerpApi enabled without a usable URL, using mock data"),
        }
    }
    Arc::new(MockKeywordProvider::new())
}
