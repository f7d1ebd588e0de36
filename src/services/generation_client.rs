//! Content generation providers.
//!
//! [`EdgeContentProvider`] calls the hosted `generate-content` function;
//! [`MockContentProvider`] builds deterministic HTML locally and backs the
//! mock-content mode. Both sit behind [`ContentProvider`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::services::content_length::{count_words_from_html, strip_tags};
use crate::services::env_config::EnvConfig;
use crate::services::fuzzy_search::normalize;
use crate::services::html_sections::{
    clean_section_fragment, escape_html, extract_h2_headings, headings_match, replace_section,
    split_sections,
};
use crate::services::lazy_retry::{retry_load, RetryPolicy};
use crate::types::content::{
    ContentDocument, GenerateRequest, GenerateResponse, GeneratedContent, GenerationResult,
};
use crate::types::errors::GenerationError;

/// Header carrying the caller's request id; the backend echoes it back.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound on expansion rounds when padding content to the target length.
pub const MAX_EXPANSION_ROUNDS: usize = 8;

/// Largest word count a request may ask for.
pub const MAX_WORD_COUNT: u32 = 10_000;

/// Headings used when the request has no outline.
pub const DEFAULT_OUTLINE: [&str; 3] = ["Overview", "Key Benefits", "Getting Started"];

/// A source of generated content.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short provider name reported as `providerUsed`.
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, GenerationError>;
}

/// Rejects requests the backend would refuse anyway.
pub fn validate_request(request: &GenerateRequest) -> Result<(), GenerationError> {
    if request.title.trim().is_empty() {
        return Err(GenerationError::InvalidRequest("title must not be empty".to_string()));
    }
    if request.word_count == 0 || request.word_count > MAX_WORD_COUNT {
        return Err(GenerationError::InvalidRequest(format!(
            "wordCount must be between 1 and {}",
            MAX_WORD_COUNT
        )));
    }
    if let Some(outline) = &request.outline {
        if outline.iter().all(|item| item.trim().is_empty()) && !outline.is_empty() {
            return Err(GenerationError::InvalidRequest("outline items must not be blank".to_string()));
        }
    }
    Ok(())
}

// ─── Edge function ───

/// Client for `{base}/generate-content`.
#[derive(Clone)]
pub struct EdgeContentProvider {
    client: reqwest::Client,
    functions_base: String,
    anon_key: Option<String>,
    policy: RetryPolicy,
}

impl EdgeContentProvider {
    /// `functions_base` is the `…/functions/v1` URL.
    pub fn new(
        functions_base: impl Into<String>,
        anon_key: Option<String>,
        policy: RetryPolicy,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            functions_base: functions_base.into().trim_end_matches('/').to_string(),
            anon_key,
            policy,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/generate-content", self.functions_base)
    }

    async fn send_once(builder: reqwest::RequestBuilder) -> Result<GenerateResponse, GenerationError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| GenerationError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ContentProvider for EdgeContentProvider {
    fn name(&self) -> &str {
        "edge"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, GenerationError> {
        validate_request(request)?;
        let request_id = Uuid::new_v4().to_string();
        let url = self.endpoint();
        tracing::info!(request_id = %request_id, title = %request.title, "requesting generation");

        let response = retry_load(&self.policy, || {
            let mut builder = self
                .client
                .post(&url)
                .header(REQUEST_ID_HEADER, &request_id)
                .json(request);
            if let Some(key) = &self.anon_key {
                builder = builder.bearer_auth(key).header("apikey", key);
            }
            Self::send_once(builder)
        })
        .await?;

        if !response.success {
            let message = response.error.unwrap_or_else(|| "unknown backend error".to_string());
            tracing::warn!(request_id = %request_id, error = %message, "backend reported failure");
            return Err(GenerationError::Backend(message));
        }
        let content = response
            .content
            .ok_or_else(|| GenerationError::Parse("response has no content".to_string()))?;
        let provider_used = response.provider_used.unwrap_or_else(|| "unknown".to_string());
        let echoed = response.request_id.unwrap_or(request_id);
        tracing::info!(request_id = %echoed, provider = %provider_used, "generation complete");

        Ok(GenerationResult {
            content,
            provider_used,
            request_id: echoed,
        })
    }
}

// ─── Mock ───

const PARAGRAPH_TEMPLATES: [&str; 4] = [
    "{heading} matters because people searching for {keyword} want clear and practical answers. \
     This part explains the essentials, shows where {keyword} fits into everyday work, and points \
     out the small mistakes that most often hold results back.",
    "A good starting point is to look at how {keyword} is used today. Teams that plan around \
     {heading_lower} tend to publish faster, measure what works, and keep their pages relevant \
     long after the first draft goes live.",
    "When you review {heading_lower}, keep the reader in mind. Short sentences, concrete examples \
     and honest comparisons build trust, and they help search engines understand that the page \
     covers {keyword} in real depth.",
    "Finally, treat {heading_lower} as something to revisit. Check the numbers every few weeks, \
     update examples that have aged, and expand the sections readers spend the most time on so \
     the page keeps earning traffic for {keyword}.",
];

/// Deterministic offline provider.
///
/// Emits one `<h2>` per outline item, in order, and pads section bodies until
/// the requested word count is reached.
#[derive(Debug, Clone, Default)]
pub struct MockContentProvider;

impl MockContentProvider {
    pub fn new() -> Self {
        Self
    }

    fn headings(request: &GenerateRequest) -> Vec<String> {
        let outline: Vec<String> = request
            .outline
            .as_ref()
            .map(|items| {
                items
                    .iter()
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        if outline.is_empty() {
            DEFAULT_OUTLINE.iter().map(|h| h.to_string()).collect()
        } else {
            outline
        }
    }

    fn keyword_at(request: &GenerateRequest, idx: usize) -> String {
        let keywords: Vec<&String> = request.keywords.iter().filter(|k| !k.trim().is_empty()).collect();
        if keywords.is_empty() {
            request.title.to_lowercase()
        } else {
            keywords[idx % keywords.len()].trim().to_string()
        }
    }

    fn paragraph(request: &GenerateRequest, heading: &str, section: usize, index: usize) -> String {
        let template = PARAGRAPH_TEMPLATES[(section + index) % PARAGRAPH_TEMPLATES.len()];
        let text = template
            .replace("{heading_lower}", &heading.to_lowercase())
            .replace("{heading}", heading)
            .replace("{keyword}", &Self::keyword_at(request, section + index));
        format!("<p>{}</p>", escape_html(&text))
    }

    fn assemble(title: &str, intro: &str, sections: &[(String, Vec<String>)]) -> String {
        let mut html = format!("<h1>{}</h1>\n{}", escape_html(title), intro);
        for (heading, paragraphs) in sections {
            html.push_str(&format!("\n<h2>{}</h2>\n", escape_html(heading)));
            html.push_str(&paragraphs.join("\n"));
        }
        html
    }

    fn meta_description(request: &GenerateRequest) -> String {
        let keywords: Vec<&str> = request
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        let text = if keywords.is_empty() {
            format!("{}: a {} guide.", request.title.trim(), request.tone.as_str())
        } else {
            format!(
                "{}: a {} guide covering {}.",
                request.title.trim(),
                request.tone.as_str(),
                keywords.join(", ")
            )
        };
        if text.chars().count() <= 160 {
            text
        } else {
            let cut: String = text.chars().take(157).collect();
            format!("{}...", cut.trim_end())
        }
    }

    /// Builds the document synchronously; exposed for callers without a runtime.
    pub fn build(&self, request: &GenerateRequest) -> GeneratedContent {
        let headings = Self::headings(request);
        let intro = format!(
            "<p>{}</p>",
            escape_html(&format!(
                "This guide to {} walks through {} in a {} tone.",
                request.title.trim(),
                Self::keyword_at(request, 0),
                request.tone.as_str()
            ))
        );

        let mut sections: Vec<(String, Vec<String>)> = headings
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), vec![Self::paragraph(request, h, i, 0)]))
            .collect();

        let target = request.word_count as usize;
        let mut html = Self::assemble(&request.title, &intro, &sections);
        for round in 0..MAX_EXPANSION_ROUNDS {
            let words = count_words_from_html(&html);
            if words >= target {
                break;
            }
            let per_paragraph = sections
                .first()
                .and_then(|(_, ps)| ps.first())
                .map(|p| count_words_from_html(p).max(1))
                .unwrap_or(40);
            let needed = (target - words).div_ceil(per_paragraph * sections.len().max(1));
            for (i, (heading, paragraphs)) in sections.iter_mut().enumerate() {
                for _ in 0..needed {
                    let next = paragraphs.len();
                    paragraphs.push(Self::paragraph(request, heading, i, next));
                }
            }
            html = Self::assemble(&request.title, &intro, &sections);
            tracing::debug!(round, words = count_words_from_html(&html), target, "expanded mock content");
        }

        let seo_score = score_content(&html, &request.title, &request.keywords, request.word_count);
        GeneratedContent {
            content: html,
            title: request.title.trim().to_string(),
            meta_description: Self::meta_description(request),
            seo_score: Some(seo_score),
        }
    }
}

#[async_trait]
impl ContentProvider for MockContentProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, GenerationError> {
        validate_request(request)?;
        let request_id = Uuid::new_v4().to_string();
        let content = self.build(request);
        tracing::info!(request_id = %request_id, words = count_words_from_html(&content.content), "mock generation complete");
        Ok(GenerationResult {
            content,
            provider_used: self.name().to_string(),
            request_id,
        })
    }
}

/// Rough on-page score in `0..=100`.
///
/// Up to 25 points for the primary keyword in the title, 25 for keyword
/// coverage in the body, 20 for a keyword in any `<h2>`, and 30 for reaching
/// the target length.
pub fn score_content(html: &str, title: &str, keywords: &[String], target_words: u32) -> u8 {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| normalize(k))
        .filter(|k| !k.is_empty())
        .collect();
    let body = normalize(&strip_tags(html));
    let title = normalize(title);
    let headings: Vec<String> = extract_h2_headings(html).iter().map(|h| normalize(h)).collect();

    let mut score = 0.0;
    if let Some(primary) = keywords.first() {
        if title.contains(primary.as_str()) {
            score += 25.0;
        }
        let covered = keywords.iter().filter(|k| body.contains(k.as_str())).count();
        score += 25.0 * covered as f64 / keywords.len() as f64;
        if headings.iter().any(|h| keywords.iter().any(|k| h.contains(k.as_str()))) {
            score += 20.0;
        }
    }
    if target_words > 0 {
        let ratio = count_words_from_html(html) as f64 / target_words as f64;
        score += 30.0 * ratio.min(1.0);
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Regenerates one section of `doc` and returns the updated HTML.
///
/// The provider is asked for a single-section outline; the matching section
/// body of its answer replaces the old body. The rest of the document is
/// kept byte for byte.
pub async fn regenerate_section(
    provider: &dyn ContentProvider,
    doc: &ContentDocument,
    heading: &str,
) -> Result<String, GenerationError> {
    if heading.trim().is_empty() {
        return Err(GenerationError::InvalidRequest("section heading must not be empty".to_string()));
    }
    let sections = split_sections(&doc.html).sections.len().max(1) as u32;
    let request = GenerateRequest {
        title: doc.title.clone(),
        keywords: doc.keywords.clone(),
        language: doc.language.clone(),
        tone: doc.tone,
        word_count: (doc.word_count_target / sections).max(150),
        outline: Some(vec![heading.trim().to_string()]),
    };

    let result = provider.generate(&request).await?;
    let generated = split_sections(&result.content.content);
    let body = generated
        .sections
        .iter()
        .find(|s| headings_match(&s.heading, heading))
        .map(|s| s.body.clone())
        .unwrap_or_else(|| clean_section_fragment(&result.content.content, heading));

    tracing::info!(content_id = %doc.id, heading, provider = %result.provider_used, "section regenerated");
    Ok(replace_section(&doc.html, heading, &body))
}

/// Picks the content provider for `config`.
///
/// Mock mode always wins. Otherwise the edge function needs a valid URL and,
/// unless auth is bypassed, the anon key.
pub fn select_content_provider(
    config: &EnvConfig,
    policy: RetryPolicy,
) -> Result<Arc<dyn ContentProvider>, GenerationError> {
    if config.use_mock_content {
        tracing::info!("mock content mode enabled");
        return Ok(Arc::new(MockContentProvider::new()));
    }
    let base = config
        .functions_base()
        .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;
    if config.supabase_anon_key.is_none() && !config.bypass_auth {
        return Err(GenerationError::NotConfigured(format!(
            "{} is not set",
            crate::services::env_config::SUPABASE_ANON_KEY
        )));
    }
    let provider = EdgeContentProvider::new(base, config.supabase_anon_key.clone(), policy)?;
    Ok(Arc::new(provider))
}
