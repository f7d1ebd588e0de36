use serde::{Deserialize, Serialize};

use super::lenient;

/// Writing tone requested from the generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Friendly,
    Formal,
    Persuasive,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
            Tone::Persuasive => "persuasive",
        }
    }

    /// Parses a tone name; unknown names fall back to `Professional`.
    pub fn parse(s: &str) -> Tone {
        match s.trim().to_lowercase().as_str() {
            "casual" => Tone::Casual,
            "friendly" => Tone::Friendly,
            "formal" => Tone::Formal,
            "persuasive" => Tone::Persuasive,
            _ => Tone::Professional,
        }
    }
}

/// Body of a `generate-content` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub title: String,
    pub keywords: Vec<String>,
    pub language: String,
    pub tone: Tone,
    pub word_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<String>>,
}

/// The `content` object inside a generation response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    pub title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default, deserialize_with = "lenient::score")]
    pub seo_score: Option<u8>,
}

/// Full response of the `generate-content` edge function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub content: Option<GeneratedContent>,
    #[serde(default)]
    pub provider_used: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A stored content document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentDocument {
    pub id: String,
    pub title: String,
    pub keywords: Vec<String>,
    pub language: String,
    pub tone: Tone,
    pub word_count_target: u32,
    pub outline: Vec<String>,
    pub html: String,
    pub meta_description: String,
    pub seo_score: Option<u8>,
    pub provider_used: Option<String>,
    pub request_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Snapshot of a document's HTML taken before a mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRevision {
    pub id: String,
    pub content_id: String,
    pub html: String,
    pub reason: String,
    pub created_at: i64,
}

/// How a section differs between two versions of a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

/// One entry of a section-level diff. `heading` is `None` for the intro.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionDiff {
    pub heading: Option<String>,
    pub kind: DiffKind,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// A successful generation, whichever provider produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub content: GeneratedContent,
    pub provider_used: String,
    pub request_id: String,
}
