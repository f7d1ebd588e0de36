use serde::{Deserialize, Serialize};

use super::lenient;

/// Options forwarded to the keyword research backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordOptions {
    pub language: String,
    pub location: String,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            location: "United States".to_string(),
        }
    }
}

/// Body of a `serpapi-keywords` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRequest {
    pub seed_keyword: String,
    pub options: KeywordOptions,
}

/// A single researched keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetrics {
    pub keyword: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub search_volume: u64,
    #[serde(default, deserialize_with = "lenient::index")]
    pub difficulty: u8,
    #[serde(default, deserialize_with = "lenient::label")]
    pub competition: String,
    #[serde(default, deserialize_with = "lenient::index")]
    pub competition_index: u8,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub cpc: f64,
}

/// Monthly interest point for the seed keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default, deserialize_with = "lenient::small_count")]
    pub value: u32,
}

/// Response of the `serpapi-keywords` edge function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct KeywordResearch {
    #[serde(default)]
    pub keywords: Vec<KeywordMetrics>,
    #[serde(default)]
    pub trends: Vec<TrendPoint>,
}
