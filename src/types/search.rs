use serde::{Deserialize, Serialize};

/// A record the fuzzy search can rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Per-field weights added to an item's score for every matching token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchWeights {
    pub title: u32,
    pub keywords: u32,
    pub content: u32,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            title: 3,
            keywords: 2,
            content: 1,
        }
    }
}
