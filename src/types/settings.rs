use serde::{Deserialize, Serialize};

use super::content::Tone;

/// Top-level user settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppSettings {
    pub generation: GenerationSettings,
    pub recent: RecentSettings,
    pub keywords: KeywordSettings,
}

/// Defaults used to pre-fill the generation form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    pub language: String,
    pub tone: Tone,
    pub word_count: u32,
    #[serde(default)]
    pub default_outline: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            tone: Tone::Professional,
            word_count: 800,
            default_outline: Vec::new(),
        }
    }
}

/// Recently viewed widget settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentSettings {
    pub display_limit: usize,
    #[serde(default = "default_locale")]
    pub date_locale: String,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for RecentSettings {
    fn default() -> Self {
        Self {
            display_limit: 5,
            date_locale: default_locale(),
        }
    }
}

/// Keyword research settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordSettings {
    pub language: String,
    pub location: String,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            location: "United States".to_string(),
        }
    }
}
