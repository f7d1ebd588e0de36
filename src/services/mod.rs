// SEOForge services
// Text utilities, retry, configuration, remote providers, markup and export.

pub mod content_length;
pub mod env_config;
pub mod export;
pub mod fuzzy_search;
pub mod generation_client;
pub mod html_sections;
pub mod keyword_client;
pub mod lazy_retry;
pub mod seo_markup;
pub mod settings_engine;
