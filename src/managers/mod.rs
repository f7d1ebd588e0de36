// SEOForge state managers
// Managers own persistent state: the local key-value store, the recently viewed list, content documents.

pub mod content_manager;
pub mod local_store;
pub mod recent_manager;
