// SEOForge shared type definitions
// Each submodule defines types used across the application.

pub mod content;
pub mod errors;
pub mod keyword;
pub mod lenient;
pub mod recent;
pub mod search;
pub mod settings;
