use thiserror::Error;

// === RecentError ===

/// Errors related to the recently viewed store.
#[derive(Debug, Error)]
pub enum RecentError {
    /// Database operation failed.
    #[error("Recent list database error: {0}")]
    DatabaseError(String),
    /// Failed to serialize the recent list.
    #[error("Recent list serialization error: {0}")]
    SerializationError(String),
}

// === ContentError ===

/// Errors related to stored content documents.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Content document with the given ID was not found.
    #[error("Content not found: {0}")]
    NotFound(String),
    /// The document has no revision to restore.
    #[error("Nothing to undo for content: {0}")]
    NothingToUndo(String),
    /// Revision with the given ID was not found.
    #[error("Revision not found: {0}")]
    RevisionNotFound(String),
    /// Database operation failed.
    #[error("Content database error: {0}")]
    DatabaseError(String),
    /// Failed to serialize or deserialize stored fields.
    #[error("Content serialization error: {0}")]
    SerializationError(String),
}

// === GenerationError ===

/// Errors related to content generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request could not reach the generation endpoint.
    #[error("Generation network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-success HTTP status.
    #[error("Generation API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// The backend reported `success: false`.
    #[error("Generation failed: {0}")]
    Backend(String),
    /// The response body could not be parsed.
    #[error("Generation parse error: {0}")]
    Parse(String),
    /// The request is invalid before it is sent.
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),
    /// No usable provider is configured.
    #[error("Generation not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerationError::Parse(err.to_string())
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

// === KeywordError ===

/// Errors related to keyword research.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// The request could not reach the keyword endpoint.
    #[error("Keyword network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-success HTTP status.
    #[error("Keyword API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// The response body could not be parsed.
    #[error("Keyword parse error: {0}")]
    Parse(String),
    /// The seed keyword is empty.
    #[error("Seed keyword must not be empty")]
    EmptySeed,
    /// No usable provider is configured.
    #[error("Keyword research not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for KeywordError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            KeywordError::Parse(err.to_string())
        } else {
            KeywordError::Network(err.to_string())
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ConfigError ===

/// Errors raised while reading environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    /// A variable is set to an unusable value.
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),
}

// === ExportError ===

/// Errors related to exporting keywords or documents.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding failed.
    #[error("CSV export error: {0}")]
    Csv(String),
    /// Writing the export file failed.
    #[error("Export I/O error: {0}")]
    Io(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// === LoadError ===

/// Outcome classification for lazily loaded values.
///
/// The producer decides which variant applies; `Transient` failures are
/// retried with backoff, `Fatal` ones are returned immediately.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    /// A failure expected to clear on its own (stale asset, dropped connection).
    #[error("Transient load failure: {0}")]
    Transient(String),
    /// A failure that retrying cannot fix.
    #[error("Load failed: {0}")]
    Fatal(String),
}
