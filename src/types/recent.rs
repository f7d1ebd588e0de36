use serde::{Deserialize, Serialize};

/// An entry of the recently viewed list.
///
/// `updated_at` is kept as the string the writer supplied (RFC 3339 when
/// written by this crate) so lists written by other clients still parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentItem {
    pub id: String,
    pub title: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}
