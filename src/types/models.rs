//! Resource Models
//!
//! Response and request shapes for the resource accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum length of the `keywords` search field.
pub const MAX_SEARCH_KEYWORDS_LEN: usize = 400;

/// Account returned by `GET /accounts/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: i64,
    pub name: String,
}

/// Document owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOwner {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub owner_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A Lucid document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub edit_url: Option<String>,
    #[serde(default)]
    pub view_url: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified_user_id: Option<i64>,
    #[serde(default)]
    pub custom_tags: Vec<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trashed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub owner: Option<DocumentOwner>,
    /// Fields not modelled above (custom attributes, etc).
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Contents of a document (`GET /documents/{id}/contents`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub pages: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Body of `POST /documents/search`. `None` fields are omitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearchParameters {
    pub product: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Default for DocumentSearchParameters {
    fn default() -> Self {
        Self {
            product: vec!["lucidchart".to_string()],
            created_start_time: None,
            created_end_time: None,
            last_modified_after: None,
            keywords: None,
        }
    }
}

impl DocumentSearchParameters {
    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Truncate keywords to the provider limit, on a character boundary.
    pub(crate) fn normalized(mut self) -> Self {
        if let Some(keywords) = self.keywords.take() {
            self.keywords = Some(keywords.chars().take(MAX_SEARCH_KEYWORDS_LEN).collect());
        }
        self
    }
}
