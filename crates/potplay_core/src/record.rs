use serde::Serialize;

/// Wire payload posted to the companion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushRecord {
    pub title: String,
    pub path: String,
    pub page_url: String,
}
