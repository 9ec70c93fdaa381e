use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lambda@Edge headers: lower-case name to the list of `{ key, value }` entries.
pub type Headers = BTreeMap<String, Vec<HeaderEntry>>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeaderEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: &str, value: &str) -> Self {
        HeaderEntry {
            key: Some(key.to_string()),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudFrontResponseEvent {
    #[serde(rename = "Records")]
    pub records: Vec<CloudFrontRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontPayload,
}

#[derive(Debug, Deserialize)]
pub struct CloudFrontPayload {
    pub request: CloudFrontRequest,
    pub response: CloudFrontResponse,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudFrontRequest {
    pub uri: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CloudFrontRequest {
    /// Value of the first entry for `name`, which must be lower-case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }
}

/// Origin response handed back to CloudFront. Fields this function does not
/// touch are carried through `rest` unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudFrontResponse {
    #[serde(default)]
    pub headers: Headers,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CloudFrontResponse {
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers
            .insert(key.to_lowercase(), vec![HeaderEntry::new(key, value)]);
    }
}
