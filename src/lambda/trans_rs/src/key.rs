use std::borrow::Cow;

use uuid::Uuid;

use crate::error::TransError;

/// S3 event keys are form-encoded: `+` is a space, everything else is
/// percent-encoded. `%2B` still decodes to a literal `+`.
pub fn decode_key(raw: &str) -> Result<String, TransError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(Cow::into_owned)
        .map_err(|source| TransError::DecodeKey {
            key: raw.to_string(),
            source,
        })
}

/// Keys follow `{account}/{project}/{file}`. An empty project segment
/// (`acct//file.mp4`) counts as missing, unlike the earlier upload handler
/// which submitted such keys with an empty project.
pub fn project_segment(key: &str) -> Option<&str> {
    key.split('/').nth(1).filter(|segment| !segment.is_empty())
}

/// Time-ordered id; its string form sorts in creation order.
pub fn new_job_id() -> String {
    Uuid::now_v7().to_string()
}
