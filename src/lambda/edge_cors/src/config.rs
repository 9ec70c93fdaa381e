use std::collections::HashMap;

use aws_sdk_s3 as s3;
use lambda_runtime::tracing::info;
use serde::Deserialize;

use crate::error::FilterError;

pub const CONFIG_KEY: &str = "config.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectEntry {
    #[serde(rename = "allowedOrigins")]
    pub allowed_origins: Vec<String>,
}

/// Per-project origin allow-list, as stored in `config.json`:
/// `{ "<project>": { "allowedOrigins": ["https://..."] } }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProjectConfig {
    projects: HashMap<String, ProjectEntry>,
}

impl ProjectConfig {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FilterError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// An unknown project and an unlisted origin are both a plain "no".
    pub fn allows(&self, project: &str, origin: &str) -> bool {
        self.projects
            .get(project)
            .is_some_and(|entry| entry.allowed_origins.iter().any(|o| o == origin))
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

pub trait ConfigStore {
    async fn fetch_config(&self, bucket: &str) -> Result<ProjectConfig, FilterError>;
}

impl ConfigStore for s3::Client {
    async fn fetch_config(&self, bucket: &str) -> Result<ProjectConfig, FilterError> {
        info!("Loading {} from bucket {}", CONFIG_KEY, bucket);
        let object = self.get_object()
            .bucket(bucket)
            .key(CONFIG_KEY)
            .send().await
            .map_err(|source| FilterError::FetchConfig {
                bucket: bucket.to_string(),
                source,
            })?;
        let body = object.body.collect().await?.into_bytes();
        ProjectConfig::from_slice(&body)
    }
}
