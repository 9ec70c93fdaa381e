use lambda_runtime::tracing::{debug, info};
use tokio::sync::OnceCell;

use crate::config::{ConfigStore, ProjectConfig};
use crate::error::FilterError;
use crate::event::{CloudFrontRequest, CloudFrontResponse};

pub const ORIGIN_HEADER: &str = "origin";
pub const BUCKET_HEADER: &str = "input-bucket-name";

/// State that lives as long as the Lambda process: the store the allow-list
/// is read from and the allow-list itself once it has been read.
pub struct FilterContext<S: ConfigStore> {
    store: S,
    config: OnceCell<ProjectConfig>,
}

impl<S: ConfigStore> FilterContext<S> {
    pub fn new(store: S) -> Self {
        FilterContext {
            store,
            config: OnceCell::new(),
        }
    }

    /// Loads the allow-list on first use and keeps it for the rest of the
    /// process. A failed load leaves the cell empty.
    async fn project_config(&self, bucket: &str) -> Result<&ProjectConfig, FilterError> {
        self.config.get_or_try_init(|| async {
            let config = self.store.fetch_config(bucket).await?;
            info!("Loaded config for {} projects", config.project_count());
            Ok::<_, FilterError>(config)
        }).await
    }

    pub async fn filter(&self, request: &CloudFrontRequest, mut response: CloudFrontResponse)
        -> Result<CloudFrontResponse, FilterError> {
        let Some(origin) = request.header(ORIGIN_HEADER) else {
            debug!("No origin header on {}", request.uri);
            return Ok(response);
        };

        let bucket = request.header(BUCKET_HEADER).ok_or(FilterError::MissingBucketHeader)?;
        let config = self.project_config(bucket).await?;

        let Some(project) = project_segment(&request.uri) else {
            info!("Failed to find project in {}", request.uri);
            return Ok(response);
        };

        if config.allows(project, origin) {
            response.set_header("Access-Control-Allow-Origin", origin);
            response.set_header("Vary", "Origin");
            info!("Allowed origin {} in project {}", origin, project);
        } else {
            info!("Failed to find origin {} in project {}", origin, project);
        }
        Ok(response)
    }
}

/// `/proj1/video.mp4` -> `proj1`. The leading slash makes segment 0 empty.
pub fn project_segment(uri: &str) -> Option<&str> {
    uri.split('/').nth(1).filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::event::{HeaderEntry, Headers};

    struct FakeStore {
        body: &'static str,
        fetches: AtomicUsize,
    }

    impl FakeStore {
        fn new(body: &'static str) -> Self {
            FakeStore { body, fetches: AtomicUsize::new(0) }
        }
    }

    impl ConfigStore for FakeStore {
        async fn fetch_config(&self, bucket: &str) -> Result<ProjectConfig, FilterError> {
            assert_eq!(bucket, "videos-input");
            self.fetches.fetch_add(1, Ordering::SeqCst);
            ProjectConfig::from_slice(self.body.as_bytes())
        }
    }

    const CONFIG: &str = r#"{ "proj1": { "allowedOrigins": ["https://example.com"] } }"#;

    fn request(uri: &str, headers: &[(&str, &str)]) -> CloudFrontRequest {
        let headers: Headers = headers.iter()
            .map(|(name, value)| (name.to_string(), vec![HeaderEntry::new(name, value)]))
            .collect();
        CloudFrontRequest {
            uri: uri.to_string(),
            headers,
            rest: Default::default(),
        }
    }

    fn response() -> CloudFrontResponse {
        serde_json::from_value(json!({
            "status": "200",
            "headers": { "content-type": [{ "key": "Content-Type", "value": "video/mp4" }] }
        })).unwrap()
    }

    fn browser_request(uri: &str, origin: &str) -> CloudFrontRequest {
        request(uri, &[("origin", origin), ("input-bucket-name", "videos-input")])
    }

    #[tokio::test]
    async fn adds_cors_headers_for_allowed_origin() {
        let ctx = FilterContext::new(FakeStore::new(CONFIG));

        let result = ctx.filter(&browser_request("/proj1/video.mp4", "https://example.com"), response())
            .await.unwrap();

        assert_eq!(
            result.headers["access-control-allow-origin"],
            vec![HeaderEntry::new("Access-Control-Allow-Origin", "https://example.com")]
        );
        assert_eq!(result.headers["vary"], vec![HeaderEntry::new("Vary", "Origin")]);
        assert_eq!(result.headers["content-type"][0].value, "video/mp4");
    }

    #[tokio::test]
    async fn leaves_headers_alone_for_unknown_origin_or_project() {
        let ctx = FilterContext::new(FakeStore::new(CONFIG));

        for (uri, origin) in [
            ("/proj1/video.mp4", "https://evil.example"),
            ("/proj2/video.mp4", "https://example.com"),
        ] {
            let result = ctx.filter(&browser_request(uri, origin), response()).await.unwrap();
            assert_eq!(result.headers, response().headers);
        }
    }

    #[tokio::test]
    async fn missing_origin_skips_everything() {
        let store = FakeStore::new(CONFIG);
        let ctx = FilterContext::new(store);

        // no bucket header either, which would otherwise be fatal
        let result = ctx.filter(&request("/proj1/video.mp4", &[]), response()).await.unwrap();

        assert_eq!(result.headers, response().headers);
        assert_eq!(ctx.store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_bucket_header_is_fatal() {
        let ctx = FilterContext::new(FakeStore::new(CONFIG));
        let req = request("/proj1/video.mp4", &[("origin", "https://example.com")]);

        let result = ctx.filter(&req, response()).await;

        assert!(matches!(result, Err(FilterError::MissingBucketHeader)));
    }

    #[tokio::test]
    async fn uri_without_project_is_unmodified() {
        let ctx = FilterContext::new(FakeStore::new(CONFIG));

        for uri in ["", "/", "proj1"] {
            let result = ctx.filter(&browser_request(uri, "https://example.com"), response())
                .await.unwrap();
            assert_eq!(result.headers, response().headers);
        }
    }

    #[tokio::test]
    async fn config_is_fetched_once_per_process() {
        let ctx = FilterContext::new(FakeStore::new(CONFIG));
        let req = browser_request("/proj1/video.mp4", "https://example.com");

        let first = ctx.filter(&req, response()).await.unwrap();
        let second = ctx.filter(&req, response()).await.unwrap();

        assert_eq!(first.headers, second.headers);
        assert_eq!(ctx.store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn broken_config_fails_and_is_retried() {
        let ctx = FilterContext::new(FakeStore::new("{ not json"));
        let req = browser_request("/proj1/video.mp4", "https://example.com");

        assert!(matches!(ctx.filter(&req, response()).await, Err(FilterError::ParseConfig(_))));
        assert!(matches!(ctx.filter(&req, response()).await, Err(FilterError::ParseConfig(_))));
        assert_eq!(ctx.store.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn project_is_second_path_segment() {
        assert_eq!(project_segment("/proj1/video.mp4"), Some("proj1"));
        assert_eq!(project_segment("/proj1"), Some("proj1"));
        assert_eq!(project_segment("/"), None);
        assert_eq!(project_segment("//video.mp4"), None);
        assert_eq!(project_segment("video.mp4"), None);
    }
}
