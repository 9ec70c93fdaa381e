use aws_config::SdkConfig;
use aws_sdk_mediaconvert as mediaconvert;
use lambda_runtime::tracing::info;
use mediaconvert::types::JobSettings;

use crate::error::TransError;

/// Finds the account-specific MediaConvert endpoint and hands back a client
/// bound to it.
pub trait EndpointDiscovery {
    type Submitter: JobSubmitter;

    async fn discover(&self) -> Result<Self::Submitter, TransError>;
}

pub trait JobSubmitter {
    /// Returns the id MediaConvert assigned to the job, if it sent one.
    async fn submit_job(&self, role: &str, settings: JobSettings) -> Result<Option<String>, TransError>;
}

pub struct MediaConvertDiscovery {
    config: SdkConfig,
}

impl MediaConvertDiscovery {
    pub fn new(config: SdkConfig) -> Self {
        MediaConvertDiscovery { config }
    }
}

impl EndpointDiscovery for MediaConvertDiscovery {
    type Submitter = mediaconvert::Client;

    // DescribeEndpoints is deprecated by the SDK but still answers with the
    // account endpoint this function submits to.
    #[allow(deprecated)]
    async fn discover(&self) -> Result<mediaconvert::Client, TransError> {
        let endpoints = mediaconvert::Client::new(&self.config)
            .describe_endpoints()
            .send().await?;
        let url = endpoints.endpoints()
            .first()
            .and_then(|endpoint| endpoint.url())
            .ok_or(TransError::NoEndpoint)?;
        info!("Using mediaconvert endpoint {}", url);

        let config = mediaconvert::config::Builder::from(&self.config)
            .endpoint_url(url)
            .build();
        Ok(mediaconvert::Client::from_conf(config))
    }
}

impl JobSubmitter for mediaconvert::Client {
    async fn submit_job(&self, role: &str, settings: JobSettings) -> Result<Option<String>, TransError> {
        let output = self.create_job()
            .role(role)
            .settings(settings)
            .send().await?;
        Ok(output.job().and_then(|job| job.id()).map(str::to_string))
    }
}
