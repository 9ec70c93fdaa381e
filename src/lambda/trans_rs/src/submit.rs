use aws_lambda_events::s3::S3EventRecord;
use futures::future::join_all;
use lambda_runtime::tracing::{error, info};
use tokio::sync::OnceCell;

use crate::endpoint::{EndpointDiscovery, JobSubmitter};
use crate::env::Settings;
use crate::error::TransError;
use crate::job::{job_settings, JobTarget};
use crate::key::{decode_key, new_job_id, project_segment};

/// Process-lifetime state: settings from the environment and the
/// endpoint-bound client once it has been discovered.
pub struct SubmitContext<D: EndpointDiscovery> {
    settings: Settings,
    discovery: D,
    client: OnceCell<D::Submitter>,
}

impl<D: EndpointDiscovery> SubmitContext<D> {
    pub fn new(settings: Settings, discovery: D) -> Self {
        SubmitContext {
            settings,
            discovery,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&D::Submitter, TransError> {
        self.client.get_or_try_init(|| self.discovery.discover()).await
    }

    /// Starts one job per record and waits for every one of them. Any failed
    /// record fails the whole batch; jobs that were accepted stay accepted.
    pub async fn submit_all(&self, records: &[S3EventRecord]) -> Result<Vec<String>, TransError> {
        let client = self.client().await?;

        let results = join_all(records.iter()
            .map(|record| self.submit_record(client, record))
        ).await;

        let total = results.len();
        let mut job_ids = Vec::with_capacity(total);
        let mut failed = 0;
        for result in results {
            match result {
                Ok(job_id) => job_ids.push(job_id),
                Err(err) => {
                    error!("Failed to submit job: {}", err);
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(TransError::Batch { failed, total });
        }
        Ok(job_ids)
    }

    async fn submit_record(&self, client: &D::Submitter, record: &S3EventRecord) -> Result<String, TransError> {
        let (Some(bucket), Some(raw_key)) = (record.s3.bucket.name.as_deref(), record.s3.object.key.as_deref()) else {
            return Err(TransError::MissingObject);
        };
        let file_key = decode_key(raw_key)?;
        let project = project_segment(&file_key)
            .ok_or_else(|| TransError::MissingProject(file_key.clone()))?;

        let job_id = new_job_id();
        let input_uri = format!("s3://{}/{}", bucket, file_key);
        let target = JobTarget {
            output_bucket: &self.settings.output_bucket,
            project,
            job_id: &job_id,
        };
        let service_id = client.submit_job(&self.settings.role_arn, job_settings(&input_uri, &target)).await?;
        info!("Submitted job {} for {} in project {} (mediaconvert id {})",
            job_id, input_uri, project, service_id.as_deref().unwrap_or("unknown"));
        Ok(job_id)
    }
}
