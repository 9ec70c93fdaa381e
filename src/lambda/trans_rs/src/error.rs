use std::string::FromUtf8Error;

use aws_sdk_mediaconvert as mediaconvert;
use mediaconvert::error::SdkError;
use mediaconvert::operation::{create_job::CreateJobError, describe_endpoints::DescribeEndpointsError};

#[derive(Debug, thiserror::Error)]
pub enum TransError {
    #[error("{0} not set")]
    MissingEnv(&'static str),

    #[error("failed to describe mediaconvert endpoints: {0}")]
    DescribeEndpoints(#[from] SdkError<DescribeEndpointsError>),

    #[error("failed to find mediaconvert endpoint")]
    NoEndpoint,

    #[error("s3 record is missing bucket name or object key")]
    MissingObject,

    #[error("object key {key} is not valid utf-8 once decoded")]
    DecodeKey {
        key: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("missing project in key {0}")]
    MissingProject(String),

    #[error("failed to create mediaconvert job: {0}")]
    CreateJob(#[from] SdkError<CreateJobError>),

    #[error("{failed} of {total} job submissions failed")]
    Batch { failed: usize, total: usize },
}
