use aws_sdk_s3 as s3;
use s3::operation::get_object::GetObjectError;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("missing input bucket name header")]
    MissingBucketHeader,

    #[error("empty CloudFront event")]
    EmptyEvent,

    #[error("failed to fetch config from bucket {bucket}: {source}")]
    FetchConfig {
        bucket: String,
        #[source]
        source: s3::error::SdkError<GetObjectError>,
    },

    #[error("failed to read config body: {0}")]
    ReadConfig(#[from] s3::primitives::ByteStreamError),

    #[error("invalid config json: {0}")]
    ParseConfig(#[from] serde_json::Error),
}
