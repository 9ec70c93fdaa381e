mod config;
mod error;
mod event;
mod filter;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3 as s3;
use lambda_runtime::{run, service_fn, tracing, Error, LambdaEvent};

use crate::config::ConfigStore;
use crate::error::FilterError;
use crate::event::{CloudFrontResponse, CloudFrontResponseEvent};
use crate::filter::FilterContext;

// Lambda@Edge replicas run in many regions but the config bucket does not.
const CONFIG_REGION: &str = "us-east-1";

async fn function_handler<S: ConfigStore>(ctx: &FilterContext<S>, event: LambdaEvent<CloudFrontResponseEvent>)
    -> Result<CloudFrontResponse, Error> {
    let record = event.payload.records.into_iter().next().ok_or(FilterError::EmptyEvent)?;
    Ok(ctx.filter(&record.cf.request, record.cf.response).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(CONFIG_REGION))
        .load().await;
    let ctx = FilterContext::new(s3::Client::new(&config));
    let ctx = &ctx;

    run(service_fn(move |event| async move { function_handler(ctx, event).await })).await
}
