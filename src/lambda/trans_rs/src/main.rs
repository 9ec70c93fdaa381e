mod endpoint;
mod env;
mod error;
mod job;
mod key;
mod submit;

use aws_config::BehaviorVersion;
use aws_lambda_events::s3::S3Event;
use lambda_runtime::{run, service_fn, tracing, Error, LambdaEvent};
use serde::Serialize;

use crate::endpoint::{EndpointDiscovery, MediaConvertDiscovery};
use crate::env::Settings;
use crate::submit::SubmitContext;

#[derive(Serialize)]
struct Response {
    job_ids: Vec<String>,
}

async fn function_handler<D: EndpointDiscovery>(ctx: &SubmitContext<D>, event: LambdaEvent<S3Event>)
    -> Result<Response, Error> {
    let job_ids = ctx.submit_all(&event.payload.records).await?;
    Ok(Response { job_ids })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let settings = Settings::from_env()?;
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let ctx = SubmitContext::new(settings, MediaConvertDiscovery::new(config));
    let ctx = &ctx;

    run(service_fn(move |event| async move { function_handler(ctx, event).await })).await
}
