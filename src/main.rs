mod authorizer;
mod cloud_auth;
mod config;
mod error;
mod event;
mod notification;
mod upstream_client;
mod webhook_client;

use std::env;

use anyhow::Context;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cloud_auth::CloudAuth;
use crate::config::Config;
use crate::upstream_client::{CloudServerClient, Forward};
use crate::webhook_client::{MattermostWebhookClient, Notify};

fn init_logging() {
    let default_level = if env::var("AWS_EXECUTION_ENV").unwrap_or_default().is_empty() {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        // CloudWatch stamps every line on ingestion.
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = Config::from_env()
        .context("Failed to load configuration")
        .map_err(|error| {
            error!("{:#}", error);
            error
        })?;
    let upstream = CloudServerClient::new().context("Failed to build cloud server client")?;
    let notifier = MattermostWebhookClient::new(config.webhook_url.clone())
        .context("Failed to build webhook client")?;
    let auth = CloudAuth::new(config, upstream, notifier);
    let auth = &auth;

    run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| async move {
        validate_cloud_request(auth, event).await
    }))
    .await
}

async fn validate_cloud_request<F, N>(
    auth: &CloudAuth<F, N>,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error>
where
    F: Forward + Sync,
    N: Notify + Sync,
{
    Ok(auth.handle(&event.payload, &event.context.request_id).await)
}
