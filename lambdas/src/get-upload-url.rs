use lambda_http::{run, service_fn, Error};
use shared::config::{get_s3_client, get_service_cfg};
use shared::upload::get_upload_url;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let s3 = get_s3_client().await;
    let cfg = get_service_cfg()?;

    run(service_fn(|req| get_upload_url(req, &s3, &cfg))).await
}
