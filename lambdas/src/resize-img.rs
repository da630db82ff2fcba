use lambda_http::{run, service_fn, Error};
use shared::config::{get_s3_client, get_service_cfg};
use shared::resize::resize_img;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let s3 = get_s3_client().await;
    let cfg = get_service_cfg()?;

    run(service_fn(|req| resize_img(req, &s3, &cfg))).await
}
