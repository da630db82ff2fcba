use crate::config::{Config, MAX_DIMENSION, UPLOAD_CONTENT_TYPE};
use crate::error::ServiceError;
use crate::http::{decode_param, text_response};
use crate::image::{resize_jpeg, TransformCfg};
use crate::storage::ObjectStorage;
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use tracing::{event, Level};

pub async fn resize_img(
    req: Request,
    storage: &dyn ObjectStorage,
    cfg: &Config,
) -> Result<Response<Body>, Error> {
    event!(Level::INFO, "Event: {:?}", req);

    let res = match read_params(&req) {
        Ok((key, transform)) => resize_stored(&key, transform, storage, cfg).await,
        Err(err) => Err(err),
    };

    match res {
        Ok(url) => text_response(StatusCode::OK, url),
        Err(err) => {
            event!(Level::ERROR, "failed to resize image: {}", err);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Writes a resized copy of `key` into the resized bucket and returns its
/// public url.
async fn resize_stored(
    key: &str,
    transform: TransformCfg,
    storage: &dyn ObjectStorage,
    cfg: &Config,
) -> Result<String, ServiceError> {
    let original_img = storage.get_object(&cfg.raw_bucket, key).await?;
    let resized_img = resize_jpeg(&original_img, transform)?;
    let output_key = format!("resized-{key}");

    storage
        .put_object(
            &cfg.resized_bucket,
            &output_key,
            resized_img,
            UPLOAD_CONTENT_TYPE,
        )
        .await?;

    Ok(public_url(&cfg.resized_bucket, &output_key))
}

fn read_params(req: &Request) -> Result<(String, TransformCfg), ServiceError> {
    let params = req.query_string_parameters();
    let key = decode_param(params.first("key").ok_or(ServiceError::MissingParameter("key"))?)?;
    let width = parse_dimension("width", params.first("width"))?;
    let height = parse_dimension("height", params.first("height"))?;

    Ok((key, TransformCfg::new(width, height)))
}

fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

fn parse_dimension(name: &'static str, value: Option<&str>) -> Result<u32, ServiceError> {
    let value = value.ok_or(ServiceError::MissingParameter(name))?;

    match value.parse::<u32>() {
        Ok(0) => Err(ServiceError::InvalidParameter {
            name,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) if n > MAX_DIMENSION => Err(ServiceError::InvalidParameter {
            name,
            reason: format!("must be at most {MAX_DIMENSION}"),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ServiceError::InvalidParameter {
            name,
            reason: e.to_string(),
        }),
    }
}
