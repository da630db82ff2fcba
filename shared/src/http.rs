use crate::error::ServiceError;
use lambda_http::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Response};
use percent_encoding::percent_decode_str;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(err: &ServiceError) -> Self {
        ErrorBody {
            error: err.to_string(),
        }
    }
}

/// Builds a response carrying the CORS header every endpoint answers with.
pub fn create_response(
    status: StatusCode,
    content_type: &str,
    body: Body,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(body)?)
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    create_response(
        status,
        "application/json",
        serde_json::to_string(body)?.into(),
    )
}

pub fn text_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    create_response(status, "text/plain", body.into())
}

pub fn bad_request(err: &ServiceError) -> Result<Response<Body>, Error> {
    json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(err))
}

pub fn internal_error(err: &ServiceError) -> Result<Response<Body>, Error> {
    json_response(StatusCode::INTERNAL_SERVER_ERROR, &ErrorBody::new(err))
}

/// Percent-decodes a query value. `+` is kept as-is.
pub fn decode_param(raw: &str) -> Result<String, ServiceError> {
    Ok(percent_decode_str(raw).decode_utf8()?.into_owned())
}
