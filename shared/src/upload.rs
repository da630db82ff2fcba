use crate::config::Config;
use crate::error::ServiceError;
use crate::http::{bad_request, decode_param, internal_error, json_response, UploadUrl};
use crate::storage::{SignedUrlRequest, UploadSigner};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use tracing::{event, Level};

/// Answers with a pre-signed PUT url for the object named by the `key` query
/// parameter. Every fault is turned into a response.
pub async fn get_upload_url(
    req: Request,
    signer: &dyn UploadSigner,
    cfg: &Config,
) -> Result<Response<Body>, Error> {
    event!(Level::INFO, "Event: {:?}", req);

    let key = match req.query_string_parameters_ref() {
        Some(params) => params.first("key"),
        None => return bad_request(&ServiceError::MissingQueryParameters),
    };

    match presign_upload(key, signer, cfg).await {
        Ok(upload_url) => json_response(StatusCode::OK, &UploadUrl { upload_url }),
        Err(err) => {
            event!(Level::ERROR, "failed to presign upload url: {}", err);
            internal_error(&err)
        }
    }
}

async fn presign_upload(
    key: Option<&str>,
    signer: &dyn UploadSigner,
    cfg: &Config,
) -> Result<String, ServiceError> {
    let key = decode_param(key.ok_or(ServiceError::MissingParameter("key"))?)?;

    signer
        .presign_put(&SignedUrlRequest::upload(cfg, key))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aws_sdk_s3 as s3;
    use s3::config::{BehaviorVersion, Credentials, Region};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Signs nothing, records what it was asked for.
    #[derive(Default)]
    struct RecordingSigner {
        requests: Mutex<Vec<SignedUrlRequest>>,
    }

    #[async_trait]
    impl UploadSigner for RecordingSigner {
        async fn presign_put(&self, req: &SignedUrlRequest) -> Result<String, ServiceError> {
            self.requests.lock().unwrap().push(req.clone());
            Ok(format!("https://example/{}?sig=X", req.key.replace(' ', "%20")))
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl UploadSigner for FailingSigner {
        async fn presign_put(&self, _: &SignedUrlRequest) -> Result<String, ServiceError> {
            Err(ServiceError::Storage("the credentials provider was not enabled".to_string()))
        }
    }

    fn request(params: &[(&str, &str)]) -> Request {
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Request::default().with_query_string_parameters(params)
    }

    fn s3_client() -> s3::Client {
        let conf = s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
            .build();

        s3::Client::from_conf(conf)
    }

    fn body_json(resp: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(resp.body().as_ref()).unwrap()
    }

    fn assert_headers(resp: &Response<Body>) {
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn missing_query_parameters() {
        let signer = RecordingSigner::default();
        let resp = get_upload_url(Request::default(), &signer, &Config::default())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&resp),
            serde_json::json!({ "error": "Missing query parameters" })
        );
        assert_headers(&resp);
        assert!(signer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_query_parameters() {
        let signer = RecordingSigner::default();
        let resp = get_upload_url(request(&[]), &signer, &Config::default())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_headers(&resp);
    }

    #[tokio::test]
    async fn presigns_decoded_key() {
        let signer = RecordingSigner::default();
        let resp = get_upload_url(
            request(&[("key", "a%20b.jpg")]),
            &signer,
            &Config::default(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(&resp),
            serde_json::json!({ "uploadUrl": "https://example/a%20b.jpg?sig=X" })
        );
        assert_headers(&resp);

        let requests = signer.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[SignedUrlRequest {
                bucket: "src-bucket99".to_string(),
                key: "a b.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                expires_in: std::time::Duration::from_secs(300),
            }]
        );
    }

    #[tokio::test]
    async fn decodes_directory_separators() {
        let signer = RecordingSigner::default();
        get_upload_url(
            request(&[("key", "folder%2Fphoto.jpg")]),
            &signer,
            &Config::default(),
        )
        .await
        .unwrap();

        assert_eq!(signer.requests.lock().unwrap()[0].key, "folder/photo.jpg");
    }

    #[tokio::test]
    async fn signer_fault() {
        let resp = get_upload_url(
            request(&[("key", "photo.jpg")]),
            &FailingSigner,
            &Config::default(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&resp),
            serde_json::json!({ "error": "the credentials provider was not enabled" })
        );
        assert_headers(&resp);
    }

    #[tokio::test]
    async fn missing_key() {
        let signer = RecordingSigner::default();
        let resp = get_upload_url(request(&[("name", "photo.jpg")]), &signer, &Config::default())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&resp),
            serde_json::json!({ "error": "missing query parameter 'key'" })
        );
        assert_headers(&resp);
    }

    #[tokio::test]
    async fn undecodable_key() {
        let signer = RecordingSigner::default();
        let resp = get_upload_url(request(&[("key", "%C3%28.jpg")]), &signer, &Config::default())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(&resp)["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to decode key"));
        assert!(signer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn s3_presigned_url() {
        let client = s3_client();
        let resp = get_upload_url(
            request(&[("key", "folder%2Fphoto.jpg")]),
            &client,
            &Config::default(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(&resp);
        let url = body["uploadUrl"].as_str().unwrap();

        assert!(url.starts_with("https://"));
        assert!(url.contains("src-bucket99"));
        assert!(url.contains("/folder/photo.jpg?"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("content-type"));
    }

    #[tokio::test]
    async fn s3_presign_only_varies_in_time() {
        fn strip_time(url: &str) -> Vec<String> {
            let (base, query) = url.split_once('?').unwrap();
            let mut parts: Vec<String> = query
                .split('&')
                .filter(|p| !p.starts_with("X-Amz-Date=") && !p.starts_with("X-Amz-Signature="))
                .map(str::to_string)
                .collect();
            parts.push(base.to_string());
            parts.sort();
            parts
        }

        let client = s3_client();
        let req = SignedUrlRequest::upload(&Config::default(), "photo.jpg".to_string());
        let first = client.presign_put(&req).await.unwrap();
        let second = client.presign_put(&req).await.unwrap();

        assert_eq!(strip_time(&first), strip_time(&second));
    }
}
