//! Request extractors whose rejections are reported through [`ApiError`], so
//! a malformed body, query string or path answers with the same
//! `{ "error": message }` body as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSON request body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use shared::ErrorResponse;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Sample {
        #[allow(dead_code)]
        name: String,
    }

    fn app() -> Router {
        Router::new()
            .route("/body", post(|ApiJson(_sample): ApiJson<Sample>| async { "ok" }))
            .route("/query", get(|ApiQuery(_sample): ApiQuery<Sample>| async { "ok" }))
            .route("/items/:id", get(|ApiPath(id): ApiPath<u32>| async move { id.to_string() }))
    }

    async fn error_body(request: Request<Body>) -> (StatusCode, ErrorResponse) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_json_field_is_reported_as_json() {
        let request = Request::post("/body")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, body) = error_body(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.error.contains("name"), "{}", body.error);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_reported_as_json() {
        let request = Request::post("/body").body(Body::from("{\"name\":\"x\"}")).unwrap();

        let (status, body) = error_body(request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_bad_query_and_path_are_reported_as_json() {
        let (status, body) = error_body(Request::get("/query").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("name"), "{}", body.error);

        let (status, body) = error_body(Request::get("/items/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.error.is_empty());
    }
}
