//! Request correlation.
//!
//! Every request carries an `x-request-id`: the client's value when present,
//! otherwise a fresh UUID v4. The id is echoed in the response header,
//! recorded on the trace span and written into every envelope.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{Extensions, HeaderMap, HeaderName, HeaderValue, Request, request::Parts},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId as HeaderRequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::envelope::{ApiResponse, NoData};
use crate::errors::AppError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Generates UUID v4 request ids for [`SetRequestIdLayer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<HeaderRequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(HeaderRequestId::new)
    }
}

/// Assigns an id to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(), MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header())
}

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_request_span<B>(request: &Request<B>) -> tracing::Span {
    let rid = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri().path(),
        request_id = %rid,
    )
}

/// Extractor for the current request id.
///
/// Never rejects. Without the middleware in front (handler tests, for
/// instance) an id is generated and cached in the request extensions so
/// every extractor in the same request sees the same value.
///
/// ```ignore
/// async fn get_thing(request_id: RequestId) -> Result<impl IntoResponse, ApiFailure> {
///     let thing = load().await.map_err(|e| request_id.fail(e))?;
///     Ok(request_id.respond("Thing retrieved", thing))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn from_parts(parts: &mut Parts) -> Self {
        Self::resolve(&mut parts.extensions, &parts.headers)
    }

    pub(crate) fn resolve(extensions: &mut Extensions, headers: &HeaderMap) -> Self {
        if let Some(id) = extensions
            .get::<HeaderRequestId>()
            .and_then(|id| id.header_value().to_str().ok())
        {
            return Self(id.to_owned());
        }

        if let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
            return Self(id.to_owned());
        }

        let id = Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&id) {
            extensions.insert(HeaderRequestId::new(value));
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Success envelope carrying `data`.
    pub fn respond<T>(&self, message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
        Json(ApiResponse::success(message, Some(data), Some(self.0.clone())))
    }

    /// Success envelope with `data: null`.
    pub fn respond_empty(&self, message: impl Into<String>) -> Json<ApiResponse<NoData>> {
        Json(ApiResponse::success(message, None, Some(self.0.clone())))
    }

    /// Binds an error to this request so it renders with the id.
    pub fn fail(&self, error: impl Into<AppError>) -> ApiFailure {
        ApiFailure {
            error: error.into(),
            request_id: self.0.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// An [`AppError`] tagged with the request id it belongs to.
#[derive(Debug)]
pub struct ApiFailure {
    pub error: AppError,
    pub request_id: String,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, body) = self.error.into_envelope(Some(self.request_id));
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo(request_id: RequestId) -> String {
        request_id.0
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    #[tokio::test]
    async fn test_client_request_id_is_kept() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "client-id-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "client-id-42");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"client-id-42");
    }

    #[tokio::test]
    async fn test_missing_request_id_is_generated_and_echoed() {
        let response = app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned();
        assert!(Uuid::parse_str(&header).is_ok());

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header);
    }

    #[test]
    fn test_resolve_caches_generated_id() {
        let mut extensions = Extensions::new();
        let headers = HeaderMap::new();

        let first = RequestId::resolve(&mut extensions, &headers);
        let second = RequestId::resolve(&mut extensions, &headers);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failure_renders_envelope_with_id() {
        let failure = RequestId("rid-7".into()).fail(AppError::NotFound("User not found".into()));
        let response = failure.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["requestId"], "rid-7");
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["success"], false);
    }
}
