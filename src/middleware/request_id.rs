use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request ID that is accepted
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation ID of the current request, stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh UUID v4 request ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopts a client-supplied ID if it is non-empty, visible ASCII and short
    pub fn from_client(value: &str) -> Option<Self> {
        let value = value.trim();
        let acceptable = !value.is_empty()
            && value.len() <= MAX_REQUEST_ID_LEN
            && value.bytes().all(|b| b.is_ascii_graphic());
        acceptable.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn incoming_request_id(headers: &HeaderMap) -> Option<RequestId> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(RequestId::from_client)
}

/// Tags every request with a request ID and echoes it on the response
///
/// A valid incoming `x-request-id` header is reused so IDs can be correlated
/// across services; otherwise a new UUID v4 is generated.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id =
        incoming_request_id(request.headers()).unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Builds the per-request tracing span, tagged with the request ID
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
