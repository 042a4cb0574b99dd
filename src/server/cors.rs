//! Cross-origin request support.
//!
//! The service is meant to be called from browser front-ends, so CORS is
//! open to any origin by default. A configured origin list narrows it down.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Preflight cache lifetime in seconds.
pub const MAX_AGE_SECONDS: u32 = 86400;

/// Methods advertised in preflight responses.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Origin policy applied to every response.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    /// Allowed origins (can include "*" or "*.example.com").
    allowed_origins: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

impl CorsPolicy {
    /// Allow any origin.
    pub fn permissive() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }

    /// Allow only the listed origins.
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Whether every origin is allowed.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Check if this policy matches the given origin.
    pub fn matches_origin(&self, origin: &str) -> bool {
        for allowed in &self.allowed_origins {
            if allowed == "*" || allowed == origin {
                return true;
            }
            // Wildcard subdomain matching (e.g., "*.example.com")
            if let Some(suffix) = allowed.strip_prefix('*') {
                if suffix.starts_with('.') && origin.ends_with(suffix) {
                    return true;
                }
            }
        }
        false
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` if not allowed.
    fn allow_origin_value(&self, origin: &str) -> Option<HeaderValue> {
        if self.allows_any() {
            Some(HeaderValue::from_static("*"))
        } else if self.matches_origin(origin) {
            HeaderValue::from_str(origin).ok()
        } else {
            None
        }
    }
}

/// CORS middleware: answers preflight requests and decorates responses.
pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    // No Origin header means this is not a cross-origin request.
    let origin = match origin {
        Some(o) => o,
        None => return next.run(request).await,
    };

    let is_preflight = *request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    if is_preflight {
        return handle_preflight(&policy, &origin, &request);
    }

    let response = next.run(request).await;
    add_cors_headers(response, &policy, &origin)
}

/// Handle a CORS preflight (OPTIONS) request.
fn handle_preflight(policy: &CorsPolicy, origin: &str, request: &Request) -> Response {
    let allow_origin = match policy.allow_origin_value(origin) {
        Some(v) => v,
        None => {
            debug!(origin = %origin, "Origin not allowed by CORS policy");
            return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
        }
    };

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(MAX_AGE_SECONDS));

    // Echo requested headers back; no header restrictions apply.
    if let Some(requested) = request.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }
    if !policy.allows_any() {
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    response
}

/// Add CORS headers to an actual (non-preflight) response.
fn add_cors_headers(mut response: Response, policy: &CorsPolicy, origin: &str) -> Response {
    if let Some(value) = policy.allow_origin_value(origin) {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        if !policy.allows_any() {
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
    response
}
