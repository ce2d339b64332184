use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
    VARY,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

// Origin allow-list for browser callers
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    // Parse from comma-separated list "https://a.com, https://b.com"
    pub fn from_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/')),
        )
    }

    /// Value for `Access-Control-Allow-Origin`, if any.
    ///
    /// Listed origins are echoed back. A request without an `Origin`
    /// header gets `*`; an unlisted origin gets nothing.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match origin {
            Some(origin) if self.allowed_origins.iter().any(|o| o == origin) => {
                Some(origin.to_string())
            }
            Some(_) => None,
            None => Some("*".to_string()),
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}

/// Middleware: decorates every response with CORS headers and answers
/// preflight `OPTIONS` requests directly.
pub async fn cors(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    // Some(None) is an Origin header that isn't visible ASCII
    let origin: Option<Option<String>> = req
        .headers()
        .get(ORIGIN)
        .map(|v| v.to_str().ok().map(str::to_owned));

    let mut response = if req.method() == Method::OPTIONS {
        let mut preflight = Response::new(Body::empty());
        *preflight.status_mut() = StatusCode::OK;
        preflight
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    let allowed = match &origin {
        None => policy.allow_origin(None),
        Some(Some(origin)) => policy.allow_origin(Some(origin)),
        Some(None) => None,
    };
    match allowed.and_then(|o| HeaderValue::from_str(&o).ok()) {
        Some(value) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        None => debug!(origin = ?origin, "Origin not in allow-list"),
    }
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}
