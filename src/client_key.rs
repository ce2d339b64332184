use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Picks the identifier a request is rate limited under.
///
/// `x-forwarded-for` is assumed to be written by a trusted reverse proxy;
/// only its first entry is used. Without it the peer address is used, and
/// without that the `"Unknown"` sentinel.
pub fn resolve_client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

// Extractor - resolved client key for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientKey(resolve_client_key(&parts.headers, peer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn takes_first_forwarded_entry() {
        let headers = headers_with_xff("203.0.113.7, 10.0.0.1, 10.0.0.2");
        let peer: SocketAddr = "10.0.0.9:443".parse().unwrap();
        assert_eq!(resolve_client_key(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn blank_forwarded_header_falls_back_to_peer() {
        let headers = headers_with_xff(" , 10.0.0.1");
        let peer: SocketAddr = "198.51.100.4:52100".parse().unwrap();
        assert_eq!(resolve_client_key(&headers, Some(peer)), "198.51.100.4");
    }

    #[test]
    fn no_source_yields_sentinel() {
        assert_eq!(resolve_client_key(&HeaderMap::new(), None), UNKNOWN_CLIENT);
    }

    #[test]
    fn forwarded_value_is_not_validated_as_ip() {
        // trusted proxy assumption: the token is used verbatim
        let headers = headers_with_xff("client-a");
        assert_eq!(resolve_client_key(&headers, None), "client-a");
    }
}
