use crate::request::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Raw HTTP request data extracted for routing and dispatch.
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method token as sent on the wire.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Decoded query string parameters.
    pub query_params: ParamVec,
    /// Raw body bytes; `None` when the request carried none. JSON parsing
    /// is deferred to the body decoder during binding.
    pub body: Option<Vec<u8>>,
}

/// Parse query string parameters from a URL path.
///
/// Everything after `?` is percent-decoded into name/value pairs.
#[must_use]
pub fn parse_query_params(path: &str) -> ParamVec {
    match path.find('?') {
        Some(pos) => url::form_urlencoded::parse(path[pos + 1..].as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Extract method, path, query parameters, and raw body from an inbound
/// request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let query_params = parse_query_params(&raw_path);

    let mut buf = Vec::new();
    let body = match req.body().read_to_end(&mut buf) {
        Ok(n) if n > 0 => Some(buf),
        _ => None,
    };

    debug!(
        method = %method,
        path = %path,
        query_params = query_params.len(),
        body_bytes = body.as_ref().map_or(0, Vec::len),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        query_params,
        body,
    }
}
