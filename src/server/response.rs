use crate::response::Response;
use may_minihttp::Response as HttpResponse;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write a dispatch response to the transport. Consumes the response; it is
/// rendered exactly once.
pub fn write_response(res: &mut HttpResponse, response: Response) {
    let rendered = response.rendered();
    res.status_code(rendered.status as usize, status_reason(rendered.status));
    match rendered.content_type {
        Some("text/plain") => {
            res.header("Content-Type: text/plain");
        }
        Some(_) => {
            res.header("Content-Type: application/json");
        }
        None => {}
    }
    if let Some(body) = rendered.body {
        res.body_vec(body);
    }
}

/// Write a transport-level JSON error (unroutable path, unknown
/// controller).
pub fn write_json_error(res: &mut HttpResponse, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
