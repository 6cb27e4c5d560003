use crate::api::{split_target, ApiRequest};
use may_minihttp::Request;
use std::io::Read;
use tracing::debug;

/// Convert a raw `may_minihttp` request into an [`ApiRequest`].
///
/// Returns `None` when the method is not a valid HTTP token. A body that
/// is not UTF-8 is decoded lossily; binding then rejects it as bad JSON.
pub fn parse_request(req: Request) -> Option<ApiRequest> {
    let method = match req.method().parse::<http::Method>() {
        Ok(method) => method,
        Err(_) => {
            debug!(method = %req.method(), "Unparseable request method");
            return None;
        }
    };
    let (path, query) = split_target(req.path());

    let mut raw = Vec::new();
    let body = match req.body().read_to_end(&mut raw) {
        Ok(0) | Err(_) => None,
        Ok(size) => {
            debug!(body_size_bytes = size, "Request body read");
            Some(String::from_utf8_lossy(&raw).into_owned())
        }
    };

    debug!(
        method = %method,
        path = %path,
        query_pairs = query.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    Some(ApiRequest {
        method,
        path,
        query,
        body,
    })
}
