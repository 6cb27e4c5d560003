use crate::api::ApiResponse;
use may_minihttp::Response;
use tracing::error;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write `response` as a JSON body with its status code.
pub fn write_api_response(res: &mut Response, response: &ApiResponse) {
    res.status_code(response.status as usize, status_reason(response.status));
    res.header("Content-Type: application/json");
    match response.to_bytes() {
        Ok(bytes) => res.body_vec(bytes),
        Err(err) => {
            error!(error = %err, "Failed to serialize response body");
            res.status_code(500, status_reason(500));
            res.body_vec(
                br#"{"message":"Internal server error","http_code":500}"#.to_vec(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(422), "Unprocessable Entity");
    }
}
