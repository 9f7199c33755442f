use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// `{ "message": ..., "body": ... }`, the shape of every `/data` response.
///
/// `body` serializes as `null` when absent.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub message: &'static str,
    pub body: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: &'static str, body: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                message,
                body: Some(body),
            }),
        )
    }
}

impl Envelope<()> {
    pub fn bad_request(message: &'static str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                message,
                body: None,
            }),
        )
    }

    pub fn into_bad_request(message: &'static str) -> Response {
        Self::bad_request(message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_body_is_null() {
        let (status, Json(envelope)) = Envelope::bad_request("Incorrect data");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({ "message": "Incorrect data", "body": null })
        );
    }

    #[test]
    fn test_ok_wraps_body() {
        let (status, Json(envelope)) = Envelope::ok("get data sucess", vec![1, 2]);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({ "message": "get data sucess", "body": [1, 2] })
        );
    }
}
