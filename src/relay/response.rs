use axum::body::Body;
use axum::response::{IntoResponse, Response};

use super::RelayResponse;

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};

    #[tokio::test]
    async fn test_status_headers_and_body_are_relayed() {
        let mut headers = HeaderMap::new();
        headers.insert("x-upstream", HeaderValue::from_static("yes"));
        headers.insert("content-type", HeaderValue::from_static("application/octet-stream"));

        let relayed = RelayResponse {
            status: StatusCode::IM_A_TEAPOT,
            headers,
            body: Bytes::from_static(&[0, 159, 146, 150]),
        };

        let response = relayed.into_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers().get("x-upstream").unwrap(), "yes");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], &[0, 159, 146, 150]);
    }
}
