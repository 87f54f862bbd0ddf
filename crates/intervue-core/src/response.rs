use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Success envelope shared by every route. Errors use the same `success`
/// discriminant through [`crate::errors::ErrorBody`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(value, json!({ "success": true, "data": { "id": 1 } }));
    }
}
