use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Uniform response envelope: `{success, statusCode, message, data, meta?}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Paging block attached to list responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub unread_count: i64,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_camel_case_and_omits_empty_meta() {
        let body = serde_json::to_value(Envelope::ok("fetched", json!([1, 2]))).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["message"], "fetched");
        assert_eq!(body["data"], json!([1, 2]));
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn meta_serializes_paging_fields() {
        let env = Envelope::ok("ok", json!(null)).with_meta(PageMeta {
            page: 2,
            limit: 20,
            total: 45,
            unread_count: 7,
        });
        let body = serde_json::to_value(env).unwrap();
        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["meta"]["limit"], 20);
        assert_eq!(body["meta"]["total"], 45);
        assert_eq!(body["meta"]["unreadCount"], 7);
    }
}
