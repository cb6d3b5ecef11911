use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The HTTP method of an [`ApiRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// A bodiless read.
    Get,
    /// A JSON submission.
    Post,
}

/// A request to be sent to the AI service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: Method,
    /// Path relative to the service base URL, e.g. `/api/ai/chatbot`.
    pub endpoint: String,
    /// The JSON body. Always `None` for [`Method::Get`].
    pub payload: Option<Value>,
}

impl ApiRequest {
    /// Creates a `POST` request carrying `payload` as its JSON body.
    #[inline]
    pub fn post<S: Into<String>>(endpoint: S, payload: Value) -> Self {
        Self {
            method: Method::Post,
            endpoint: endpoint.into(),
            payload: Some(payload),
        }
    }

    /// Creates a bodiless `GET` request.
    #[inline]
    pub fn get<S: Into<String>>(endpoint: S) -> Self {
        Self {
            method: Method::Get,
            endpoint: endpoint.into(),
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_constructors() {
        let req =
            ApiRequest::post("/api/ai/chatbot", json!({ "message": "hi" }));
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.endpoint, "/api/ai/chatbot");
        assert_eq!(req.payload, Some(json!({ "message": "hi" })));

        let req = ApiRequest::get("/api/health");
        assert_eq!(req.method, Method::Get);
        assert!(req.payload.is_none());
    }
}
