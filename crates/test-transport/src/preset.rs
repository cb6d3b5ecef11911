use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the fake service answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// A success status with this JSON body.
    #[serde(rename = "json")]
    Json(Value),
    /// A non-success status, e.g. `403` for a rejected key.
    #[serde(rename = "status")]
    Status(u16),
    /// The transport gives up before any response arrives.
    #[serde(rename = "network_failure")]
    NetworkFailure,
    /// The request never resolves.
    #[serde(rename = "hang")]
    Hang,
}

impl PresetReply {
    /// Shorthand for a chat reply `{"message": text}`.
    #[inline]
    pub fn chat_message<S: Into<String>>(text: S) -> Self {
        Self::Json(Value::from_iter([("message".to_owned(), text.into())]))
    }

    /// Shorthand for a generator reply `{"result": text}`.
    #[inline]
    pub fn generated<S: Into<String>>(text: S) -> Self {
        Self::Json(Value::from_iter([("result".to_owned(), text.into())]))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_shorthands() {
        assert_eq!(
            PresetReply::chat_message("hi"),
            PresetReply::Json(json!({ "message": "hi" }))
        );
        assert_eq!(
            PresetReply::generated("poem"),
            PresetReply::Json(json!({ "result": "poem" }))
        );
    }

    #[test]
    fn test_serialize_deserialize() {
        let script = vec![
            PresetReply::chat_message("Hello there"),
            PresetReply::Status(403),
            PresetReply::NetworkFailure,
            PresetReply::Hang,
        ];

        let serialized = serde_json::to_string(&script).unwrap();
        let deserialized: Vec<PresetReply> =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(script, deserialized);
    }
}
