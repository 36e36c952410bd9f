//! The JSON success envelope shared by every endpoint.
//!
//! Successes are `{"success": true, "message": …, "data": …}` with `data`
//! omitted when there is nothing to return; failures are produced by the
//! `ResponseError` impl on the domain error and carry `success: false`.

use serde::Serialize;

/// Wire shape of a successful response.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope carrying a payload.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Envelope for confirmations with no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn data_is_omitted_when_absent() {
        let value =
            serde_json::to_value(Envelope::message_only("Review deleted successfully"))
                .expect("serialise");
        assert_eq!(
            value,
            json!({ "success": true, "message": "Review deleted successfully" })
        );
    }

    #[test]
    fn data_is_nested_when_present() {
        let value = serde_json::to_value(Envelope::with_data("ok", json!({ "token": "t" })))
            .expect("serialise");
        assert_eq!(value["data"]["token"], json!("t"));
        assert_eq!(value["success"], json!(true));
    }
}
