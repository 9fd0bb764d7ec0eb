use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use social_common::constants::STATUS_SUCCESS;

use crate::errors::{Error, RequestError, Result};

/// The `{status, message}` pair most replies carry next to their payload.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusReply {
    /// Replies without a `status` field count as successful.
    pub fn ensure_success(self) -> Result<Option<String>> {
        match self.status.as_deref() {
            None | Some(STATUS_SUCCESS) => Ok(self.message),
            Some(_) => Err(RequestError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "Request was not accepted".to_string()),
            }
            .into()),
        }
    }
}

/// Convert non-2xx responses into a structured error that includes the server message.
///
/// If the status is successful (2xx), the original response is returned.
/// Otherwise the body is consumed: its JSON `message` field becomes the error
/// message, falling back to the raw body and then to the canonical reason.
pub(crate) async fn check_http_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string()
    };
    let message = match response.text().await {
        Ok(body) => server_message(&body).unwrap_or_else(fallback),
        Err(_) => fallback(),
    };

    Err(Error::from(RequestError::Server { status, message }))
}

/// Check the status then decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_http_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<StatusReply>(body) {
        Ok(StatusReply {
            message: Some(message),
            ..
        }) => Some(message),
        _ => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_json_field() {
        assert_eq!(
            server_message(r#"{"status":"error","message":"No token"}"#).as_deref(),
            Some("No token")
        );
        assert_eq!(server_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(server_message("  "), None);
    }

    #[test]
    fn status_reply_rejects_non_success() {
        let ok = StatusReply {
            status: Some("success".into()),
            message: Some("saved".into()),
        };
        assert_eq!(ok.ensure_success().unwrap().as_deref(), Some("saved"));

        let rejected = StatusReply {
            status: Some("error".into()),
            message: Some("Wrong password".into()),
        };
        let err = rejected.ensure_success().unwrap_err();
        assert_eq!(err.user_message(), "Wrong password");
    }
}
