use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{NewSender, RemoteSender};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid sender list: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct SenderListJsonResponse {
    #[serde(default)]
    content: Vec<SenderJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct SenderJson {
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub fn encode_new_sender_payload(request: &NewSender) -> Value {
    json!({
        "sender": request.sender.as_str(),
        "reason": request.reason,
    })
}

/// Decode the `content` array of `sender-id/list-all`.
///
/// Entries without a sender id are skipped.
pub fn decode_sender_list(body: &Value) -> Result<Vec<RemoteSender>, TransportError> {
    let parsed = SenderListJsonResponse::deserialize(body)?;
    Ok(parsed
        .content
        .into_iter()
        .filter_map(|item| {
            Some(RemoteSender {
                sender: item.sender?,
                status: item.status.unwrap_or_default(),
            })
        })
        .collect())
}
