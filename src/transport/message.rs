use serde::Deserialize;
use serde_json::{Value, json};

use super::number::{TransportCount, TransportFlag};
use super::endpoint::join_values;
use crate::domain::{DateRange, RawPhoneNumber, RecipientReceipt, SendReceipt, SendSms, SenderName};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid send response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct SendJsonResponse {
    #[serde(default)]
    id: Option<TransportCount>,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    size: Option<TransportCount>,
    #[serde(default)]
    unicode: Option<TransportFlag>,
    #[serde(default)]
    recipients: Vec<RecipientJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipientJson {
    #[serde(default)]
    phone: Option<TransportCount>,
    #[serde(default)]
    message_id: Option<Value>,
    #[serde(default)]
    status: Option<String>,
}

pub fn encode_send_payload(request: &SendSms) -> Value {
    json!({
        "sender": request.sender().as_str(),
        "recipients": join_values(request.recipients().iter().map(RawPhoneNumber::raw)),
        "text": request.text().as_str(),
    })
}

pub fn encode_by_date_params(range: &DateRange) -> Vec<(String, String)> {
    vec![
        (
            DateRange::START_FIELD.to_owned(),
            range.start().format("%Y-%m-%d").to_string(),
        ),
        (
            DateRange::END_FIELD.to_owned(),
            range.end().format("%Y-%m-%d").to_string(),
        ),
    ]
}

/// Decode a `message/send` body.
///
/// Returns `Ok(None)` when the body has no `sender` key: that is how MIMO
/// reports a refused send (no credit, unknown sender, ...).
pub fn decode_send_receipt(body: &Value) -> Result<Option<SendReceipt>, TransportError> {
    let has_sender = body
        .as_object()
        .is_some_and(|object| object.contains_key(SenderName::FIELD));
    if !has_sender {
        return Ok(None);
    }

    let parsed = SendJsonResponse::deserialize(body)?;
    let recipients = parsed
        .recipients
        .into_iter()
        .map(|item| RecipientReceipt {
            phone: item.phone.map(count_to_string).unwrap_or_default(),
            message_id: item.message_id.map(scalar_to_string).unwrap_or_default(),
            status: item.status,
        })
        .collect();

    Ok(Some(SendReceipt {
        message_id: parsed.id.and_then(TransportCount::into_i64),
        sender: parsed.sender,
        text: parsed.text.unwrap_or_default(),
        size: parsed
            .size
            .and_then(TransportCount::into_i64)
            .unwrap_or_default(),
        unicode: parsed.unicode.is_some_and(TransportFlag::into_bool),
        recipients,
    }))
}

fn count_to_string(value: TransportCount) -> String {
    match value {
        TransportCount::Int(value) => value.to_string(),
        TransportCount::String(value) => value.trim().to_owned(),
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(value) => value,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
