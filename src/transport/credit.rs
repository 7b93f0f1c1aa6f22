use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use super::price::TransportPrice;
use super::number::TransportCount;
use crate::domain::{NewActivity, RechargeReceipt, Username, Voucher};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RechargeJsonResponse {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    serial_number: Option<String>,
    #[serde(default)]
    voucher: Option<String>,
    #[serde(default, alias = "credits_")]
    credits: Option<TransportCount>,
    #[serde(default)]
    price: Option<TransportPrice>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    current_credits: Option<TransportCount>,
    #[serde(default)]
    expiration_time: Option<String>,
}

pub fn encode_recharge_params(voucher: &Voucher) -> Vec<(String, String)> {
    vec![(Voucher::FIELD.to_owned(), voucher.as_str().to_owned())]
}

pub fn encode_transfer_params(username: &Username, balance: u64) -> Vec<(String, String)> {
    vec![
        (Username::FIELD.to_owned(), username.as_str().to_owned()),
        ("balance".to_owned(), balance.to_string()),
    ]
}

/// Decode an accepted (`201`) recharge body.
///
/// A missing `voucher` falls back to the voucher that was submitted.
pub fn decode_recharge_json_response(
    voucher: &Voucher,
    json: &str,
) -> Result<RechargeReceipt, TransportError> {
    let parsed: RechargeJsonResponse = serde_json::from_str(json)?;
    Ok(RechargeReceipt {
        user: parsed.user.unwrap_or_default(),
        serial_number: parsed.serial_number.unwrap_or_default(),
        voucher: parsed
            .voucher
            .unwrap_or_else(|| voucher.as_str().to_owned()),
        credits: parsed
            .credits
            .and_then(TransportCount::into_i64)
            .unwrap_or_default(),
        price: parsed
            .price
            .map(TransportPrice::into_string)
            .unwrap_or_else(|| NewActivity::DEFAULT_PRICE.to_owned()),
        status: parsed.status,
        current_credits: parsed
            .current_credits
            .and_then(TransportCount::into_i64)
            .unwrap_or_default(),
        expiration_time: parsed.expiration_time.as_deref().and_then(parse_timestamp),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    tracing::warn!(value = raw, "unrecognized expirationTime format, ignoring");
    None
}
