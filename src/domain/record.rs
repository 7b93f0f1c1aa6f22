//! Locally persisted records. Every record carries `created_at`/`updated_at`.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderStatus {
    Enable,
    Disabled,
}

impl SenderStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::Enable => "1",
            Self::Disabled => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Enable),
            "2" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Enable => "ENABLE",
            Self::Disabled => "DISABLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub id: i64,
    pub sender: String,
    pub reason: String,
    /// `None` until the provider has confirmed availability.
    pub status: Option<SenderStatus>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sender {
    /// Time the operator should expect to wait for provider approval.
    pub fn hours_to_check(&self) -> &'static str {
        if self.status.is_none() { "48h" } else { "-" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: Option<i64>,
    /// Id assigned by MIMO.
    pub message_id: Option<i64>,
    pub text: String,
    pub unicode: bool,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: Option<i64>,
    pub message_id: Option<i64>,
    pub text: String,
    pub unicode: bool,
    pub size: i64,
}

impl NewMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            sender_id: None,
            message_id: None,
            text: text.into(),
            unicode: false,
            size: 0,
        }
    }

    pub fn sender_id(mut self, sender_id: i64) -> Self {
        self.sender_id = Some(sender_id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Sent,
    #[default]
    Pending,
    Delivered,
}

impl DeliveryStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::Sent => "S",
            Self::Pending => "P",
            Self::Delivered => "D",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Sent),
            "P" => Some(Self::Pending),
            "D" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Interpret a status string reported by the provider.
    ///
    /// Accepts stored codes and words in any case; anything else is still pending.
    pub fn from_provider(value: &str) -> Self {
        let value = value.trim();
        if let Some(status) = Self::from_code(value) {
            return status;
        }
        match value.to_ascii_lowercase().as_str() {
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            _ => Self::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "SENT",
            Self::Pending => "PENDING",
            Self::Delivered => "DELIVERED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub id: i64,
    pub message_id: i64,
    pub phone: String,
    pub provider_message_id: String,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipient {
    pub phone: String,
    pub provider_message_id: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    #[default]
    Add,
    Credit,
    Debit,
    Invalid,
}

impl ActivityType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::Credit => "2",
            Self::Debit => "3",
            Self::Invalid => "4",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Add),
            "2" => Some(Self::Credit),
            "3" => Some(Self::Debit),
            "4" => Some(Self::Invalid),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
            Self::Invalid => "INVALID",
        }
    }
}

/// Credit ledger entry produced by a voucher redemption attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user: String,
    pub serial_number: String,
    pub voucher: String,
    pub credits: i64,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// Decimal string with two places, as reported by MIMO.
    pub price: String,
    pub current_credits: i64,
    pub status: Option<String>,
    pub expiration_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Price with two decimals and comma thousands grouping, e.g. `1,250.00`.
    pub fn price_format(&self) -> String {
        format_price(&self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user: String,
    pub serial_number: String,
    pub voucher: String,
    pub credits: i64,
    pub kind: ActivityType,
    pub price: String,
    pub current_credits: i64,
    pub status: Option<String>,
    pub expiration_time: Option<DateTime<Utc>>,
}

impl NewActivity {
    pub const DEFAULT_PRICE: &'static str = "0.00";

    /// Ledger entry for a voucher the provider refused.
    pub fn invalid(voucher: impl Into<String>) -> Self {
        Self {
            user: String::new(),
            serial_number: String::new(),
            voucher: voucher.into(),
            credits: 0,
            kind: ActivityType::Invalid,
            price: Self::DEFAULT_PRICE.to_owned(),
            current_credits: 0,
            status: None,
            expiration_time: None,
        }
    }
}

fn format_price(raw: &str) -> String {
    let Ok(value) = raw.trim().parse::<f64>() else {
        return raw.to_owned();
    };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_codes_round_trip_through_labels() {
        assert_eq!(SenderStatus::from_code("1"), Some(SenderStatus::Enable));
        assert_eq!(SenderStatus::Disabled.code(), "2");
        assert_eq!(SenderStatus::from_code("enable"), None);

        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Pending);
        assert_eq!(DeliveryStatus::from_code("D"), Some(DeliveryStatus::Delivered));

        assert_eq!(ActivityType::default(), ActivityType::Add);
        assert_eq!(ActivityType::from_code("4"), Some(ActivityType::Invalid));
        assert_eq!(ActivityType::Invalid.label(), "INVALID");
    }

    #[test]
    fn provider_status_words_map_to_delivery_status() {
        assert_eq!(DeliveryStatus::from_provider("sent"), DeliveryStatus::Sent);
        assert_eq!(
            DeliveryStatus::from_provider("DELIVERED"),
            DeliveryStatus::Delivered
        );
        assert_eq!(DeliveryStatus::from_provider("S"), DeliveryStatus::Sent);
        assert_eq!(
            DeliveryStatus::from_provider("Sending..."),
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn new_message_defaults() {
        let message = NewMessage::new("hello");
        assert!(!message.unicode);
        assert_eq!(message.size, 0);
        assert_eq!(message.sender_id, None);
    }

    #[test]
    fn invalid_activity_carries_only_the_voucher() {
        let activity = NewActivity::invalid("91919191019191");
        assert_eq!(activity.kind, ActivityType::Invalid);
        assert_eq!(activity.voucher, "91919191019191");
        assert_eq!(activity.credits, 0);
        assert_eq!(activity.price, "0.00");
        assert!(activity.user.is_empty());
    }

    #[test]
    fn price_is_grouped_with_two_decimals() {
        assert_eq!(format_price("0.00"), "0.00");
        assert_eq!(format_price("1250"), "1,250.00");
        assert_eq!(format_price("1234567.5"), "1,234,567.50");
        assert_eq!(format_price("-999.999"), "-1,000.00");
        assert_eq!(format_price("n/a"), "n/a");
    }
}
