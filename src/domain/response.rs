use chrono::{DateTime, Utc};

/// Sender id as reported by `sender-id/list-all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSender {
    pub sender: String,
    pub status: String,
}

impl RemoteSender {
    pub const ENABLED: &'static str = "enable";

    pub fn is_enabled(&self) -> bool {
        self.status == Self::ENABLED
    }
}

/// Accepted `message/send` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: Option<i64>,
    pub sender: Option<String>,
    pub text: String,
    pub size: i64,
    pub unicode: bool,
    pub recipients: Vec<RecipientReceipt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientReceipt {
    pub phone: String,
    pub message_id: String,
    pub status: Option<String>,
}

/// Outcome of `credit/recharge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recharge {
    /// HTTP 201: the voucher was redeemed.
    Accepted(RechargeReceipt),
    /// Any other HTTP status.
    Rejected { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RechargeReceipt {
    pub user: String,
    pub serial_number: String,
    pub voucher: String,
    pub credits: i64,
    pub price: String,
    pub status: Option<String>,
    pub current_credits: i64,
    pub expiration_time: Option<DateTime<Utc>>,
}
