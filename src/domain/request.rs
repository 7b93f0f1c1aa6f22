use chrono::NaiveDate;

use crate::domain::validation::ValidationError;
use crate::domain::value::{GroupName, MessageText, RawPhoneNumber, SenderName};

/// Upper bound on recipients per `message/send` call.
pub const SEND_SMS_MAX_RECIPIENTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct SendSms {
    sender: SenderName,
    recipients: Vec<RawPhoneNumber>,
    text: MessageText,
}

impl SendSms {
    pub fn new(
        sender: SenderName,
        recipients: Vec<RawPhoneNumber>,
        text: MessageText,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty { field: "recipients" });
        }
        if recipients.len() > SEND_SMS_MAX_RECIPIENTS {
            return Err(ValidationError::TooLong {
                field: "recipients",
                max: SEND_SMS_MAX_RECIPIENTS,
                actual: recipients.len(),
            });
        }
        Ok(Self {
            sender,
            recipients,
            text,
        })
    }

    pub fn sender(&self) -> &SenderName {
        &self.sender
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }
}

#[derive(Debug, Clone)]
/// Request for a new sender id, reviewed by MIMO before it becomes usable.
pub struct NewSender {
    pub sender: SenderName,
    pub reason: String,
}

impl NewSender {
    pub fn new(sender: SenderName, reason: impl Into<String>) -> Self {
        Self {
            sender,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
/// Group modification.
///
/// Renames go through a dedicated GET endpoint; every other edit is a JSON POST.
pub enum GroupUpdate {
    Rename { name: GroupName, new_name: GroupName },
    Edit(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inclusive date window for `message/list-all/by-date`.
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub const START_FIELD: &'static str = "start-date";
    pub const END_FIELD: &'static str = "end-date";

    /// Create a range; `start` and `end` are swapped when given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}
