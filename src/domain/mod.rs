//! Domain layer: strong types with validation and invariants (no I/O).

mod record;
mod request;
mod response;
mod validation;
mod value;

pub use record::{
    Activity, ActivityType, DeliveryStatus, Message, NewActivity, NewMessage, NewRecipient,
    Recipient, Sender, SenderStatus,
};
pub use request::{DateRange, GroupUpdate, NewSender, SEND_SMS_MAX_RECIPIENTS, SendSms};
pub use response::{
    Recharge, RechargeReceipt, RecipientReceipt, RemoteSender, SendReceipt,
};
pub use validation::ValidationError;
pub use value::{
    ApiHost, ApiToken, CampaignTitle, GroupName, MessageText, PhoneNumber, RawPhoneNumber,
    SenderName, Username, Voucher,
};

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn phone(raw: &str) -> RawPhoneNumber {
        RawPhoneNumber::new(raw).unwrap()
    }

    #[test]
    fn send_sms_requires_recipients() {
        let err = SendSms::new(
            SenderName::new("LIVING").unwrap(),
            Vec::new(),
            MessageText::new("hi").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "recipients" });
    }

    #[test]
    fn send_sms_recipient_limit_is_enforced() {
        let recipients = vec![phone("923123456"); SEND_SMS_MAX_RECIPIENTS + 1];
        let err = SendSms::new(
            SenderName::new("LIVING").unwrap(),
            recipients,
            MessageText::new("hi").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn date_range_orders_bounds() {
        let early = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let range = DateRange::new(late, early);
        assert_eq!(range.start(), early);
        assert_eq!(range.end(), late);
    }

    #[test]
    fn remote_sender_enabled_only_for_exact_status() {
        let enabled = RemoteSender {
            sender: "LIVING".to_owned(),
            status: "enable".to_owned(),
        };
        let pending = RemoteSender {
            sender: "OTHER".to_owned(),
            status: "pending".to_owned(),
        };
        assert!(enabled.is_enabled());
        assert!(!pending.is_enabled());
    }
}
