//! MIMO SMS client and local ledger.
//!
//! The crate is layered the same way throughout: a domain layer of strong
//! types, a transport layer for wire-format quirks, a client layer issuing
//! requests against the MIMO REST API, and a SQLite [`store`] recording
//! senders, messages, recipients and credit activities. [`callbacks`] and
//! [`admin`] tie the client and the store together.
//!
//! ```rust,no_run
//! use mimo::{MessageText, MimoClient, RawPhoneNumber, SendSms, SenderName, Settings, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let client = MimoClient::from_settings(&settings)?;
//!     let store = Store::open(&settings.database)?;
//!
//!     let request = SendSms::new(
//!         SenderName::new("LIVING")?,
//!         vec![RawPhoneNumber::new("923123456")?],
//!         MessageText::new("hello")?,
//!     )?;
//!     let _message = mimo::callbacks::send_sms(&client, &store, &request).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod admin;
pub mod callbacks;
pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod store;
mod transport;

pub use callbacks::ActionError;
pub use client::{MimoClient, MimoClientBuilder, MimoError};
pub use config::{ConfigError, Settings};
pub use domain::{
    Activity, ActivityType, ApiHost, ApiToken, CampaignTitle, DateRange, DeliveryStatus,
    GroupName, GroupUpdate, Message, MessageText, NewSender, PhoneNumber, RawPhoneNumber,
    Recharge, RechargeReceipt, Recipient, SendSms, Sender, SenderName, SenderStatus, Username,
    ValidationError, Voucher,
};
pub use store::{SenderFilter, Store, StoreError};
