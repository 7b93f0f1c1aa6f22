//! Operator actions over the ledger: sender registration and verification,
//! voucher redemption, paged listings.

use std::collections::HashSet;

use crate::callbacks::{ActionError, charge_credits};
use crate::client::{MimoClient, MimoError};
use crate::domain::{Activity, Message, NewSender, Recipient, Sender, Voucher};
use crate::store::{SenderFilter, Store};
use crate::transport::decode_sender_list;

/// Messages shown per listing page.
pub const MESSAGES_PER_PAGE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Error,
}

/// User-facing result of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub level: MessageLevel,
    pub message: String,
    pub updated: usize,
}

impl ActionOutcome {
    fn success(message: &str, updated: usize) -> Self {
        Self {
            level: MessageLevel::Success,
            message: message.to_owned(),
            updated,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: MessageLevel::Error,
            message: message.to_owned(),
            updated: 0,
        }
    }
}

/// Enable the selected local senders that MIMO reports as `enable`.
///
/// Selected ids that match no enabled remote sender are left untouched. When
/// none match, the outcome is an error and nothing is written.
pub async fn check_sender_availability(
    client: &MimoClient,
    store: &Store,
    selected_ids: &[i64],
) -> Result<ActionOutcome, ActionError> {
    let body = client.senders().list(false).await?;
    let remote = decode_sender_list(&body).map_err(|err| MimoError::Parse(Box::new(err)))?;
    let enabled: HashSet<&str> = remote
        .iter()
        .filter(|sender| sender.is_enabled())
        .map(|sender| sender.sender.as_str())
        .collect();

    let matched: Vec<i64> = store
        .senders_by_ids(selected_ids)?
        .into_iter()
        .filter(|sender| enabled.contains(sender.sender.as_str()))
        .map(|sender| sender.id)
        .collect();

    if matched.is_empty() {
        tracing::warn!(
            selected = selected_ids.len(),
            remote_enabled = enabled.len(),
            "no selected sender is enabled remotely"
        );
        return Ok(ActionOutcome::error("Unable to check sender availability"));
    }

    let updated = store.enable_senders(&matched)?;
    tracing::info!(updated, "senders verified");
    Ok(ActionOutcome::success("All senders have been verified", updated))
}

/// Request the sender id from MIMO, then keep a local unverified copy.
pub async fn register_sender(
    client: &MimoClient,
    store: &Store,
    request: &NewSender,
) -> Result<Sender, ActionError> {
    client.senders().create(request).await?;
    let sender = store.insert_sender(&request.sender, &request.reason)?;
    tracing::info!(id = sender.id, sender = %sender.sender, "sender registered");
    Ok(sender)
}

/// Validate a voucher typed by the operator.
pub fn clean_voucher(store: &Store, raw: &str) -> Result<Voucher, ActionError> {
    let voucher = Voucher::new(raw)?;
    if store.voucher_exists(voucher.as_str())? {
        return Err(ActionError::VoucherAlreadyRegistered {
            voucher: voucher.as_str().to_owned(),
        });
    }
    Ok(voucher)
}

/// Validate and redeem a voucher in one step.
pub async fn redeem_voucher(
    client: &MimoClient,
    store: &Store,
    raw: &str,
) -> Result<Activity, ActionError> {
    let voucher = clean_voucher(store, raw)?;
    charge_credits(client, store, &voucher).await
}

/// One page of the message listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    /// 1-based page number.
    pub page: usize,
    pub total: i64,
    pub messages: Vec<Message>,
}

impl MessagePage {
    pub fn page_count(&self) -> usize {
        let total = usize::try_from(self.total).unwrap_or_default();
        total.div_ceil(MESSAGES_PER_PAGE).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }
}

/// Messages newest first, [`MESSAGES_PER_PAGE`] at a time. Page 0 is treated as page 1.
pub fn message_page(store: &Store, page: usize) -> Result<MessagePage, ActionError> {
    let page = page.max(1);
    let messages = store.list_messages(MESSAGES_PER_PAGE, (page - 1) * MESSAGES_PER_PAGE)?;
    Ok(MessagePage {
        page,
        total: store.count_messages()?,
        messages,
    })
}

pub fn message_recipients(store: &Store, message_id: i64) -> Result<Vec<Recipient>, ActionError> {
    Ok(store.recipients_for_message(message_id)?)
}

pub fn senders(store: &Store, filter: &SenderFilter) -> Result<Vec<Sender>, ActionError> {
    Ok(store.list_senders(filter)?)
}

pub fn activities(store: &Store) -> Result<Vec<Activity>, ActionError> {
    Ok(store.list_activities()?)
}
