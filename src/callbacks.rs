//! Glue between provider responses and the local ledger.
//!
//! Each callback issues one provider request and persists what it returned.

use crate::client::{MimoClient, MimoError};
use crate::domain::{
    Activity, ActivityType, DeliveryStatus, Message, NewActivity, NewMessage, NewRecipient,
    Recharge, RechargeReceipt, SendSms, ValidationError, Voucher,
};
use crate::store::{Store, StoreError};
use crate::transport::decode_send_receipt;

/// Errors raised by callbacks and admin actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Client(#[from] MimoError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Voucher is already registered.")]
    VoucherAlreadyRegistered { voucher: String },
}

/// Redeem `voucher` and record the attempt.
///
/// An accepted recharge is stored as an `Add` activity; any rejection is stored
/// as an `Invalid` activity that only carries the voucher.
pub async fn charge_credits(
    client: &MimoClient,
    store: &Store,
    voucher: &Voucher,
) -> Result<Activity, ActionError> {
    let new_activity = match client.credits().recharge(voucher).await? {
        Recharge::Accepted(receipt) => accepted_activity(receipt),
        Recharge::Rejected { status } => {
            tracing::warn!(voucher = voucher.as_str(), status, "voucher rejected");
            NewActivity::invalid(voucher.as_str())
        }
    };

    let activity = store.insert_activity(&new_activity)?;
    tracing::info!(
        id = activity.id,
        kind = activity.kind.label(),
        credits = activity.credits,
        "credit activity recorded"
    );
    Ok(activity)
}

fn accepted_activity(receipt: RechargeReceipt) -> NewActivity {
    NewActivity {
        user: receipt.user,
        serial_number: receipt.serial_number,
        voucher: receipt.voucher,
        credits: receipt.credits,
        kind: ActivityType::Add,
        price: receipt.price,
        current_credits: receipt.current_credits,
        status: receipt.status,
        expiration_time: receipt.expiration_time,
    }
}

/// Send an SMS and record the message with one recipient row per phone.
///
/// Returns `Ok(None)` when the provider refused the send (no `sender` in the
/// response); nothing is written in that case.
pub async fn send_sms(
    client: &MimoClient,
    store: &Store,
    request: &SendSms,
) -> Result<Option<Message>, ActionError> {
    let body = client.messages().send(request).await?;
    let receipt =
        decode_send_receipt(&body).map_err(|err| MimoError::Parse(Box::new(err)))?;
    let Some(receipt) = receipt else {
        tracing::warn!(
            sender = request.sender().as_str(),
            response = %body,
            "SMS was not accepted"
        );
        return Ok(None);
    };

    let sender_id = match receipt.sender.as_deref() {
        Some(name) => store.sender_by_name(name)?.map(|sender| sender.id),
        None => None,
    };
    let message = NewMessage {
        sender_id,
        message_id: receipt.message_id,
        text: receipt.text,
        unicode: receipt.unicode,
        size: receipt.size,
    };
    let recipients: Vec<NewRecipient> = receipt
        .recipients
        .into_iter()
        .map(|item| NewRecipient {
            phone: item.phone,
            provider_message_id: item.message_id,
            status: item
                .status
                .as_deref()
                .map(DeliveryStatus::from_provider)
                .unwrap_or_default(),
        })
        .collect();

    let stored = store.insert_message_with_recipients(&message, &recipients)?;
    tracing::info!(
        id = stored.id,
        provider_id = stored.message_id,
        recipients = recipients.len(),
        "SMS recorded"
    );
    Ok(Some(stored))
}
