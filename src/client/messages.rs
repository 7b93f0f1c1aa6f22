use serde_json::Value;

use super::{MimoClient, MimoError};
use crate::domain::{DateRange, RawPhoneNumber, SendSms, ValidationError};
use crate::transport::{encode_by_date_params, encode_send_payload, join_values};

/// SMS resource (`message/*`).
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a MimoClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    /// Send one text to every recipient of `request`.
    ///
    /// The body is returned as-is; a refused send comes back as JSON without a
    /// `sender` key rather than as an error.
    pub async fn send(&self, request: &SendSms) -> Result<Value, MimoError> {
        tracing::debug!(
            sender = request.sender().as_str(),
            recipients = request.recipients().len(),
            "sending SMS"
        );
        self.client
            .post_json("message/send", encode_send_payload(request))
            .await
    }

    pub async fn all(&self) -> Result<Value, MimoError> {
        self.client.get("message/list-all", Vec::new()).await
    }

    pub async fn list_by_phone(&self, phone: &RawPhoneNumber) -> Result<Value, MimoError> {
        self.client
            .get(
                "message/list-all/by-recipient",
                vec![(RawPhoneNumber::FIELD.to_owned(), phone.raw().to_owned())],
            )
            .await
    }

    pub async fn list_by_date(&self, range: &DateRange) -> Result<Value, MimoError> {
        self.client
            .get("message/list-all/by-date", encode_by_date_params(range))
            .await
    }

    /// Every recipient of every message sent by the account.
    pub async fn list_recipients(&self) -> Result<Value, MimoError> {
        self.client
            .get("message/list-all/recipients", Vec::new())
            .await
    }

    pub async fn check_status(&self, id: i64) -> Result<Value, MimoError> {
        self.client
            .get("message/list-one", vec![("id".to_owned(), id.to_string())])
            .await
    }

    pub async fn delete(&self, ids: &[i64]) -> Result<Value, MimoError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty { field: "ids" }.into());
        }
        let joined = join_values(ids.iter().map(i64::to_string));
        self.client
            .get("message/delete", vec![("ids".to_owned(), joined)])
            .await
    }

    pub async fn delete_all(&self) -> Result<Value, MimoError> {
        self.client.get("message/delete/all", Vec::new()).await
    }
}
