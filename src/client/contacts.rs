use serde::Serialize;
use serde_json::Value;

use super::{MimoClient, MimoError};
use crate::domain::{RawPhoneNumber, ValidationError};
use crate::transport::join_values;

/// Address book resource (`contact/*`).
///
/// Contact payloads are free-form; any serializable value is posted as JSON.
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a MimoClient,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, MimoError> {
        self.client.get("contact/list-all", Vec::new()).await
    }

    pub async fn create<P>(&self, payload: &P) -> Result<Value, MimoError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_payload(payload)?;
        self.client.post_json("contact/add", payload).await
    }

    pub async fn update<P>(&self, payload: &P) -> Result<Value, MimoError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_payload(payload)?;
        self.client.post_json("contact/edit", payload).await
    }

    pub async fn view(&self, phone: &RawPhoneNumber) -> Result<Value, MimoError> {
        self.client
            .get(
                "contact/list-one",
                vec![(RawPhoneNumber::FIELD.to_owned(), phone.raw().to_owned())],
            )
            .await
    }

    pub async fn delete(&self, phones: &[RawPhoneNumber]) -> Result<Value, MimoError> {
        if phones.is_empty() {
            return Err(ValidationError::Empty { field: "phones" }.into());
        }
        let joined = join_values(phones.iter().map(RawPhoneNumber::raw));
        self.client
            .get("contact/delete", vec![("phones".to_owned(), joined)])
            .await
    }

    pub async fn delete_all(&self) -> Result<Value, MimoError> {
        self.client.get("contact/delete/all", Vec::new()).await
    }
}

pub(crate) fn to_payload<P>(payload: &P) -> Result<Value, MimoError>
where
    P: Serialize + ?Sized,
{
    serde_json::to_value(payload).map_err(MimoError::Encode)
}
