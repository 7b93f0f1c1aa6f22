use std::path::Path;

use serde_json::{Value, json};

use super::contacts::to_payload;
use super::{MimoClient, MimoError};
use crate::domain::{GroupName, GroupUpdate, RawPhoneNumber, ValidationError};
use crate::transport::join_values;

/// Contact group resource (`group/*`).
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    client: &'a MimoClient,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, MimoError> {
        self.client.get("group/list-all", Vec::new()).await
    }

    /// Create a group, optionally seeded with `contacts`.
    pub async fn create(
        &self,
        name: &GroupName,
        contacts: Option<&[RawPhoneNumber]>,
    ) -> Result<Value, MimoError> {
        let mut payload = json!({ "name": name.as_str() });
        if let Some(contacts) = contacts {
            let phones: Vec<&str> = contacts.iter().map(RawPhoneNumber::raw).collect();
            payload["contacts"] = to_payload(&phones)?;
        }
        self.client.post_json("group/add", payload).await
    }

    /// Add every phone to every listed group.
    pub async fn add(
        &self,
        groups: &[GroupName],
        phones: &[RawPhoneNumber],
    ) -> Result<Value, MimoError> {
        if groups.is_empty() {
            return Err(ValidationError::Empty { field: "groups" }.into());
        }
        if phones.is_empty() {
            return Err(ValidationError::Empty { field: "phones" }.into());
        }
        let params = vec![
            (
                "groups".to_owned(),
                join_values(groups.iter().map(GroupName::as_str)),
            ),
            (
                "phones".to_owned(),
                join_values(phones.iter().map(RawPhoneNumber::raw)),
            ),
        ];
        self.client.get("group/add/contacts", params).await
    }

    /// Upload a contacts file (CSV/XLSX as accepted by MIMO) as multipart field `file`.
    pub async fn add_from_file(&self, path: &Path) -> Result<Value, MimoError> {
        self.client
            .post_file("group/add/contacts", "file", path)
            .await
    }

    pub async fn update(&self, update: &GroupUpdate) -> Result<Value, MimoError> {
        match update {
            GroupUpdate::Rename { name, new_name } => {
                let params = vec![
                    (GroupName::FIELD.to_owned(), name.as_str().to_owned()),
                    ("new-name".to_owned(), new_name.as_str().to_owned()),
                ];
                self.client.get("group/edit/name", params).await
            }
            GroupUpdate::Edit(payload) => self.client.post_json("group/edit", payload.clone()).await,
        }
    }

    pub async fn view(&self, name: &GroupName) -> Result<Value, MimoError> {
        self.client
            .get(
                "group/list-one",
                vec![(GroupName::FIELD.to_owned(), name.as_str().to_owned())],
            )
            .await
    }

    pub async fn delete(&self, names: &[GroupName]) -> Result<Value, MimoError> {
        if names.is_empty() {
            return Err(ValidationError::Empty { field: "names" }.into());
        }
        let joined = join_values(names.iter().map(GroupName::as_str));
        self.client
            .get("group/delete", vec![("names".to_owned(), joined)])
            .await
    }

    pub async fn delete_all(&self) -> Result<Value, MimoError> {
        self.client.get("group/delete/all", Vec::new()).await
    }
}
