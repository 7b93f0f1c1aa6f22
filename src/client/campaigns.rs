use serde::Serialize;
use serde_json::Value;

use super::contacts::to_payload;
use super::{MimoClient, MimoError};
use crate::domain::{CampaignTitle, ValidationError};
use crate::transport::join_values;

/// Campaign resource. MIMO files campaigns under `note/*`.
#[derive(Debug, Clone, Copy)]
pub struct Campaigns<'a> {
    client: &'a MimoClient,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, MimoError> {
        self.client.get("note/list-all", Vec::new()).await
    }

    pub async fn create<P>(&self, payload: &P) -> Result<Value, MimoError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_payload(payload)?;
        self.client.post_json("note/add", payload).await
    }

    pub async fn update<P>(&self, payload: &P) -> Result<Value, MimoError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_payload(payload)?;
        self.client.post_json("note/edit", payload).await
    }

    pub async fn view(&self, title: &CampaignTitle) -> Result<Value, MimoError> {
        self.client
            .get(
                "note/",
                vec![(CampaignTitle::FIELD.to_owned(), title.as_str().to_owned())],
            )
            .await
    }

    pub async fn delete(&self, titles: &[CampaignTitle]) -> Result<Value, MimoError> {
        if titles.is_empty() {
            return Err(ValidationError::Empty { field: "titles" }.into());
        }
        let joined = join_values(titles.iter().map(CampaignTitle::as_str));
        self.client
            .get("note/delete", vec![("titles".to_owned(), joined)])
            .await
    }

    pub async fn delete_all(&self) -> Result<Value, MimoError> {
        self.client.get("note/delete/all", Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::HttpBody;
    use crate::client::fake::FakeTransport;

    fn title(raw: &str) -> CampaignTitle {
        CampaignTitle::new(raw).unwrap()
    }

    #[tokio::test]
    async fn view_keeps_trailing_slash_on_note_endpoint() {
        let transport = FakeTransport::new().respond("note/", 200, r#"{"title": "Black Friday"}"#);
        let client = MimoClient::with_transport(transport.clone());

        let body = client.campaigns().view(&title("Black Friday")).await.unwrap();
        assert_eq!(body["title"], "Black Friday");

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/v1/note/");
        assert_eq!(request.query("title").as_deref(), Some("Black Friday"));
    }

    #[tokio::test]
    async fn create_and_update_post_payloads() {
        let transport = FakeTransport::new()
            .respond("note/add", 201, "{}")
            .respond("note/edit", 200, "{}");
        let client = MimoClient::with_transport(transport.clone());
        let payload = json!({"title": "Launch", "text": "New store opening"});

        client.campaigns().create(&payload).await.unwrap();
        client.campaigns().update(&payload).await.unwrap();

        let requests = transport.requests();
        assert!(requests[0].path.ends_with("note/add"));
        assert_eq!(requests[0].body, HttpBody::Json(payload.clone()));
        assert!(requests[1].path.ends_with("note/edit"));
    }

    #[tokio::test]
    async fn delete_joins_titles() {
        let transport = FakeTransport::new()
            .respond("note/delete", 200, "{}")
            .respond("note/delete/all", 200, "{}");
        let client = MimoClient::with_transport(transport.clone());

        client
            .campaigns()
            .delete(&[title("Launch"), title("Promo")])
            .await
            .unwrap();
        client.campaigns().delete_all().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].query("titles").as_deref(), Some("Launch,Promo"));
        assert!(requests[1].path.ends_with("note/delete/all"));

        let err = client.campaigns().delete(&[]).await.unwrap_err();
        assert!(matches!(err, MimoError::Validation(_)));
    }
}
