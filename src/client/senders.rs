use serde_json::Value;

use super::{MimoClient, MimoError};
use crate::domain::{NewSender, SenderName, ValidationError};
use crate::transport::{encode_new_sender_payload, join_values};

/// Sender id resource (`sender-id/*`).
#[derive(Debug, Clone, Copy)]
pub struct Senders<'a> {
    client: &'a MimoClient,
}

impl<'a> Senders<'a> {
    pub(crate) fn new(client: &'a MimoClient) -> Self {
        Self { client }
    }

    /// List every sender id on the account, or only those still awaiting approval.
    pub async fn list(&self, requested: bool) -> Result<Value, MimoError> {
        let endpoint = if requested {
            "sender-id/list-all/requested"
        } else {
            "sender-id/list-all"
        };
        self.client.get(endpoint, Vec::new()).await
    }

    /// Ask MIMO to approve a new sender id.
    pub async fn create(&self, request: &NewSender) -> Result<Value, MimoError> {
        self.client
            .post_json("sender-id/request", encode_new_sender_payload(request))
            .await
    }

    pub async fn view(&self, sender: &SenderName) -> Result<Value, MimoError> {
        self.client
            .get("sender-id/list-one", sender_param(sender))
            .await
    }

    /// Make `sender` the account's default sender id.
    pub async fn make_default(&self, sender: &SenderName) -> Result<Value, MimoError> {
        self.client
            .get("sender-id/default", sender_param(sender))
            .await
    }

    pub async fn delete(&self, senders: &[SenderName]) -> Result<Value, MimoError> {
        if senders.is_empty() {
            return Err(ValidationError::Empty { field: "senders" }.into());
        }
        let joined = join_values(senders.iter().map(SenderName::as_str));
        self.client
            .get("sender-id/delete", vec![("senders".to_owned(), joined)])
            .await
    }
}

fn sender_param(sender: &SenderName) -> Vec<(String, String)> {
    vec![(SenderName::FIELD.to_owned(), sender.as_str().to_owned())]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::fake::FakeTransport;
    use crate::client::{HttpBody, HttpMethod};

    fn name(raw: &str) -> SenderName {
        SenderName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn list_switches_endpoint_on_requested_flag() {
        let transport = FakeTransport::new()
            .respond("sender-id/list-all", 200, r#"{"content": []}"#)
            .respond("sender-id/list-all/requested", 200, r#"{"content": []}"#);
        let client = MimoClient::with_transport(transport.clone());

        client.senders().list(false).await.unwrap();
        client.senders().list(true).await.unwrap();

        let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/v1/sender-id/list-all".to_owned(),
                "/v1/sender-id/list-all/requested".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn create_posts_sender_and_reason() {
        let transport = FakeTransport::new().respond("sender-id/request", 201, "{}");
        let client = MimoClient::with_transport(transport.clone());

        client
            .senders()
            .create(&NewSender::new(name("LIVING"), "Campaigns"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.body,
            HttpBody::Json(json!({"sender": "LIVING", "reason": "Campaigns"}))
        );
    }

    #[tokio::test]
    async fn view_and_make_default_pass_sender_param() {
        let transport = FakeTransport::new()
            .respond("sender-id/list-one", 200, "{}")
            .respond("sender-id/default", 200, "{}");
        let client = MimoClient::with_transport(transport.clone());

        client.senders().view(&name("LIVING")).await.unwrap();
        client.senders().make_default(&name("PROMO")).await.unwrap();

        let requests = transport.requests();
        assert!(requests[0].path.ends_with("sender-id/list-one"));
        assert_eq!(requests[0].query("sender").as_deref(), Some("LIVING"));
        assert!(requests[1].path.ends_with("sender-id/default"));
        assert_eq!(requests[1].query("sender").as_deref(), Some("PROMO"));
    }

    #[tokio::test]
    async fn delete_joins_sender_names() {
        let transport = FakeTransport::new().respond("sender-id/delete", 200, "{}");
        let client = MimoClient::with_transport(transport.clone());

        client
            .senders()
            .delete(&[name("LIVING"), name("PROMO")])
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query("senders").as_deref(), Some("LIVING,PROMO"));
    }

    #[tokio::test]
    async fn delete_rejects_empty_selection() {
        let client = MimoClient::with_transport(FakeTransport::new());
        let err = client.senders().delete(&[]).await.unwrap_err();
        assert!(matches!(err, MimoError::Validation(_)));
    }
}
