use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use url::Url;

use super::{BoxFuture, HttpBody, HttpMethod, HttpResponse, HttpTransport};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) path: String,
    pub(crate) body: HttpBody,
}

impl RecordedRequest {
    pub(crate) fn query(&self, key: &str) -> Option<String> {
        Url::parse(&self.url).ok().and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
    }
}

#[derive(Debug, Default)]
struct FakeTransportState {
    routes: Vec<(String, u16, String)>,
    requests: Vec<RecordedRequest>,
    failure: Option<String>,
}

/// Canned responses keyed by endpoint; unmatched requests get `404` with an empty body.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(message: &str) -> Self {
        let transport = Self::default();
        transport.state.lock().unwrap().failure = Some(message.to_owned());
        transport
    }

    pub(crate) fn respond(self, endpoint: &str, status: u16, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .push((endpoint.to_owned(), status, body.into()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        method: HttpMethod,
        url: Url,
        body: HttpBody,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.requests.push(RecordedRequest {
                method,
                url: url.to_string(),
                path: url.path().to_owned(),
                body,
            });
            if let Some(message) = state.failure.clone() {
                return Err(message.into());
            }

            let path = url.path();
            let (status, body) = state
                .routes
                .iter()
                .find(|(endpoint, _, _)| path.ends_with(endpoint.as_str()))
                .map(|(_, status, body)| (*status, body.clone()))
                .unwrap_or((404, String::new()));
            Ok(HttpResponse { status, body })
        })
    }
}
