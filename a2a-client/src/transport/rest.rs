use super::{ClientEventStream, Transport, TransportFactory, check_status, client_events, parse_endpoint, sse};
use a2a_core::{AgentCard, Message, MessageSendParams, StreamResult, TransportError, TransportKind};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;

const STREAM_PATH: &str = "message:stream";

/// HTTP+JSON binding: POST `<url>/message:stream`, events as SSE.
#[derive(Debug, Clone)]
pub struct RestTransport {
    http_client: reqwest::Client,
    stream_url: reqwest::Url,
}

impl RestTransport {
    pub fn new(http_client: reqwest::Client, url: &str) -> Result<Self, TransportError> {
        let base = parse_endpoint(url)?;
        let stream_url = parse_endpoint(&format!("{}/{}", base.as_str().trim_end_matches('/'), STREAM_PATH))?;
        Ok(Self { http_client, stream_url })
    }

    pub fn stream_url(&self) -> &str {
        self.stream_url.as_str()
    }
}

#[async_trait]
impl Transport for RestTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::HttpJson
    }

    async fn send_message(&self, message: Message) -> Result<ClientEventStream, TransportError> {
        let response = self
            .http_client
            .post(self.stream_url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(&MessageSendParams::text_only(message))
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        let response = check_status(response).await?;

        Ok(client_events(sse::event_payloads(response), decode_rest_payload))
    }
}

fn decode_rest_payload(data: &str) -> Result<Option<StreamResult>, TransportError> {
    let value: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Failed to parse SSE data: {}", e);
            return Ok(None);
        }
    };
    StreamResult::from_value(value).map_err(|e| TransportError::Decode(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct RestTransportFactory {
    http_client: reqwest::Client,
}

impl RestTransportFactory {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl TransportFactory for RestTransportFactory {
    fn kind(&self) -> TransportKind {
        TransportKind::HttpJson
    }

    fn create(&self, _card: &AgentCard, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        Ok(Box::new(RestTransport::new(self.http_client.clone(), url)?))
    }
}
