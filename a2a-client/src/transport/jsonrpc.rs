use super::{ClientEventStream, Transport, TransportFactory, check_status, client_events, parse_endpoint, sse};
use a2a_core::{
    AgentCard, JsonRpcRequest, JsonRpcResponse, Message, MessageSendParams, StreamResult,
    TransportError, TransportKind, jsonrpc::methods,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;

/// Streams messages over JSON-RPC 2.0 with an SSE response.
///
/// The method defaults to `message/stream`; [`JsonRpcTransportFactory`]
/// switches to `SendStreamingMessage` for agents on protocol 1.x.
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    http_client: reqwest::Client,
    url: reqwest::Url,
    method: &'static str,
}

impl JsonRpcTransport {
    pub fn new(http_client: reqwest::Client, url: &str) -> Result<Self, TransportError> {
        Ok(Self { http_client, url: parse_endpoint(url)?, method: methods::MESSAGE_STREAM })
    }

    pub fn with_method(mut self, method: &'static str) -> Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> &'static str {
        self.method
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::JsonRpc
    }

    async fn send_message(&self, message: Message) -> Result<ClientEventStream, TransportError> {
        let params = serde_json::to_value(MessageSendParams::text_only(message))
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let request = JsonRpcRequest::new(self.method, params);

        let response = self
            .http_client
            .post(self.url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        let response = check_status(response).await?;

        Ok(client_events(sse::event_payloads(response), decode_rpc_payload))
    }
}

fn decode_rpc_payload(data: &str) -> Result<Option<StreamResult>, TransportError> {
    let rpc_response = match serde_json::from_str::<JsonRpcResponse>(data) {
        Ok(r) => r,
        Err(e) => {
            // Skip parse errors for non-JSON data
            tracing::debug!("Failed to parse SSE data: {}", e);
            return Ok(None);
        }
    };

    if let Some(error) = rpc_response.error {
        return Err(TransportError::Rpc { code: error.code, message: error.message });
    }

    let Some(result) = rpc_response.result else {
        return Ok(None);
    };
    let decoded = StreamResult::from_value(result).map_err(|e| TransportError::Decode(e.to_string()))?;
    if decoded.is_none() {
        tracing::debug!("Ignoring unrecognised stream result");
    }
    Ok(decoded)
}

#[derive(Debug, Clone)]
pub struct JsonRpcTransportFactory {
    http_client: reqwest::Client,
}

impl JsonRpcTransportFactory {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl TransportFactory for JsonRpcTransportFactory {
    fn kind(&self) -> TransportKind {
        TransportKind::JsonRpc
    }

    fn create(&self, card: &AgentCard, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        let method = methods::streaming_method(card.protocol_version.as_deref());
        Ok(Box::new(JsonRpcTransport::new(self.http_client.clone(), url)?.with_method(method)))
    }
}
