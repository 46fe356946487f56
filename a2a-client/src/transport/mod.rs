//! Transports carry one outbound message to a remote agent and report the
//! task events it produces.

mod accumulator;
mod jsonrpc;
mod rest;
mod sse;

pub use accumulator::TaskAccumulator;
pub use jsonrpc::{JsonRpcTransport, JsonRpcTransportFactory};
pub use rest::{RestTransport, RestTransportFactory};

use a2a_core::{AgentCard, ClientEvent, Message, StreamResult, TransportError, TransportKind};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{BoxStream, Stream};
use std::collections::{BTreeMap, BTreeSet};
use std::pin::Pin;
use std::sync::Arc;

/// Events for one sent message, in arrival order.
pub type ClientEventStream =
    Pin<Box<dyn Stream<Item = Result<ClientEvent, TransportError>> + Send>>;

/// A client bound to one interface of one remote agent.
#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Dispatch `message`. The returned stream yields every event the remote
    /// agent reports for it; dropping the stream ends the subscription.
    async fn send_message(&self, message: Message) -> Result<ClientEventStream, TransportError>;
}

/// Opens [`Transport`]s of one kind.
pub trait TransportFactory: Send + Sync {
    fn kind(&self) -> TransportKind;

    fn create(&self, card: &AgentCard, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}

/// The transport implementations available to this process.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    factories: BTreeMap<TransportKind, Arc<dyn TransportFactory>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON-RPC and HTTP+JSON over a shared HTTP client.
    pub fn with_http_defaults(http_client: reqwest::Client) -> Self {
        Self::new()
            .register(JsonRpcTransportFactory::new(http_client.clone()))
            .register(RestTransportFactory::new(http_client))
    }

    /// Add a factory, replacing any earlier one of the same kind.
    pub fn register(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.factories.insert(factory.kind(), Arc::new(factory));
        self
    }

    pub fn available(&self) -> BTreeSet<TransportKind> {
        self.factories.keys().copied().collect()
    }

    pub fn factory(&self, kind: TransportKind) -> Option<&Arc<dyn TransportFactory>> {
        self.factories.get(&kind)
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRegistry").field("available", &self.available()).finish()
    }
}

fn parse_endpoint(url: &str) -> Result<reqwest::Url, TransportError> {
    reqwest::Url::parse(url).map_err(|e| TransportError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Reject non-2xx responses, keeping the body for the error message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status { status: status.as_u16(), body })
}

/// Decode raw payloads and fold them into whole-task events.
///
/// `decode` returns `Ok(None)` for payloads that carry nothing for us.
fn client_events<F>(
    payloads: BoxStream<'static, Result<String, TransportError>>,
    decode: F,
) -> ClientEventStream
where
    F: Fn(&str) -> Result<Option<StreamResult>, TransportError> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut payloads = payloads;
        let mut accumulator = TaskAccumulator::default();
        while let Some(payload) = payloads.next().await {
            match payload.and_then(|data| decode(&data)) {
                Ok(Some(result)) => yield Ok(accumulator.apply(result)),
                Ok(None) => {}
                Err(e) => yield Err(e),
            }
        }
    };
    Box::pin(stream)
}
