//! Turns one outbound message and its asynchronous task lifecycle into a
//! single awaited result.

use crate::directory::AgentDirectory;
use crate::selector::select_transport;
use crate::transport::{Transport, TransportRegistry};
use a2a_core::{ClientEvent, DelegationError, Message, TaskState, TransportError};
use a2a_telemetry::{delegation_span, record_transport};
use futures::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

pub const DEFAULT_DELEGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// A task to hand to a named remote agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    pub target_agent_name: String,
    pub task_text: String,
}

impl DelegationRequest {
    pub fn new(target_agent_name: impl Into<String>, task_text: impl Into<String>) -> Self {
        Self { target_agent_name: target_agent_name.into(), task_text: task_text.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationState {
    /// Waiting; `best` is the text of the most recent task event.
    Pending { best: String },
    Resolved(String),
    Failed(DelegationError),
}

impl CorrelationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, CorrelationState::Pending { .. })
    }
}

/// Per-request correlation cell.
///
/// The pump is the only writer. Once the cell leaves `Pending` every later
/// write is ignored.
#[derive(Debug)]
pub struct Correlation {
    agent: String,
    cell: watch::Sender<CorrelationState>,
}

impl Correlation {
    pub fn new(agent: impl Into<String>) -> Self {
        let (cell, _) = watch::channel(CorrelationState::Pending { best: String::new() });
        Self { agent: agent.into(), cell }
    }

    /// Record a transport event. Returns `true` once the cell has settled.
    pub fn on_event(&self, event: &ClientEvent) -> bool {
        let Some(task) = event.task() else {
            debug!(event.kind = event.kind(), "Ignoring event without a task");
            return !self.is_pending();
        };

        let state = task.state();
        let text = task.artifact_text();
        debug!(task.id = %task.id, task.state = %state, text_len = text.len(), "Task event");

        let next = match state {
            TaskState::Completed => CorrelationState::Resolved(text),
            TaskState::Failed | TaskState::Canceled | TaskState::Rejected => {
                let message = task
                    .status
                    .message
                    .as_ref()
                    .map(Message::text)
                    .filter(|text| !text.is_empty());
                CorrelationState::Failed(DelegationError::RemoteTaskFailed {
                    agent: self.agent.clone(),
                    state,
                    message,
                })
            }
            _ => CorrelationState::Pending { best: text },
        };
        self.settle(next);
        !self.is_pending()
    }

    pub fn on_transport_error(&self, source: TransportError) {
        self.settle(CorrelationState::Failed(DelegationError::TransportError {
            agent: self.agent.clone(),
            source,
        }));
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.settle(CorrelationState::Failed(DelegationError::DelegationFailed {
            agent: self.agent.clone(),
            message: message.into(),
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.cell.borrow().is_pending()
    }

    /// Text of the latest task event, or the resolved text.
    pub fn best_response(&self) -> String {
        match &*self.cell.borrow() {
            CorrelationState::Pending { best } | CorrelationState::Resolved(best) => best.clone(),
            CorrelationState::Failed(_) => String::new(),
        }
    }

    /// Wait at most `timeout` for the cell to settle.
    pub async fn wait(&self, timeout: Duration) -> Result<String, DelegationError> {
        let mut rx = self.cell.subscribe();
        let settled = tokio::time::timeout(timeout, async {
            rx.wait_for(|state| !state.is_pending()).await.map(|state| (*state).clone())
        })
        .await;

        match settled {
            Ok(Ok(CorrelationState::Resolved(text))) => Ok(text),
            Ok(Ok(CorrelationState::Failed(err))) => Err(err),
            Ok(Ok(CorrelationState::Pending { .. })) | Ok(Err(_)) => Err(DelegationError::DelegationFailed {
                agent: self.agent.clone(),
                message: "correlation cell closed before a result arrived".to_string(),
            }),
            Err(_) => {
                let err = DelegationError::Timeout { agent: self.agent.clone(), timeout };
                self.settle(CorrelationState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    fn settle(&self, next: CorrelationState) {
        self.cell.send_if_modified(|current| {
            if !current.is_pending() {
                return false;
            }
            *current = next;
            true
        });
    }
}

/// The pump task feeding one correlation.
///
/// Call [`Subscription::release`] on every exit path; dropping aborts the pump
/// without waiting for it.
#[derive(Debug)]
pub struct Subscription {
    pump: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Send `message` over `transport` and feed every event into `correlation`.
    pub fn open(transport: Box<dyn Transport>, message: Message, correlation: Arc<Correlation>) -> Self {
        let pump = tokio::spawn(
            async move {
                let drained = AssertUnwindSafe(pump_events(transport, message, &correlation))
                    .catch_unwind()
                    .await;
                if let Err(panic) = drained {
                    let message = panic_message(panic.as_ref());
                    warn!(error = %message, "Event pump panicked");
                    correlation.fail(format!("event pump panicked: {message}"));
                }
            }
            .in_current_span(),
        );
        Self { pump: Some(pump) }
    }

    pub fn is_active(&self) -> bool {
        self.pump.as_ref().is_some_and(|pump| !pump.is_finished())
    }

    /// Stop the pump and wait until it, its stream and its transport are gone.
    pub async fn release(mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
            let _ = pump.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

async fn pump_events(transport: Box<dyn Transport>, message: Message, correlation: &Correlation) {
    let mut events = match transport.send_message(message).await {
        Ok(events) => events,
        Err(e) => {
            correlation.on_transport_error(e);
            return;
        }
    };

    while let Some(event) = events.next().await {
        match event {
            Ok(event) => {
                if correlation.on_event(&event) {
                    break;
                }
            }
            Err(e) => {
                correlation.on_transport_error(e);
                break;
            }
        }
    }
    debug!(settled = !correlation.is_pending(), "Event stream finished");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Delegates tasks to agents in the directory.
#[derive(Debug, Clone)]
pub struct Delegator {
    directory: Arc<AgentDirectory>,
    transports: TransportRegistry,
    timeout: Duration,
}

impl Delegator {
    pub fn new(directory: Arc<AgentDirectory>, transports: TransportRegistry) -> Self {
        Self { directory, transports, timeout: DEFAULT_DELEGATION_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn directory(&self) -> &AgentDirectory {
        &self.directory
    }

    pub fn transports(&self) -> &TransportRegistry {
        &self.transports
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request.task_text` to the named agent and wait for its completed
    /// task. Returns the flattened artifact text of the last task event.
    pub async fn delegate(&self, request: DelegationRequest) -> Result<String, DelegationError> {
        let span = delegation_span(&request.target_agent_name);
        self.delegate_in_span(request).instrument(span).await
    }

    async fn delegate_in_span(&self, request: DelegationRequest) -> Result<String, DelegationError> {
        let agent = request.target_agent_name;
        let card = self.directory.get(&agent).ok_or_else(|| DelegationError::AgentNotFound {
            name: agent.clone(),
            known: self.directory.names(),
        })?;

        let available = self.transports.available();
        let kind = select_transport(card, &available).ok_or_else(|| {
            DelegationError::NoCompatibleTransport {
                agent: agent.clone(),
                advertised: card.supported_bindings().into_iter().collect(),
                available: available.iter().copied().collect(),
            }
        })?;
        record_transport(kind.as_binding());

        let url = card.interface_url(kind).ok_or_else(|| DelegationError::DelegationFailed {
            agent: agent.clone(),
            message: format!("card lists no {kind} interface URL"),
        })?;
        let factory = self.transports.factory(kind).ok_or_else(|| DelegationError::TransportError {
            agent: agent.clone(),
            source: TransportError::Unsupported(kind),
        })?;
        let transport = factory
            .create(card, url)
            .map_err(|source| DelegationError::TransportError { agent: agent.clone(), source })?;

        let message = Message::user_text(request.task_text);
        info!(url, message.id = %message.message_id, "Sending task to remote agent");

        let correlation = Arc::new(Correlation::new(agent.as_str()));
        let subscription = Subscription::open(transport, message, Arc::clone(&correlation));
        let outcome = correlation.wait(self.timeout).await;
        subscription.release().await;

        match &outcome {
            Ok(text) => info!(response_len = text.len(), "Delegation completed"),
            Err(e) => warn!(error = %e, "Delegation failed"),
        }
        outcome
    }
}
