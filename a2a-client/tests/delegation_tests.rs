use a2a_client::{AgentDirectory, ClientEventStream, DelegationRequest, Delegator, Transport, TransportFactory, TransportRegistry};
use a2a_core::{
    AgentCard, Artifact, ClientEvent, DelegationError, Message, Part, Role, Task, TaskState, TransportError,
    TransportKind,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
enum Step {
    Event(ClientEvent),
    Fail(TransportError),
    Panic,
}

/// Counts event streams that are still alive.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Plays a fixed script, then keeps the stream open until it is dropped.
struct ScriptedTransport {
    kind: TransportKind,
    script: Vec<Step>,
    live: Arc<AtomicUsize>,
    sent: Arc<std::sync::Mutex<Vec<Message>>>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn send_message(&self, message: Message) -> Result<ClientEventStream, TransportError> {
        self.sent.lock().unwrap().push(message);
        let script = self.script.clone();
        let guard = LiveGuard::new(&self.live);

        let stream = async_stream::stream! {
            let _guard = guard;
            for step in script {
                match step {
                    Step::Event(event) => yield Ok(event),
                    Step::Fail(err) => yield Err(err),
                    Step::Panic => panic!("scripted transport blew up"),
                }
            }
            futures::future::pending::<()>().await;
        };
        Ok(Box::pin(stream))
    }
}

#[derive(Clone)]
struct ScriptedFactory {
    kind: TransportKind,
    script: Vec<Step>,
    live: Arc<AtomicUsize>,
    sent: Arc<std::sync::Mutex<Vec<Message>>>,
}

impl ScriptedFactory {
    fn new(kind: TransportKind, script: Vec<Step>) -> Self {
        Self { kind, script, live: Arc::new(AtomicUsize::new(0)), sent: Arc::default() }
    }

    fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

impl TransportFactory for ScriptedFactory {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn create(&self, _card: &AgentCard, _url: &str) -> Result<Box<dyn Transport>, TransportError> {
        Ok(Box::new(ScriptedTransport {
            kind: self.kind,
            script: self.script.clone(),
            live: Arc::clone(&self.live),
            sent: Arc::clone(&self.sent),
        }))
    }
}

fn task(state: TaskState, texts: &[&str]) -> Task {
    let artifacts = texts.iter().enumerate().map(|(i, text)| Artifact::text(format!("a{i}"), *text)).collect();
    Task::new("task-1", state).with_artifacts(artifacts)
}

fn update(state: TaskState, texts: &[&str]) -> Step {
    Step::Event(ClientEvent::TaskUpdate(task(state, texts)))
}

fn whole(state: TaskState, texts: &[&str]) -> Step {
    Step::Event(ClientEvent::Task(task(state, texts)))
}

fn directory(kinds: &[TransportKind]) -> Arc<AgentDirectory> {
    let card = kinds
        .iter()
        .fold(AgentCard::builder().name("Order Agent").description("Looks up orders"), |builder, kind| {
            builder.interface(format!("http://orders.test/{kind}"), *kind)
        })
        .build();
    let seller = AgentCard::builder()
        .name("Seller Agent")
        .interface("http://seller.test/a2a", TransportKind::JsonRpc)
        .build();
    Arc::new(AgentDirectory::from_cards([("orders".to_string(), card), ("seller".to_string(), seller)]))
}

fn delegator(factory: &ScriptedFactory, timeout: Duration) -> Delegator {
    Delegator::new(directory(&[TransportKind::JsonRpc]), TransportRegistry::new().register(factory.clone()))
        .with_timeout(timeout)
}

#[tokio::test]
async fn test_partial_then_final_resolves_with_final_text() {
    let factory = ScriptedFactory::new(
        TransportKind::JsonRpc,
        vec![update(TaskState::Working, &["partial"]), whole(TaskState::Completed, &["final"])],
    );

    let result = delegator(&factory, Duration::from_secs(5))
        .delegate(DelegationRequest::new("orders", "Where is order 42?"))
        .await;

    assert_eq!(result, Ok("final".to_string()));
    assert_eq!(factory.live(), 0);
}

#[tokio::test]
async fn test_outbound_message_is_single_user_text_part() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![whole(TaskState::Completed, &[])]);

    delegator(&factory, Duration::from_secs(5))
        .delegate(DelegationRequest::new("orders", "Where is order 42?"))
        .await
        .unwrap();

    let sent = factory.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].role, Role::User);
    assert_eq!(sent[0].parts, vec![Part::text("Where is order 42?")]);
    assert!(!sent[0].message_id.is_empty());
}

#[tokio::test]
async fn test_completed_without_artifacts_is_empty_string() {
    let factory = ScriptedFactory::new(
        TransportKind::JsonRpc,
        vec![update(TaskState::Working, &["thinking"]), Step::Event(ClientEvent::Task(Task::new("task-1", TaskState::Completed)))],
    );

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(result, Ok(String::new()));
}

#[tokio::test]
async fn test_events_after_completion_are_ignored() {
    let factory = ScriptedFactory::new(
        TransportKind::JsonRpc,
        vec![
            whole(TaskState::Completed, &["first answer"]),
            whole(TaskState::Completed, &["second answer"]),
            whole(TaskState::Failed, &[]),
        ],
    );

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(result, Ok("first answer".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_never_completing_agent_times_out() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![update(TaskState::Working, &["still going"])]);
    let delegator = Delegator::new(directory(&[TransportKind::JsonRpc]), TransportRegistry::new().register(factory.clone()));
    assert_eq!(delegator.timeout(), Duration::from_secs(60));

    let started = tokio::time::Instant::now();
    let result = delegator.delegate(DelegationRequest::new("orders", "hi")).await;
    let elapsed = started.elapsed();

    assert_eq!(
        result,
        Err(DelegationError::Timeout { agent: "orders".to_string(), timeout: Duration::from_secs(60) })
    );
    assert!(elapsed >= Duration::from_secs(60), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(61), "returned late: {elapsed:?}");
    assert_eq!(factory.live(), 0, "subscription leaked after timeout");
}

#[tokio::test(start_paused = true)]
async fn test_input_required_waits_for_timeout() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![update(TaskState::InputRequired, &["which order?"])]);

    let result = delegator(&factory, Duration::from_secs(3)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert!(matches!(result, Err(DelegationError::Timeout { .. })));
}

#[tokio::test]
async fn test_failed_task_is_remote_failure() {
    let mut failed = task(TaskState::Failed, &[]);
    failed.status.message =
        Some(Message::builder().role(Role::Agent).parts(vec![Part::text("database unavailable")]).build());
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![Step::Event(ClientEvent::Task(failed))]);

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(
        result,
        Err(DelegationError::RemoteTaskFailed {
            agent: "orders".to_string(),
            state: TaskState::Failed,
            message: Some("database unavailable".to_string()),
        })
    );
    assert_eq!(factory.live(), 0);
}

#[tokio::test]
async fn test_rejected_task_is_remote_failure() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![update(TaskState::Rejected, &[])]);

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert!(matches!(result, Err(DelegationError::RemoteTaskFailed { state: TaskState::Rejected, .. })));
}

#[tokio::test]
async fn test_unknown_agent_lists_known_names() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![]);

    let result =
        delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("unknown-agent", "hi")).await;

    let err = result.unwrap_err();
    assert_eq!(
        err,
        DelegationError::AgentNotFound {
            name: "unknown-agent".to_string(),
            known: vec!["orders".to_string(), "seller".to_string()],
        }
    );
    assert_eq!(err.to_string(), "Agent 'unknown-agent' not found. Available agents: orders, seller");
    assert!(factory.sent().is_empty());
}

#[tokio::test]
async fn test_no_compatible_transport() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![]);
    let delegator =
        Delegator::new(directory(&[TransportKind::Grpc]), TransportRegistry::new().register(factory.clone()));

    let result = delegator.delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(
        result,
        Err(DelegationError::NoCompatibleTransport {
            agent: "orders".to_string(),
            advertised: vec![TransportKind::Grpc],
            available: vec![TransportKind::JsonRpc],
        })
    );
    assert!(factory.sent().is_empty());
}

#[tokio::test]
async fn test_transport_error_surfaces_cause() {
    let factory = ScriptedFactory::new(
        TransportKind::JsonRpc,
        vec![
            update(TaskState::Working, &["partial"]),
            Step::Fail(TransportError::Stream("connection reset".to_string())),
        ],
    );

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(
        result,
        Err(DelegationError::TransportError {
            agent: "orders".to_string(),
            source: TransportError::Stream("connection reset".to_string()),
        })
    );
    assert_eq!(factory.live(), 0);
}

#[tokio::test]
async fn test_pump_panic_is_delegation_failure() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![Step::Panic]);

    let result = delegator(&factory, Duration::from_secs(5)).delegate(DelegationRequest::new("orders", "hi")).await;

    match result {
        Err(DelegationError::DelegationFailed { agent, message }) => {
            assert_eq!(agent, "orders");
            assert!(message.contains("scripted transport blew up"), "message: {message}");
        }
        other => panic!("expected DelegationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_highest_priority_shared_transport_is_used() {
    let jsonrpc = ScriptedFactory::new(TransportKind::JsonRpc, vec![whole(TaskState::Completed, &["via jsonrpc"])]);
    let rest = ScriptedFactory::new(TransportKind::HttpJson, vec![whole(TaskState::Completed, &["via rest"])]);
    let delegator = Delegator::new(
        directory(&[TransportKind::HttpJson, TransportKind::JsonRpc]),
        TransportRegistry::new().register(rest.clone()).register(jsonrpc.clone()),
    );

    let result = delegator.delegate(DelegationRequest::new("orders", "hi")).await;

    assert_eq!(result, Ok("via jsonrpc".to_string()));
    assert!(rest.sent().is_empty());
}

#[tokio::test]
async fn test_concurrent_delegations_are_independent() {
    let factory = ScriptedFactory::new(TransportKind::JsonRpc, vec![whole(TaskState::Completed, &["done"])]);
    let delegator = Arc::new(delegator(&factory, Duration::from_secs(5)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let delegator = Arc::clone(&delegator);
            tokio::spawn(async move { delegator.delegate(DelegationRequest::new("orders", format!("task {i}"))).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok("done".to_string()));
    }
    assert_eq!(factory.sent().len(), 8);
    assert_eq!(factory.live(), 0);
}
