//! Span helpers for delegation, card discovery, and skill registration.

use tracing::Span;

/// Create a span for one outbound delegation
///
/// # Arguments
/// * `agent_name` - Directory name of the target agent
///
/// The `transport` field starts empty; see [`record_transport`].
///
/// # Example
/// ```
/// use a2a_telemetry::delegation_span;
/// let span = delegation_span("order-agent");
/// let _enter = span.enter();
/// ```
pub fn delegation_span(agent_name: &str) -> Span {
    tracing::info_span!(
        "a2a.delegate",
        agent.name = agent_name,
        transport = tracing::field::Empty,
        otel.kind = "client"
    )
}

/// Record the selected transport on the current delegation span.
pub fn record_transport(transport: &str) {
    Span::current().record("transport", transport);
}

/// Create a span for fetching one agent card
pub fn card_fetch_span(agent_name: &str, url: &str) -> Span {
    tracing::info_span!("a2a.card.fetch", agent.name = agent_name, card.url = url, otel.kind = "client")
}

pub fn skill_registration_span(skill_id: &str) -> Span {
    tracing::debug_span!("skill.register", skill.id = skill_id)
}
