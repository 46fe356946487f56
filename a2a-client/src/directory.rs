use a2a_core::{AgentCard, CardError};
use a2a_telemetry::card_fetch_span;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{Instrument, info, warn};

pub const AGENT_CARD_PATH: &str = ".well-known/agent-card.json";

/// One configured remote agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAgentSetting {
    /// Base URL of the remote agent (e.g., "http://localhost:9001")
    pub endpoint: String,
    /// Health-check URL. Carried through configuration, not used for delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_url: Option<String>,
}

impl RemoteAgentSetting {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), health_url: None }
    }
}

/// Build the capability document URL for an agent endpoint.
///
/// A trailing slash is stripped from the endpoint path before the well-known
/// suffix is appended; query and fragment are dropped.
pub fn agent_card_url(endpoint: &str) -> Result<Url, CardError> {
    let invalid = |reason: String| CardError::InvalidEndpoint { url: endpoint.to_string(), reason };

    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("endpoint cannot carry a path".to_string()));
    }

    let path = format!("{}/{}", url.path().trim_end_matches('/'), AGENT_CARD_PATH);
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Source of agent cards.
#[async_trait]
pub trait CardResolver: Send + Sync {
    async fn resolve(&self, endpoint: &str) -> Result<AgentCard, CardError>;
}

/// Fetches cards over HTTP from `<endpoint>/.well-known/agent-card.json`.
#[derive(Debug, Clone)]
pub struct HttpCardResolver {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpCardResolver {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client, timeout: Self::DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpCardResolver {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl CardResolver for HttpCardResolver {
    async fn resolve(&self, endpoint: &str) -> Result<AgentCard, CardError> {
        let url = agent_card_url(endpoint)?;
        let url_string = url.to_string();

        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CardError::Fetch { url: url_string.clone(), message: e.to_string() })?;

        if !response.status().is_success() {
            return Err(CardError::Status { url: url_string, status: response.status().as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CardError::Fetch { url: url_string.clone(), message: e.to_string() })?;

        serde_json::from_slice(&body)
            .map_err(|e| CardError::Parse { url: url_string, message: e.to_string() })
    }
}

/// Remote agents known to this process, keyed by configured name.
///
/// Built once at start-up and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AgentDirectory {
    entries: BTreeMap<String, AgentCard>,
}

impl AgentDirectory {
    /// Resolve every configured agent. An agent whose card cannot be fetched
    /// or parsed is logged and left out; the rest of the build continues.
    pub async fn build(
        configured: &BTreeMap<String, RemoteAgentSetting>,
        resolver: &dyn CardResolver,
    ) -> Self {
        info!(count = configured.len(), "Initializing remote agent connections");

        let fetches = configured.iter().map(|(name, setting)| {
            let span = card_fetch_span(name, &setting.endpoint);
            async move {
                info!("Connecting remote agent");
                match resolver.resolve(&setting.endpoint).await {
                    Ok(card) => {
                        info!(card.name = %card.name, "Discovered agent");
                        Some((name.clone(), card))
                    }
                    Err(e) => {
                        warn!(error = %e, "Problem connecting remote agent, leaving it out");
                        None
                    }
                }
            }
            .instrument(span)
        });

        let entries: BTreeMap<_, _> =
            futures::future::join_all(fetches).await.into_iter().flatten().collect();

        info!(resolved = entries.len(), configured = configured.len(), "Remote agent directory built");
        Self { entries }
    }

    /// A directory over already-known cards.
    pub fn from_cards(cards: impl IntoIterator<Item = (String, AgentCard)>) -> Self {
        Self { entries: cards.into_iter().collect() }
    }

    pub fn get(&self, name: &str) -> Option<&AgentCard> {
        self.entries.get(name)
    }

    /// Names of all known agents, in name order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentCard)> {
        self.entries.iter().map(|(name, card)| (name.as_str(), card))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `{"name": ..., "card": ..., "description": ...}` line per agent,
    /// for a planner prompt. `name` is the key to delegate with; `card` is
    /// what the agent calls itself and is left out when the card has no name.
    pub fn describe_all(&self) -> String {
        self.entries
            .iter()
            .map(|(name, card)| {
                let description =
                    if card.description.is_empty() { "No description" } else { card.description.as_str() };
                let card_name = if card.name.is_empty() {
                    String::new()
                } else {
                    format!(", \"card\": {}", Value::String(card.name.clone()))
                };
                format!(
                    "{{\"name\": {}{}, \"description\": {}}}",
                    Value::String(name.clone()),
                    card_name,
                    Value::String(description.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticResolver {
        cards: HashMap<String, AgentCard>,
    }

    #[async_trait]
    impl CardResolver for StaticResolver {
        async fn resolve(&self, endpoint: &str) -> Result<AgentCard, CardError> {
            self.cards.get(endpoint).cloned().ok_or_else(|| CardError::Fetch {
                url: endpoint.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn card(name: &str, description: &str) -> AgentCard {
        AgentCard::builder().name(name).description(description).build()
    }

    #[test]
    fn test_agent_card_url_joining() {
        let cases = [
            ("http://localhost:9001", "http://localhost:9001/.well-known/agent-card.json"),
            ("http://localhost:9001/", "http://localhost:9001/.well-known/agent-card.json"),
            ("http://host/agents/orders", "http://host/agents/orders/.well-known/agent-card.json"),
            ("http://host/agents/orders/", "http://host/agents/orders/.well-known/agent-card.json"),
            ("https://host/a2a?tenant=x", "https://host/a2a/.well-known/agent-card.json"),
        ];
        for (endpoint, expected) in cases {
            assert_eq!(agent_card_url(endpoint).unwrap().as_str(), expected, "endpoint {}", endpoint);
        }
    }

    #[test]
    fn test_agent_card_url_rejects_garbage() {
        assert!(matches!(agent_card_url("not a url"), Err(CardError::InvalidEndpoint { .. })));
        assert!(matches!(agent_card_url("mailto:a@b.c"), Err(CardError::InvalidEndpoint { .. })));
    }

    #[tokio::test]
    async fn test_build_omits_failed_agents() {
        let resolver = StaticResolver {
            cards: HashMap::from([
                ("http://orders".to_string(), card("Order Agent", "Looks up orders")),
                ("http://seller".to_string(), card("Seller Agent", "")),
            ]),
        };
        let configured = BTreeMap::from([
            ("orders".to_string(), RemoteAgentSetting::new("http://orders")),
            ("broken".to_string(), RemoteAgentSetting::new("http://broken")),
            ("seller".to_string(), RemoteAgentSetting::new("http://seller")),
        ]);

        let directory = AgentDirectory::build(&configured, &resolver).await;

        assert_eq!(directory.names(), vec!["orders", "seller"]);
        assert!(directory.get("broken").is_none());
        assert_eq!(directory.get("orders").unwrap().name, "Order Agent");
    }

    #[tokio::test]
    async fn test_build_with_nothing_configured() {
        let resolver = StaticResolver { cards: HashMap::new() };
        let directory = AgentDirectory::build(&BTreeMap::new(), &resolver).await;
        assert!(directory.is_empty());
        assert_eq!(directory.describe_all(), "");
    }

    #[test]
    fn test_describe_all() {
        let directory = AgentDirectory::from_cards([
            ("seller".to_string(), card("Seller Agent", "")),
            ("orders".to_string(), card("Order Agent", "Looks up \"orders\"")),
            ("billing".to_string(), card("", "Invoices")),
        ]);

        assert_eq!(
            directory.describe_all(),
            "{\"name\": \"billing\", \"description\": \"Invoices\"}\n\
             {\"name\": \"orders\", \"card\": \"Order Agent\", \"description\": \"Looks up \\\"orders\\\"\"}\n\
             {\"name\": \"seller\", \"card\": \"Seller Agent\", \"description\": \"No description\"}"
        );
    }
}
