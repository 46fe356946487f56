use crate::transport::TransportKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One endpoint through which an agent accepts tasks.
///
/// 1.0 cards call the binding `protocolBinding`, 0.3 cards call it `transport`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInterface {
    pub url: String,
    #[serde(rename = "protocolBinding", alias = "transport")]
    pub protocol_binding: String,
}

impl AgentInterface {
    pub fn new(url: impl Into<String>, kind: TransportKind) -> Self {
        Self { url: url.into(), protocol_binding: kind.as_binding().to_string() }
    }

    pub fn kind(&self) -> Option<TransportKind> {
        TransportKind::from_binding(&self.protocol_binding)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, rename = "inputModes", skip_serializing_if = "Vec::is_empty")]
    pub input_modes: Vec<String>,
    #[serde(default, rename = "outputModes", skip_serializing_if = "Vec::is_empty")]
    pub output_modes: Vec<String>,
}

impl AgentSkill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            examples: Vec::new(),
            input_modes: Vec::new(),
            output_modes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: bool,
    #[serde(default, rename = "pushNotifications")]
    pub push_notifications: bool,
    #[serde(default, rename = "stateTransitionHistory")]
    pub state_transition_history: bool,
}

/// Capability document served at `/.well-known/agent-card.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "protocolVersion", skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(default, rename = "supportedInterfaces", skip_serializing_if = "Vec::is_empty")]
    pub supported_interfaces: Vec<AgentInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, rename = "preferredTransport", skip_serializing_if = "Option::is_none")]
    pub preferred_transport: Option<String>,
    #[serde(default, rename = "additionalInterfaces", skip_serializing_if = "Vec::is_empty")]
    pub additional_interfaces: Vec<AgentInterface>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default, rename = "defaultInputModes")]
    pub default_input_modes: Vec<String>,
    #[serde(default, rename = "defaultOutputModes")]
    pub default_output_modes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    pub fn builder() -> AgentCardBuilder {
        AgentCardBuilder::default()
    }

    /// Every interface the card advertises with a recognised binding, in card order.
    ///
    /// 1.0 `supportedInterfaces` come first. A 0.3 top-level `url` is its
    /// `preferredTransport` (JSON-RPC when absent), followed by
    /// `additionalInterfaces`.
    pub fn interfaces(&self) -> Vec<(TransportKind, &str)> {
        let legacy_main = self.url.as_deref().map(|url| {
            let binding = self.preferred_transport.as_deref().unwrap_or("JSONRPC");
            (binding, url)
        });

        self.supported_interfaces
            .iter()
            .map(|iface| (iface.protocol_binding.as_str(), iface.url.as_str()))
            .chain(legacy_main)
            .chain(
                self.additional_interfaces
                    .iter()
                    .map(|iface| (iface.protocol_binding.as_str(), iface.url.as_str())),
            )
            .filter_map(|(binding, url)| match TransportKind::from_binding(binding) {
                Some(kind) => Some((kind, url)),
                None => {
                    tracing::debug!(agent = %self.name, binding, "ignoring unknown protocol binding");
                    None
                }
            })
            .collect()
    }

    pub fn supported_bindings(&self) -> BTreeSet<TransportKind> {
        self.interfaces().into_iter().map(|(kind, _)| kind).collect()
    }

    /// URL of the first interface advertising `kind`.
    pub fn interface_url(&self, kind: TransportKind) -> Option<&str> {
        self.interfaces().into_iter().find(|(k, _)| *k == kind).map(|(_, url)| url)
    }
}

#[derive(Default)]
pub struct AgentCardBuilder {
    name: Option<String>,
    description: Option<String>,
    version: Option<String>,
    capabilities: Option<AgentCapabilities>,
    interfaces: Vec<AgentInterface>,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    skills: Vec<AgentSkill>,
}

impl AgentCardBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn interface(mut self, url: impl Into<String>, kind: TransportKind) -> Self {
        self.interfaces.push(AgentInterface::new(url, kind));
        self
    }

    pub fn default_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    pub fn default_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    pub fn skills(mut self, skills: Vec<AgentSkill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn build(self) -> AgentCard {
        AgentCard {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            version: self.version.unwrap_or_else(|| "1.0.0".to_string()),
            protocol_version: Some("1.0".to_string()),
            supported_interfaces: self.interfaces,
            url: None,
            preferred_transport: None,
            additional_interfaces: Vec::new(),
            capabilities: self.capabilities.unwrap_or_default(),
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            skills: self.skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v1_card_bindings() {
        let card: AgentCard = serde_json::from_value(json!({
            "name": "seller",
            "description": "Sells things",
            "supportedInterfaces": [
                {"url": "http://localhost:9000", "protocolBinding": "GRPC"},
                {"url": "http://localhost:9001/a2a", "protocolBinding": "JSONRPC"},
                {"url": "http://localhost:9001/ws", "protocolBinding": "WEBSOCKET"}
            ]
        }))
        .unwrap();

        let bindings: Vec<_> = card.supported_bindings().into_iter().collect();
        assert_eq!(bindings, vec![TransportKind::Grpc, TransportKind::JsonRpc]);
        assert_eq!(card.interface_url(TransportKind::JsonRpc), Some("http://localhost:9001/a2a"));
        assert_eq!(card.interface_url(TransportKind::HttpJson), None);
    }

    #[test]
    fn test_legacy_card_bindings() {
        let card: AgentCard = serde_json::from_value(json!({
            "name": "orders",
            "url": "http://localhost:9100/a2a",
            "additionalInterfaces": [
                {"url": "http://localhost:9100/rest", "transport": "HTTP+JSON"}
            ]
        }))
        .unwrap();

        assert_eq!(card.interface_url(TransportKind::JsonRpc), Some("http://localhost:9100/a2a"));
        assert_eq!(card.interface_url(TransportKind::HttpJson), Some("http://localhost:9100/rest"));
        assert!(card.description.is_empty());
    }

    #[test]
    fn test_builder_defaults() {
        let card = AgentCard::builder()
            .name("host")
            .interface("http://localhost:8080/a2a", TransportKind::JsonRpc)
            .build();

        assert_eq!(card.version, "1.0.0");
        assert_eq!(card.supported_bindings().len(), 1);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["supportedInterfaces"][0]["protocolBinding"], "JSONRPC");
        assert!(json.get("url").is_none());
    }
}
