use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire binding advertised by an agent card.
///
/// The declaration order is the selection priority: lower-latency bindings
/// first. `Ord` follows it, so the first element of a `BTreeSet<TransportKind>`
/// is always the preferred binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TransportKind {
    Grpc,
    JsonRpc,
    HttpJson,
}

impl TransportKind {
    pub const ALL: [TransportKind; 3] =
        [TransportKind::Grpc, TransportKind::JsonRpc, TransportKind::HttpJson];

    /// Parse a `protocolBinding` (1.0) or `transport` (0.3) string.
    pub fn from_binding(binding: &str) -> Option<Self> {
        match binding.trim().to_ascii_uppercase().as_str() {
            "GRPC" => Some(TransportKind::Grpc),
            "JSONRPC" | "JSON-RPC" | "JSON_RPC" => Some(TransportKind::JsonRpc),
            "HTTP+JSON" | "HTTP_JSON" | "REST" => Some(TransportKind::HttpJson),
            _ => None,
        }
    }

    pub fn as_binding(&self) -> &'static str {
        match self {
            TransportKind::Grpc => "GRPC",
            TransportKind::JsonRpc => "JSONRPC",
            TransportKind::HttpJson => "HTTP+JSON",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_binding())
    }
}

impl TryFrom<String> for TransportKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TransportKind::from_binding(&value)
            .ok_or_else(|| format!("unknown transport binding '{}'", value))
    }
}

impl From<TransportKind> for &'static str {
    fn from(kind: TransportKind) -> Self {
        kind.as_binding()
    }
}
