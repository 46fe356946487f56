//! # a2a-core
//!
//! Protocol types shared by every crate in the workspace.
//!
//! ## Overview
//!
//! - [`AgentCard`] - A remote agent's capability document
//! - [`TransportKind`] - The wire bindings a card can advertise
//! - [`Message`] / [`Task`] / [`ClientEvent`] - The task lifecycle as seen by a client
//! - [`DelegationError`] / [`TransportError`] / [`CardError`] - Error taxonomy
//!
//! Both the A2A 1.0 card layout (`supportedInterfaces`) and the legacy 0.3
//! layout (`url` + `preferredTransport` + `additionalInterfaces`) deserialize
//! into the same [`AgentCard`].
//!
//! ```rust
//! use a2a_core::{AgentCard, TransportKind};
//!
//! let card: AgentCard = serde_json::from_str(r#"{
//!     "name": "order-agent",
//!     "description": "Looks up orders",
//!     "supportedInterfaces": [
//!         { "url": "http://localhost:9001/a2a", "protocolBinding": "JSONRPC" }
//!     ]
//! }"#).unwrap();
//!
//! assert!(card.supported_bindings().contains(&TransportKind::JsonRpc));
//! ```

pub mod card;
pub mod error;
pub mod jsonrpc;
pub mod transport;
pub mod types;

pub use card::{AgentCapabilities, AgentCard, AgentCardBuilder, AgentInterface, AgentSkill};
pub use error::{CardError, DelegationError, TransportError};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MessageSendConfiguration, MessageSendParams};
pub use transport::TransportKind;
pub use types::{
    Artifact, ClientEvent, FileContent, Message, MessageBuilder, Part, Role, StreamResult, Task,
    TaskArtifactUpdateEvent, TaskState, TaskStatus, TaskStatusUpdateEvent, UpdateEvent,
};
