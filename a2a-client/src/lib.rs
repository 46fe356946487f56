//! # a2a-client
//!
//! Delegation of tasks to remote A2A agents.
//!
//! ## Overview
//!
//! - [`AgentDirectory`] - Remote agents discovered from their cards at start-up
//! - [`select_transport`] - Picks the wire binding shared with a remote agent
//! - [`TransportRegistry`] - The transports this process can speak
//! - [`Delegator`] - Sends one task and waits for the completed result
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_client::{AgentDirectory, DelegationRequest, Delegator, HttpCardResolver, RemoteAgentSetting, TransportRegistry};
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), a2a_core::DelegationError> {
//! let configured = BTreeMap::from([
//!     ("orders".to_string(), RemoteAgentSetting::new("http://localhost:9001")),
//! ]);
//! let directory = AgentDirectory::build(&configured, &HttpCardResolver::default()).await;
//!
//! let delegator = Delegator::new(
//!     Arc::new(directory),
//!     TransportRegistry::with_http_defaults(reqwest::Client::new()),
//! );
//! let answer = delegator.delegate(DelegationRequest::new("orders", "Where is order 42?")).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod dispatch;
pub mod selector;
pub mod transport;

pub use directory::{AGENT_CARD_PATH, AgentDirectory, CardResolver, HttpCardResolver, RemoteAgentSetting, agent_card_url};
pub use dispatch::{
    Correlation, CorrelationState, DEFAULT_DELEGATION_TIMEOUT, DelegationRequest, Delegator, Subscription,
};
pub use selector::select_transport;
pub use transport::{
    ClientEventStream, JsonRpcTransport, JsonRpcTransportFactory, RestTransport, RestTransportFactory,
    TaskAccumulator, Transport, TransportFactory, TransportRegistry,
};
