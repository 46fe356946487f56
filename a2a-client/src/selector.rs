use a2a_core::{AgentCard, TransportKind};
use std::collections::BTreeSet;

/// Choose the binding to talk to `card` over.
///
/// Takes the intersection of the card's advertised bindings and the locally
/// `available` ones and returns the highest-priority member
/// (gRPC, then JSON-RPC, then HTTP+JSON), or `None` when they share nothing.
pub fn select_transport(card: &AgentCard, available: &BTreeSet<TransportKind>) -> Option<TransportKind> {
    let advertised = card.supported_bindings();
    TransportKind::ALL
        .into_iter()
        .find(|kind| advertised.contains(kind) && available.contains(kind))
}
