//! # a2a-skill
//!
//! Capabilities the local agent exposes to other agents.
//!
//! Skills are registered explicitly with a [`SkillDescriptor`] and an async
//! [`SkillAction`]. The [`SkillRegistry`] derives the capability summary, the
//! default input/output modes, and the callback table an external invoker
//! dispatches through; [`build_agent_card`] turns all of it into the local
//! agent card.
//!
//! ```rust
//! use a2a_skill::{SkillAction, SkillDescriptor, SkillRegistry};
//! use serde_json::json;
//!
//! let mut registry = SkillRegistry::new();
//! registry
//!     .register(
//!         SkillDescriptor::new("weather", "get_weather", "Current weather for a city"),
//!         SkillAction::new(|args| async move { Ok(json!({ "city": args["city"], "temp_c": 21 })) }),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     registry.describe(),
//!     "This agent provides the following capabilities: get_weather (Current weather for a city) [id: weather]"
//! );
//! ```

mod action;
mod card;
mod error;
mod model;
mod registry;

pub use action::{SkillAction, SkillCallback};
pub use card::{LocalAgentConfig, build_agent_card};
pub use error::{SkillError, SkillResult};
pub use model::SkillDescriptor;
pub use registry::SkillRegistry;
