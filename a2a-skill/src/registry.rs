use crate::action::{SkillAction, SkillCallback};
use crate::error::{SkillError, SkillResult};
use crate::model::SkillDescriptor;
use a2a_telemetry::skill_registration_span;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Tool names some model providers accept.
static PORTABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("portable name pattern is valid"));

const DESCRIPTION_PREFIX: &str = "This agent provides the following capabilities: ";
const FALLBACK_MODE: &str = "text";

#[derive(Debug)]
struct RegisteredSkill {
    descriptor: SkillDescriptor,
    action: Arc<SkillAction>,
}

/// The local agent's declared skills, in registration order.
///
/// The registry never invokes actions; it hands them out through
/// [`SkillRegistry::callback_table`].
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: Vec<RegisteredSkill>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skill. Ids and names must be non-empty and unique.
    pub fn register(&mut self, descriptor: SkillDescriptor, action: SkillAction) -> SkillResult<()> {
        let _span = skill_registration_span(&descriptor.id).entered();

        if descriptor.id.trim().is_empty() {
            return Err(SkillError::Validation("skill id must not be empty".to_string()));
        }
        if descriptor.name.trim().is_empty() {
            return Err(SkillError::Validation(format!("skill `{}` has an empty name", descriptor.id)));
        }
        if self.get(&descriptor.id).is_some() {
            return Err(SkillError::DuplicateSkill { field: "id", value: descriptor.id });
        }
        if self.skills.iter().any(|skill| skill.descriptor.name == descriptor.name) {
            return Err(SkillError::DuplicateSkill { field: "name", value: descriptor.name });
        }
        if !is_portable_name(&descriptor.name) {
            warn!(
                skill.name = %descriptor.name,
                "Skill name has characters outside [a-zA-Z0-9_.-]; some model providers will reject it"
            );
        }

        debug!(skill.name = %descriptor.name, "Registered skill");
        self.skills.push(RegisteredSkill { descriptor, action: Arc::new(action) });
        Ok(())
    }

    pub fn list(&self) -> Vec<&SkillDescriptor> {
        self.skills.iter().map(|skill| &skill.descriptor).collect()
    }

    pub fn get(&self, id: &str) -> Option<&SkillDescriptor> {
        self.skills.iter().map(|skill| &skill.descriptor).find(|descriptor| descriptor.id == id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// One-line capability summary for prompts and the agent card.
    /// Empty when nothing is registered.
    pub fn describe(&self) -> String {
        if self.skills.is_empty() {
            return String::new();
        }
        let entries: Vec<String> = self
            .skills
            .iter()
            .map(|skill| {
                let d = &skill.descriptor;
                format!("{} ({}) [id: {}]", d.name, d.description, d.id)
            })
            .collect();
        format!("{}{}", DESCRIPTION_PREFIX, entries.join("; "))
    }

    /// Actions keyed by skill name, each with its description and
    /// argument schema.
    pub fn callback_table(&self) -> BTreeMap<String, SkillCallback> {
        self.skills
            .iter()
            .map(|skill| {
                let d = &skill.descriptor;
                let callback = SkillCallback {
                    name: d.name.clone(),
                    description: d.description.clone(),
                    input_schema: d.input_schema.clone(),
                    action: Arc::clone(&skill.action),
                };
                (d.name.clone(), callback)
            })
            .collect()
    }

    pub fn default_input_modes(&self) -> Vec<String> {
        union_modes(self.skills.iter().flat_map(|skill| &skill.descriptor.input_modes))
    }

    pub fn default_output_modes(&self) -> Vec<String> {
        union_modes(self.skills.iter().flat_map(|skill| &skill.descriptor.output_modes))
    }
}

fn is_portable_name(name: &str) -> bool {
    PORTABLE_NAME.is_match(name)
}

/// Trimmed, lower-cased, first occurrence wins; `["text"]` when empty.
fn union_modes<'a>(modes: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut union: Vec<String> = Vec::new();
    for mode in modes {
        let mode = mode.trim().to_lowercase();
        if !mode.is_empty() && !union.contains(&mode) {
            union.push(mode);
        }
    }
    if union.is_empty() {
        union.push(FALLBACK_MODE.to_string());
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn noop() -> SkillAction {
        SkillAction::new(|args: Value| async move { Ok(args) })
    }

    #[test]
    fn test_union_modes() {
        let modes = [" Text ".to_string(), "image/png".to_string(), "TEXT".to_string(), "".to_string()];
        assert_eq!(union_modes(modes.iter()), vec!["text", "image/png"]);
        assert_eq!(union_modes(std::iter::empty()), vec!["text"]);
    }

    #[test]
    fn test_portable_names() {
        assert!(is_portable_name("order_lookup.v2-beta"));
        assert!(!is_portable_name("order lookup"));
        assert!(!is_portable_name("lookup/orders"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = SkillRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.describe(), "");
        assert!(registry.callback_table().is_empty());
        assert_eq!(registry.default_input_modes(), vec!["text"]);
        assert_eq!(registry.default_output_modes(), vec!["text"]);
    }

    #[test]
    fn test_validation() {
        let mut registry = SkillRegistry::new();
        assert!(matches!(
            registry.register(SkillDescriptor::new("", "lookup", ""), noop()),
            Err(SkillError::Validation(_))
        ));
        assert!(matches!(
            registry.register(SkillDescriptor::new("lookup", "  ", ""), noop()),
            Err(SkillError::Validation(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_non_portable_name_is_accepted() {
        let mut registry = SkillRegistry::new();
        registry.register(SkillDescriptor::new("lookup", "Order lookup", ""), noop()).unwrap();
        assert!(registry.callback_table().contains_key("Order lookup"));
    }
}
