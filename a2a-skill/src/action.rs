use crate::error::SkillResult;
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type AsyncHandler = Box<dyn Fn(Value) -> Pin<Box<dyn Future<Output = SkillResult<Value>> + Send>> + Send + Sync>;

/// A locally implemented capability, invoked with JSON arguments.
pub struct SkillAction {
    handler: AsyncHandler,
}

impl SkillAction {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SkillResult<Value>> + Send + 'static,
    {
        Self { handler: Box::new(move |args| Box::pin(handler(args))) }
    }

    pub async fn call(&self, args: Value) -> SkillResult<Value> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for SkillAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillAction").finish_non_exhaustive()
    }
}

/// A callback table entry: the action plus what an invoker needs to call it.
#[derive(Debug, Clone)]
pub struct SkillCallback {
    pub name: String,
    pub description: String,
    pub input_schema: Option<Value>,
    pub action: Arc<SkillAction>,
}

impl SkillCallback {
    pub async fn call(&self, args: Value) -> SkillResult<Value> {
        self.action.call(args).await
    }

    /// Function declaration for a model: `name`, `description` and, when
    /// known, `parameters`.
    pub fn declaration(&self) -> Value {
        let mut decl = json!({
            "name": self.name,
            "description": self.description,
        });
        if let Some(schema) = &self.input_schema {
            decl["parameters"] = schema.clone();
        }
        decl
    }
}
