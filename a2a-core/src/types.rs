use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user", alias = "ROLE_USER")]
    User,
    #[serde(rename = "agent", alias = "ROLE_AGENT")]
    Agent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A content fragment of a message or artifact.
///
/// Deserialization accepts parts with or without the `kind` discriminator;
/// serialization always writes it, since some servers dispatch on it.
/// Shapes that match none of the known variants, such as the flat
/// `{"url": ..., "mediaType": ...}` file parts of newer protocol versions,
/// are kept verbatim as [`Part::Other`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        #[serde(default)]
        metadata: Option<Map<String, Value>>,
    },
    File {
        file: FileContent,
        #[serde(default)]
        metadata: Option<Map<String, Value>>,
    },
    Data {
        data: Value,
        #[serde(default)]
        metadata: Option<Map<String, Value>>,
    },
    Other(Map<String, Value>),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into(), metadata: None }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let metadata = match self {
            Part::Text { text, metadata } => {
                map.serialize_entry("kind", "text")?;
                map.serialize_entry("text", text)?;
                metadata
            }
            Part::File { file, metadata } => {
                map.serialize_entry("kind", "file")?;
                map.serialize_entry("file", file)?;
                metadata
            }
            Part::Data { data, metadata } => {
                map.serialize_entry("kind", "data")?;
                map.serialize_entry("data", data)?;
                metadata
            }
            Part::Other(fields) => {
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                &None
            }
        };
        if let Some(metadata) = metadata {
            map.serialize_entry("metadata", metadata)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(rename = "messageId", default)]
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "taskId")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contextId")]
    pub context_id: Option<String>,
}

impl Message {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// A user message with a single text part and a fresh message id.
    pub fn user_text(text: impl Into<String>) -> Self {
        Message::builder()
            .role(Role::User)
            .parts(vec![Part::text(text)])
            .message_id(uuid::Uuid::new_v4().to_string())
            .build()
    }

    /// Concatenated text of all text parts, in order.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

#[derive(Default)]
pub struct MessageBuilder {
    role: Option<Role>,
    parts: Vec<Part>,
    metadata: Option<Map<String, Value>>,
    message_id: Option<String>,
    task_id: Option<String>,
    context_id: Option<String>,
}

impl MessageBuilder {
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }

    pub fn metadata(mut self, metadata: Option<Map<String, Value>>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    pub fn build(self) -> Message {
        Message {
            role: self.role.unwrap_or(Role::User),
            parts: self.parts,
            metadata: self.metadata,
            message_id: self.message_id.unwrap_or_default(),
            task_id: self.task_id,
            context_id: self.context_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    #[serde(rename = "artifactId", default)]
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Artifact {
    pub fn text(artifact_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            name: None,
            description: None,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }
}

/// Lifecycle state of a remote task. Accepts both the 0.3 (`input-required`)
/// and 1.0 (`TASK_STATE_INPUT_REQUIRED`) spellings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskState {
    #[serde(rename = "submitted", alias = "TASK_STATE_SUBMITTED")]
    Submitted,
    #[serde(rename = "working", alias = "TASK_STATE_WORKING")]
    Working,
    #[serde(rename = "input-required", alias = "TASK_STATE_INPUT_REQUIRED")]
    InputRequired,
    #[serde(rename = "completed", alias = "TASK_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "failed", alias = "TASK_STATE_FAILED")]
    Failed,
    #[serde(
        rename = "canceled",
        alias = "cancelled",
        alias = "TASK_STATE_CANCELED",
        alias = "TASK_STATE_CANCELLED"
    )]
    Canceled,
    #[serde(rename = "rejected", alias = "TASK_STATE_REJECTED")]
    Rejected,
    #[serde(rename = "auth-required", alias = "TASK_STATE_AUTH_REQUIRED")]
    AuthRequired,
    #[serde(rename = "unknown", alias = "TASK_STATE_UNSPECIFIED")]
    Unknown,
}

impl TaskState {
    /// States after which the remote agent will not produce more output.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Rejected => "rejected",
            TaskState::AuthRequired => "auth-required",
            TaskState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self { state, message: None, timestamp: None }
    }
}

/// Snapshot of a remote task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contextId")]
    pub context_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Message>>,
}

impl Task {
    pub fn new(id: impl Into<String>, state: TaskState) -> Self {
        Self {
            id: id.into(),
            context_id: None,
            status: TaskStatus::new(state),
            artifacts: None,
            history: None,
        }
    }

    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Text of every artifact: parts concatenated in order within an
    /// artifact, artifacts concatenated in order. Non-text parts are skipped.
    pub fn artifact_text(&self) -> String {
        self.artifacts
            .iter()
            .flatten()
            .flat_map(|artifact| artifact.parts.iter())
            .filter_map(Part::as_text)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusUpdateEvent {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contextId")]
    pub context_id: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "final", default)]
    pub final_update: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskArtifactUpdateEvent {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contextId")]
    pub context_id: Option<String>,
    pub artifact: Artifact,
    #[serde(default)]
    pub append: bool,
    #[serde(rename = "lastChunk", default)]
    pub last_chunk: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    TaskStatusUpdate(TaskStatusUpdateEvent),
    TaskArtifactUpdate(TaskArtifactUpdateEvent),
}

/// One item of a streaming response, before it is folded into a task snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamResult {
    Task(Task),
    Message(Message),
    Update(UpdateEvent),
}

impl StreamResult {
    /// Classify a result object.
    ///
    /// Tries the 0.3 `kind` discriminator first, then the 1.0 wrapper keys
    /// (`task`, `message`, `statusUpdate`, `artifactUpdate`), then the shape
    /// of the object. Returns `Ok(None)` for objects that match nothing.
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        let kind = value.get("kind").and_then(Value::as_str).map(str::to_string);
        match kind.as_deref() {
            Some("task") => return serde_json::from_value(value).map(|t| Some(Self::Task(t))),
            Some("message") => {
                return serde_json::from_value(value).map(|m| Some(Self::Message(m)));
            }
            Some("status-update") => {
                return serde_json::from_value(value)
                    .map(|e| Some(Self::Update(UpdateEvent::TaskStatusUpdate(e))));
            }
            Some("artifact-update") => {
                return serde_json::from_value(value)
                    .map(|e| Some(Self::Update(UpdateEvent::TaskArtifactUpdate(e))));
            }
            _ => {}
        }

        if let Value::Object(mut object) = value {
            if object.len() == 1 {
                if let Some(inner) = object.remove("task") {
                    return serde_json::from_value(inner).map(|t| Some(Self::Task(t)));
                }
                if let Some(inner) = object.remove("message").or_else(|| object.remove("msg")) {
                    return serde_json::from_value(inner).map(|m| Some(Self::Message(m)));
                }
                if let Some(inner) = object.remove("statusUpdate") {
                    return serde_json::from_value(inner)
                        .map(|e| Some(Self::Update(UpdateEvent::TaskStatusUpdate(e))));
                }
                if let Some(inner) = object.remove("artifactUpdate") {
                    return serde_json::from_value(inner)
                        .map(|e| Some(Self::Update(UpdateEvent::TaskArtifactUpdate(e))));
                }
            }

            let has = |key: &str| object.contains_key(key);
            let value = Value::Object(object.clone());
            if has("taskId") && has("artifact") {
                return serde_json::from_value(value)
                    .map(|e| Some(Self::Update(UpdateEvent::TaskArtifactUpdate(e))));
            }
            if has("taskId") && has("status") {
                return serde_json::from_value(value)
                    .map(|e| Some(Self::Update(UpdateEvent::TaskStatusUpdate(e))));
            }
            if has("id") && has("status") {
                return serde_json::from_value(value).map(|t| Some(Self::Task(t)));
            }
            if has("role") && has("parts") {
                return serde_json::from_value(value).map(|m| Some(Self::Message(m)));
            }
        }

        Ok(None)
    }
}

/// Event delivered to the delegation engine.
///
/// `Task` is a task returned whole by the remote agent, `TaskUpdate` is the
/// accumulated snapshot after a status or artifact update, and `Other` is a
/// plain agent message that does not belong to a task.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Task(Task),
    TaskUpdate(Task),
    Other(Message),
}

impl ClientEvent {
    pub fn task(&self) -> Option<&Task> {
        match self {
            ClientEvent::Task(task) | ClientEvent::TaskUpdate(task) => Some(task),
            ClientEvent::Other(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Task(_) => "task",
            ClientEvent::TaskUpdate(_) => "task-update",
            ClientEvent::Other(_) => "other",
        }
    }
}
