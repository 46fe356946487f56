use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// A request with a fresh UUID id.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params: Some(params),
            id: Some(Value::String(uuid::Uuid::new_v4().to_string())),
        }
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A2A Protocol Methods
pub mod methods {
    pub const MESSAGE_SEND: &str = "message/send";
    pub const MESSAGE_STREAM: &str = "message/stream";
    pub const SEND_STREAMING_MESSAGE: &str = "SendStreamingMessage";

    /// Streaming method name for an agent advertising `protocol_version`.
    /// Agents on protocol 1.x and later use the PascalCase names; older or
    /// unversioned cards get the slash-style names.
    pub fn streaming_method(protocol_version: Option<&str>) -> &'static str {
        let major = protocol_version
            .and_then(|version| version.trim().split('.').next())
            .and_then(|major| major.parse::<u32>().ok());
        match major {
            Some(major) if major >= 1 => SEND_STREAMING_MESSAGE,
            _ => MESSAGE_STREAM,
        }
    }
}

/// Parameters for `message/send` and `message/stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: super::Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendConfiguration {
    #[serde(rename = "acceptedOutputModes")]
    pub accepted_output_modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,
}

impl MessageSendParams {
    /// Params accepting only text output, as the delegation engine consumes text.
    pub fn text_only(message: super::Message) -> Self {
        Self {
            message,
            configuration: Some(MessageSendConfiguration {
                accepted_output_modes: vec!["text".to_string()],
                blocking: None,
            }),
        }
    }
}
