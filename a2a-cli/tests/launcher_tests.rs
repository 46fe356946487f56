use a2a_cli::cli::Commands;
use a2a_cli::{ConfigError, HostConfig, Launcher};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

async fn orders_agent() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/agent-card.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Order Agent",
            "description": "Looks up orders",
            "url": format!("{}/a2a", server.uri()),
            "preferredTransport": "JSONRPC"
        })))
        .mount(&server)
        .await;

    let completed = json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": {
            "kind": "task",
            "id": "t1",
            "status": { "state": "completed" },
            "artifacts": [{ "artifactId": "a1", "parts": [{ "kind": "text", "text": "Order 42 is on its way" }] }]
        }
    });
    Mock::given(method("POST"))
        .and(path("/a2a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(format!("data: {completed}\n\n"), "text/event-stream"),
        )
        .mount(&server)
        .await;
    server
}

fn host_toml(server: &MockServer) -> String {
    format!(
        r#"
[agent]
name = "host-agent"
description = "Routes customer requests."
url = "http://localhost:8080/a2a"

[delegation]
timeout_secs = 5
card_fetch_timeout_secs = 2

[remote_agents.orders]
endpoint = "{}"

[remote_agents.offline]
endpoint = "http://127.0.0.1:1"
"#,
        server.uri()
    )
}

#[test]
fn test_load_missing_file() {
    let err = HostConfig::load("/definitely/not/here/host.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_invalid_toml() {
    let file = write_config("[delegation\ntimeout_secs = 5");
    let err = HostConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }), "got {err:?}");
}

#[test]
fn test_load_rejects_zero_timeout() {
    let file = write_config("[delegation]\ntimeout_secs = 0\n");
    let err = HostConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
}

#[tokio::test]
async fn test_agents_command_lists_reachable_agents() {
    let server = orders_agent().await;
    let file = write_config(&host_toml(&server));
    let launcher = Launcher::from_config(HostConfig::load(file.path()).unwrap()).await.unwrap();

    let output = launcher.run(Commands::Agents).await.unwrap();

    assert_eq!(output, "orders\tOrder Agent\t[JSONRPC]\tLooks up orders");
}

#[tokio::test]
async fn test_send_command_delegates() {
    let server = orders_agent().await;
    let file = write_config(&host_toml(&server));
    let launcher = Launcher::from_config(HostConfig::load(file.path()).unwrap()).await.unwrap();

    let answer = launcher
        .run(Commands::Send { agent: "orders".to_string(), task: "Where is order 42?".to_string() })
        .await
        .unwrap();
    assert_eq!(answer, "Order 42 is on its way");

    let missing = launcher
        .run(Commands::Send { agent: "offline".to_string(), task: "hello?".to_string() })
        .await
        .unwrap();
    assert_eq!(missing, "Agent 'offline' not found. Available agents: orders");
}

#[tokio::test]
async fn test_skills_command_shows_local_card() {
    let launcher = Launcher::from_config(HostConfig::default()).await.unwrap();

    let output = launcher.run(Commands::Skills).await.unwrap();

    assert!(output.starts_with(
        "This agent provides the following capabilities: send_message (Sends a task to a remote agent."
    ));
    assert!(output.contains("Default input modes: text\n"));
    assert!(output.contains("\"name\": \"a2a-host\""));

    let card = launcher.agent_card();
    assert_eq!(card.skills.len(), 1);
    assert_eq!(card.skills[0].id, "send_message");
}

#[tokio::test]
async fn test_prompt_command_with_no_agents() {
    let launcher = Launcher::from_config(HostConfig::default()).await.unwrap();

    assert_eq!(launcher.run(Commands::Agents).await.unwrap(), "No remote agents available.");
    assert!(launcher.run(Commands::Prompt).await.unwrap().ends_with("Available agents:\n"));
}
