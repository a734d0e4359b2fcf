//! JSON-lines host protocol tests

use orgdeck::config::Settings;
use orgdeck::serve::serve;
use orgdeck::session::Session;
use orgdeck::system::{Attach, CommandOutput, MockSystem};
use orgdeck::wizard::NoPrompter;
use serde_json::{Value, json};
use std::io::Cursor;
use std::path::PathBuf;

const LIST: &str = "sf org list --json";

fn settings() -> Settings {
    Settings {
        state_file: Some(PathBuf::from("/state/orgdeck.json")),
        skip_preflight: true,
        ..Settings::default()
    }
}

fn orgs() -> CommandOutput {
    CommandOutput::ok(
        json!({
            "status": 0,
            "result": [
                {"alias": "dev", "username": "dev@acme.com", "connectedStatus": "Connected"},
                {"alias": "old", "username": "old@acme.com", "connectedStatus": "RefreshTokenAuthError"}
            ]
        })
        .to_string(),
    )
}

fn run(system: &MockSystem, input: &str) -> Vec<Value> {
    let mut session = Session::new(system, settings(), Box::new(NoPrompter)).unwrap();
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();

    serve(&mut session, &mut reader, &mut output).unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn kinds(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|frame| frame["kind"].as_str().unwrap())
        .collect()
}

#[test]
fn initial_load_renders_connected_rows() {
    let system = MockSystem::new().with_response(LIST, orgs()).unwrap();

    let frames = run(&system, "");

    assert_eq!(kinds(&frames), ["progress", "render"]);
    assert_eq!(frames[0]["view"]["inProgress"], json!(true));

    let view = &frames[1]["view"];
    assert_eq!(view["inProgress"], json!(false));
    assert_eq!(view["total"], json!(2));
    assert_eq!(view["rows"].as_array().unwrap().len(), 1);
    assert_eq!(view["rows"][0]["id"], json!("dev"));
    assert_eq!(view["rows"][0]["lastUsed"], json!("Never"));
}

#[test]
fn each_action_gets_progress_then_outcome() {
    let system = MockSystem::new()
        .with_response(LIST, orgs())
        .unwrap()
        .with_response(
            "sf org logout --target-org dev --no-prompt",
            CommandOutput::ok(""),
        )
        .unwrap();

    let input = concat!(
        r#"{"command":"logout","id":"dev","confirmed":true}"#,
        "\n",
        "\n",
        r#"{"command":"setView","options":{"hideDisconnected":false}}"#,
        "\n",
    );
    let frames = run(&system, input);

    assert_eq!(
        kinds(&frames),
        ["progress", "render", "progress", "removeRow", "progress", "render"]
    );
    assert_eq!(frames[3]["id"], json!("dev"));
    assert_eq!(frames[3]["view"]["total"], json!(1));

    let rows = frames[5]["view"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!("old"));
    assert_eq!(rows[0]["actions"], json!(["reauth", "logout"]));
}

#[test]
fn bad_input_reports_and_continues() {
    let system = MockSystem::new()
        .with_response(LIST, orgs())
        .unwrap()
        .with_response("sf org open --target-org dev", CommandOutput::ok(""))
        .unwrap();

    let input = "not json\n{\"command\":\"open\",\"id\":\"dev\"}\n";
    let frames = run(&system, input);

    assert_eq!(
        kinds(&frames),
        ["progress", "render", "error", "progress", "render"]
    );
    assert!(
        frames[2]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid action")
    );
    assert_eq!(frames[4]["view"]["error"], Value::Null);
    assert_ne!(frames[4]["view"]["rows"][0]["lastUsed"], json!("Never"));
}

#[test]
fn unconfirmed_logout_is_an_error_frame() {
    let system = MockSystem::new().with_response(LIST, orgs()).unwrap();

    let frames = run(&system, "{\"command\":\"logout\",\"id\":\"dev\"}\n");

    assert_eq!(kinds(&frames), ["progress", "render", "progress", "error"]);
    assert!(
        frames[3]["message"]
            .as_str()
            .unwrap()
            .contains("confirmation required")
    );
    assert_eq!(frames[3]["view"]["total"], json!(2));
    assert_eq!(
        system.invocation_count("sf org logout --target-org dev --no-prompt"),
        0
    );
}

#[test]
fn failed_initial_load_is_an_error_frame() {
    let system = MockSystem::new()
        .with_response(
            LIST,
            CommandOutput::failed(1, "sf: command not found"),
        )
        .unwrap();

    let frames = run(&system, "");

    assert_eq!(kinds(&frames), ["progress", "error"]);
    assert!(
        frames[1]["message"]
            .as_str()
            .unwrap()
            .contains("Could not load orgs")
    );
    assert_eq!(frames[1]["view"]["total"], json!(0));
}

#[test]
fn logins_run_detached_from_protocol_streams() {
    let login = "sf org login web --alias dev --instance-url https://acme--dev.sandbox.my.salesforce.com";
    let system = MockSystem::new()
        .with_response(
            LIST,
            CommandOutput::ok(
                json!({
                    "status": 0,
                    "result": [{
                        "alias": "dev",
                        "username": "dev@acme.com",
                        "instanceUrl": "https://acme--dev.sandbox.my.salesforce.com",
                        "connectedStatus": "Connected"
                    }]
                })
                .to_string(),
            ),
        )
        .unwrap()
        .with_response(login, CommandOutput::ok("Successfully authorized dev@acme.com"))
        .unwrap();

    let frames = run(&system, "{\"command\":\"reauthenticate\",\"id\":\"dev\"}\n");

    assert_eq!(kinds(&frames), ["progress", "render", "progress", "render"]);
    assert_eq!(
        system.interactive_runs(),
        [(login.to_owned(), Attach::Stderr)]
    );
}
