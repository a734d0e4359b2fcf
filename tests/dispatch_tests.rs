//! Action dispatcher tests against a mocked CLI

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use orgdeck::config::Settings;
use orgdeck::dispatch::{Action, Outcome, dispatch};
use orgdeck::error::PanelError;
use orgdeck::org::OrgRecord;
use orgdeck::session::Session;
use orgdeck::system::{CommandOutput, MockSystem};
use orgdeck::wizard::{Answer, NoPrompter, OrgKind, Prompter, ScriptedPrompter};
use serde_json::json;
use std::path::PathBuf;

const LIST: &str = "sf org list --json";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn settings() -> Settings {
    Settings {
        state_file: Some(PathBuf::from("/home/dev/.local/share/orgdeck/state.json")),
        skip_preflight: true,
        ..Settings::default()
    }
}

fn list_output(orgs: serde_json::Value) -> CommandOutput {
    CommandOutput::ok(json!({"status": 0, "result": orgs}).to_string())
}

fn two_orgs() -> serde_json::Value {
    json!({
        "nonScratchOrgs": [
            {
                "alias": "prod",
                "username": "admin@acme.com",
                "orgId": "00D000000000001",
                "instanceUrl": "https://acme.my.salesforce.com",
                "connectedStatus": "Connected"
            },
            {
                "alias": "uat",
                "username": "admin@acme.com.uat",
                "orgId": "00D000000000002",
                "instanceUrl": "https://acme--uat.sandbox.my.salesforce.com",
                "connectedStatus": "Connected",
                "isSandbox": true
            }
        ],
        "scratchOrgs": []
    })
}

fn mock() -> MockSystem {
    MockSystem::new()
        .with_now(now())
        .unwrap()
        .with_response(LIST, list_output(two_orgs()))
        .unwrap()
}

fn session<'sys>(system: &'sys MockSystem, prompter: impl Prompter + 'sys) -> Session<'sys> {
    let mut session = Session::new(system, settings(), Box::new(prompter)).unwrap();
    session.orgs(false).unwrap();
    session
}

fn ids(session: &Session<'_>) -> Vec<String> {
    session
        .store()
        .org_list()
        .unwrap_or_default()
        .iter()
        .map(|org| org.identifier().to_owned())
        .collect()
}

fn panel_error(err: &anyhow::Error) -> &PanelError {
    err.downcast_ref::<PanelError>().unwrap()
}

#[test]
fn refresh_refetches() {
    let system = mock();
    let mut session = session(&system, NoPrompter);

    assert_eq!(dispatch(&mut session, Action::Refresh).unwrap(), Outcome::Render);
    assert_eq!(system.invocation_count(LIST), 2);
}

#[test]
fn open_stamps_last_opened() {
    let system = mock()
        .with_response("sf org open --target-org uat", CommandOutput::ok(""))
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(&mut session, Action::Open { id: "uat".to_owned() }).unwrap();

    assert_eq!(outcome, Outcome::Render);
    assert_eq!(
        session.store().last_opened().get("uat").map(String::as_str),
        Some("2024-06-15T12:00:00.000Z")
    );
}

#[test]
fn failed_open_does_not_stamp() {
    let system = mock()
        .with_response(
            "sf org open --target-org uat",
            CommandOutput::failed(1, "Error (1): No authorization information found for uat."),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let err = dispatch(&mut session, Action::Open { id: "uat".to_owned() }).unwrap_err();

    assert!(err.to_string().contains("No authorization information"));
    assert!(session.store().last_opened().is_empty());
}

#[test]
fn logout_removes_from_both_maps() {
    let system = mock()
        .with_response("sf org open --target-org uat", CommandOutput::ok(""))
        .unwrap()
        .with_response(
            "sf org logout --target-org uat --no-prompt",
            CommandOutput::ok(""),
        )
        .unwrap();
    let prompter = ScriptedPrompter::new([Answer::Confirm(true)]);
    let mut session = session(&system, &prompter);
    dispatch(&mut session, Action::Open { id: "uat".to_owned() }).unwrap();

    let outcome = dispatch(
        &mut session,
        Action::Logout {
            id: "uat".to_owned(),
            confirmed: false,
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::RemoveRow { id: "uat".to_owned() });
    assert_eq!(ids(&session), ["prod"]);
    assert!(!session.store().last_opened().contains_key("uat"));
    assert_eq!(prompter.asked().len(), 1);
}

#[test]
fn logout_of_org_missing_from_cache_still_calls_cli() {
    let system = mock()
        .with_response(
            "sf org logout --target-org fresh --no-prompt",
            CommandOutput::ok(""),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(
        &mut session,
        Action::Logout {
            id: "fresh".to_owned(),
            confirmed: true,
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::RemoveRow { id: "fresh".to_owned() });
    assert_eq!(
        system.invocation_count("sf org logout --target-org fresh --no-prompt"),
        1
    );
    assert_eq!(ids(&session), ["prod", "uat"]);
}

#[test]
fn repeated_logout_is_noop_locally() {
    let system = mock()
        .with_response(
            "sf org logout --target-org uat --no-prompt",
            CommandOutput::ok(""),
        )
        .unwrap()
        .with_response(
            "sf org logout --target-org uat --no-prompt",
            CommandOutput::failed(
                1,
                "Error (NamedOrgNotFoundError): No authorization information found for uat.",
            ),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);
    let logout = Action::Logout {
        id: "uat".to_owned(),
        confirmed: true,
    };

    dispatch(&mut session, logout.clone()).unwrap();
    let again = dispatch(&mut session, logout).unwrap();

    assert_eq!(again, Outcome::RemoveRow { id: "uat".to_owned() });
    assert_eq!(
        system.invocation_count("sf org logout --target-org uat --no-prompt"),
        2
    );
    assert_eq!(ids(&session), ["prod"]);
    assert!(session.store().last_opened().is_empty());
}

#[test]
fn declined_logout_changes_nothing() {
    let system = mock();
    let prompter = ScriptedPrompter::new([Answer::Confirm(false)]);
    let mut session = session(&system, &prompter);

    let outcome = dispatch(
        &mut session,
        Action::Logout {
            id: "prod".to_owned(),
            confirmed: false,
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Nothing);
    assert_eq!(ids(&session), ["prod", "uat"]);
    assert!(
        !system
            .invocations()
            .iter()
            .any(|c| c.contains("logout"))
    );
}

#[test]
fn failed_remote_logout_keeps_local_state() {
    let system = mock()
        .with_response(
            "sf org logout --target-org prod --no-prompt",
            CommandOutput::failed(1, "Unable to remove auth file"),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let err = dispatch(
        &mut session,
        Action::Logout {
            id: "prod".to_owned(),
            confirmed: true,
        },
    )
    .unwrap_err();

    assert!(matches!(panel_error(&err), PanelError::Subprocess { .. }));
    assert_eq!(ids(&session), ["prod", "uat"]);
}

#[test]
fn unconfirmed_logout_without_prompter_is_cancelled() {
    let system = mock();
    let mut session = session(&system, NoPrompter);

    let err = dispatch(
        &mut session,
        Action::Logout {
            id: "prod".to_owned(),
            confirmed: false,
        },
    )
    .unwrap_err();

    assert!(matches!(panel_error(&err), PanelError::Cancelled { .. }));
    assert_eq!(ids(&session), ["prod", "uat"]);
}

#[test]
fn auth_url_is_copied_and_shown() {
    let url = "force://PlatformCLI::5Aep861abc@acme.my.salesforce.com";
    let system = mock()
        .with_response(
            "sf org display --target-org prod --verbose --json",
            CommandOutput::ok(json!({"status": 0, "result": {"sfdxAuthUrl": url}}).to_string()),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(&mut session, Action::GetAuthUrl { id: "prod".to_owned() }).unwrap();

    let Outcome::Notice { message } = outcome else {
        panic!("expected a notice");
    };
    assert!(message.contains("copied to clipboard"));
    assert!(message.contains(url));
    assert_eq!(system.clipboard().as_deref(), Some(url));
}

#[test]
fn auth_url_without_clipboard_is_still_shown() {
    let url = "force://PlatformCLI::token@acme.my.salesforce.com";
    let system = mock()
        .without_clipboard()
        .unwrap()
        .with_response(
            "sf org display --target-org prod --verbose --json",
            CommandOutput::ok(json!({"status": 0, "result": {"sfdxAuthUrl": url}}).to_string()),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(&mut session, Action::GetAuthUrl { id: "prod".to_owned() }).unwrap();

    let Outcome::Notice { message } = outcome else {
        panic!("expected a notice");
    };
    assert!(!message.contains("clipboard"));
    assert!(message.contains(url));
}

#[test]
fn auth_url_absent_is_missing_field() {
    let system = mock()
        .with_response(
            "sf org display --target-org prod --verbose --json",
            CommandOutput::ok(json!({"status": 0, "result": {"username": "admin@acme.com"}}).to_string()),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let err = dispatch(&mut session, Action::GetAuthUrl { id: "prod".to_owned() }).unwrap_err();

    assert!(matches!(panel_error(&err), PanelError::MissingField { .. }));
    assert!(system.clipboard().is_none());
}

#[test]
fn set_default_org_only_notifies() {
    let system = mock()
        .with_response("sf config set target-org=prod", CommandOutput::ok(""))
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(&mut session, Action::SetDefaultOrg { id: "prod".to_owned() }).unwrap();

    assert!(matches!(outcome, Outcome::Notice { .. }));
    assert_eq!(ids(&session), ["prod", "uat"]);
    assert!(session.store().last_opened().is_empty());
}

#[test]
fn reauthenticate_without_url_runs_nothing() {
    let orgs = json!([{"alias": "bare", "username": "bare@acme.com", "connectedStatus": "Expired"}]);
    let system = MockSystem::new()
        .with_response(LIST, list_output(orgs))
        .unwrap();
    let mut session = session(&system, NoPrompter);
    let before = system.invocations().len();

    let err = dispatch(&mut session, Action::Reauthenticate { id: "bare".to_owned() }).unwrap_err();

    assert!(matches!(panel_error(&err), PanelError::MissingField { .. }));
    assert_eq!(system.invocations().len(), before);
}

#[test]
fn reauthenticate_logs_in_and_refreshes() {
    let system = mock()
        .with_response(
            "sf org login web --alias uat --instance-url https://acme--uat.sandbox.my.salesforce.com",
            CommandOutput::ok(""),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(&mut session, Action::Reauthenticate { id: "uat".to_owned() }).unwrap();

    assert_eq!(outcome, Outcome::Render);
    assert_eq!(system.invocation_count(LIST), 2);
}

#[test]
fn add_org_upserts_at_head() {
    let system = mock()
        .with_response(
            "sf org login web --alias uat --instance-url https://test.salesforce.com",
            CommandOutput::ok(""),
        )
        .unwrap()
        .with_response(
            "sf org display --target-org uat --json",
            CommandOutput::ok(
                json!({
                    "status": 0,
                    "result": {
                        "id": "00D000000000009",
                        "username": "new-admin@acme.com.uat",
                        "alias": "uat",
                        "instanceUrl": "https://acme--uat.sandbox.my.salesforce.com",
                        "connectedStatus": "Unknown"
                    }
                })
                .to_string(),
            ),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let outcome = dispatch(
        &mut session,
        Action::AddOrg {
            kind: Some(OrgKind::Standard),
            instance: Some("sandbox".to_owned()),
            alias: Some("uat".to_owned()),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Render);
    assert_eq!(ids(&session), ["uat", "prod"]);

    let added: &OrgRecord = session.store().find_org("uat").unwrap();
    assert_eq!(added.username, "new-admin@acme.com.uat");
    assert_eq!(added.org_id.as_deref(), Some("00D000000000009"));
    assert!(added.is_connected());
    assert!(added.is_sandbox);
    assert!(session.store().last_opened().contains_key("uat"));
}

#[test]
fn add_org_runs_wizard_and_falls_back_to_refresh() {
    let system = mock()
        .with_response(
            "sf org login web --alias hub --instance-url https://login.salesforce.com --set-default-dev-hub",
            CommandOutput::ok(""),
        )
        .unwrap()
        .with_response(
            "sf org display --target-org hub --json",
            CommandOutput::failed(1, "timed out"),
        )
        .unwrap();
    let prompter = ScriptedPrompter::new([
        Answer::Select(1),
        Answer::Select(0),
        Answer::Input("hub".to_owned()),
    ]);
    let mut session = session(&system, &prompter);

    let outcome = dispatch(
        &mut session,
        Action::AddOrg {
            kind: None,
            instance: None,
            alias: None,
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Render);
    assert_eq!(prompter.asked().len(), 3);
    assert_eq!(system.invocation_count(LIST), 2);
    assert!(session.store().last_opened().contains_key("hub"));
}

#[test]
fn failed_login_adds_nothing() {
    let system = mock()
        .with_response(
            "sf org login web --alias x --instance-url https://login.salesforce.com",
            CommandOutput::failed(1, "user closed the browser"),
        )
        .unwrap();
    let mut session = session(&system, NoPrompter);

    let result = dispatch(
        &mut session,
        Action::AddOrg {
            kind: Some(OrgKind::Standard),
            instance: Some("production".to_owned()),
            alias: Some("x".to_owned()),
        },
    );

    assert!(result.is_err());
    assert_eq!(ids(&session), ["prod", "uat"]);
    assert!(session.store().last_opened().is_empty());
}

#[test]
fn show_returns_cached_record() {
    let system = mock();
    let mut session = session(&system, NoPrompter);

    let Outcome::Detail { org } = dispatch(&mut session, Action::Show { id: "prod".to_owned() }).unwrap()
    else {
        panic!("expected detail");
    };
    assert_eq!(org.org_id.as_deref(), Some("00D000000000001"));

    let err = dispatch(&mut session, Action::Show { id: "ghost".to_owned() }).unwrap_err();
    assert!(matches!(panel_error(&err), PanelError::UnknownOrg { .. }));
}

#[test]
fn last_opened_survives_refresh() {
    let system = mock()
        .with_response("sf org open --target-org prod", CommandOutput::ok(""))
        .unwrap();
    let mut session = session(&system, NoPrompter);

    dispatch(&mut session, Action::Open { id: "prod".to_owned() }).unwrap();
    system.set_now(now() + Duration::minutes(5)).unwrap();
    dispatch(&mut session, Action::Refresh).unwrap();

    assert!(session.store().last_opened().contains_key("prod"));
}
