//! Action dispatcher
//!
//! Each action performs at most one external operation, then updates the
//! session's state and tells the view what changed.

pub mod action;

pub use action::{Action, Outcome};

use crate::error::PanelError;
use crate::org::{CONNECTED, InstanceKind, OrgRecord, classify_instance};
use crate::session::Session;
use crate::wizard::{AddOrgDefaults, InstanceChoice, OrgKind, run_add_org_wizard};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Handle one action against a session
///
/// # Errors
///
/// Returns the action's subprocess, parse, missing-field or state error.
/// The session stays usable afterwards and cached data is only changed
/// where the action succeeded.
pub fn dispatch(session: &mut Session<'_>, action: Action) -> Result<Outcome> {
    debug!("Dispatching {:?}", action);
    match action {
        Action::Refresh => {
            session.orgs(true)?;
            Ok(Outcome::Render)
        }
        Action::Open { id } => open_org(session, &id),
        Action::Logout { id, confirmed } => logout(session, &id, confirmed),
        Action::GetAuthUrl { id } => auth_url(session, &id),
        Action::SetDefaultOrg { id } => {
            session.cli().set_default_org(&id)?;
            Ok(Outcome::Notice {
                message: format!("{id} is now the default org"),
            })
        }
        Action::Reauthenticate { id } => reauthenticate(session, &id),
        Action::AddOrg {
            kind,
            instance,
            alias,
        } => add_org(
            session,
            AddOrgDefaults {
                kind,
                instance,
                alias,
            },
        ),
        Action::Show { id } => {
            let org = session
                .store()
                .find_org(&id)
                .cloned()
                .ok_or_else(|| PanelError::unknown_org(&id))?;
            Ok(Outcome::Detail { org: Box::new(org) })
        }
        Action::SetView { options } => {
            session.set_options(options);
            Ok(Outcome::Render)
        }
    }
}

fn open_org(session: &mut Session<'_>, id: &str) -> Result<Outcome> {
    session.cli().open_org(id)?;
    let now = session.system().now();
    session.store_mut().stamp_opened(id, now)?;
    info!("Opened {}", id);
    Ok(Outcome::Render)
}

/// Remote logout gates the local removal; ids missing locally are still sent to the CLI
fn logout(session: &mut Session<'_>, id: &str, confirmed: bool) -> Result<Outcome> {
    if !confirmed
        && !session
            .prompter()
            .confirm(&format!("Log out of {id}? Local credentials will be removed."))?
    {
        return Ok(Outcome::Nothing);
    }

    session.cli().logout(id)?;

    let store = session.store_mut();
    let forgot = store.forget_opened(id)?;
    let removed = store.remove_org(id)?;
    if !forgot && !removed {
        debug!("{} was not in local state", id);
    }
    info!("Logged out of {}", id);
    Ok(Outcome::RemoveRow { id: id.to_owned() })
}

fn auth_url(session: &mut Session<'_>, id: &str) -> Result<Outcome> {
    let url = session.cli().auth_url(id)?;

    let message = match session.system().set_clipboard(&url) {
        Ok(()) => format!("Auth URL for {id} copied to clipboard:\n{url}"),
        Err(err) => {
            warn!("Could not copy to clipboard: {}", err);
            format!("Auth URL for {id}:\n{url}")
        }
    };
    Ok(Outcome::Notice { message })
}

fn reauthenticate(session: &mut Session<'_>, id: &str) -> Result<Outcome> {
    let instance_url = session
        .store()
        .find_org(id)
        .and_then(|org| org.instance_url.clone())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            PanelError::missing_field(
                "instanceUrl",
                format!("no stored instance URL for {id}; add the org again instead"),
            )
        })?;

    session.cli().login_web(id, &instance_url, false)?;
    session.orgs(true)?;
    Ok(Outcome::Render)
}

fn add_org(session: &mut Session<'_>, defaults: AddOrgDefaults) -> Result<Outcome> {
    let request = run_add_org_wizard(session.prompter(), defaults)?;
    let dev_hub = request.kind == OrgKind::DevHub;

    session
        .cli()
        .login_web(&request.alias, request.instance.login_url(), dev_hub)?;

    match session.cli().org_details(&request.alias) {
        Ok(details) => {
            let org = new_org_record(details, &request.alias, &request.instance, dev_hub);
            session.store_mut().upsert_front(org)?;
        }
        Err(err) => {
            warn!("Could not read details for {}: {:#}; refreshing", request.alias, err);
            session.orgs(true)?;
        }
    }

    let now = session.system().now();
    session.store_mut().stamp_opened(&request.alias, now)?;
    info!("Added {}", request.alias);
    Ok(Outcome::Render)
}

/// Tag a freshly authorized org the way the list command would
fn new_org_record(
    details: OrgRecord,
    alias: &str,
    instance: &InstanceChoice,
    dev_hub: bool,
) -> OrgRecord {
    let mut org = details.without_credentials();
    org.alias = Some(alias.to_owned());
    org.connected_status = Some(CONNECTED.to_owned());
    org.is_dev_hub = org.is_dev_hub || dev_hub;

    let url = org
        .instance_url
        .clone()
        .unwrap_or_else(|| instance.login_url().to_owned());
    org.is_sandbox = classify_instance(Some(&url)) == InstanceKind::Sandbox
        || *instance == InstanceChoice::Sandbox;
    org.instance_url = Some(url);
    org
}
