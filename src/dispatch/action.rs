//! Events sent by the view and the signals sent back

use crate::org::OrgRecord;
use crate::view::ViewOptions;
use crate::wizard::OrgKind;
use serde::{Deserialize, Serialize};

/// One user action, tagged by `command`
///
/// ```
/// use orgdeck::dispatch::Action;
///
/// let action: Action = serde_json::from_str(r#"{"command":"open","id":"dev"}"#).unwrap();
/// assert_eq!(action, Action::Open { id: "dev".to_owned() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Action {
    /// Re-fetch the org list
    Refresh,
    /// Open an org in the browser
    Open { id: String },
    /// Log out of an org; asks first unless `confirmed`
    Logout {
        id: String,
        #[serde(default)]
        confirmed: bool,
    },
    /// Copy and show an org's auth URL
    GetAuthUrl { id: String },
    /// Make an org the CLI's default
    SetDefaultOrg { id: String },
    /// Log in again at the org's stored instance URL
    Reauthenticate { id: String },
    /// Authorize a new org; missing fields are asked for
    AddOrg {
        #[serde(default)]
        kind: Option<OrgKind>,
        #[serde(default)]
        instance: Option<String>,
        #[serde(default)]
        alias: Option<String>,
    },
    /// Detail popover for one org
    Show { id: String },
    /// Change search, filter or sort
    SetView { options: ViewOptions },
}

/// What the view should do after an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    /// Redraw the whole table
    Render,
    /// Drop one row without a full redraw
    RemoveRow { id: String },
    /// Show a message
    Notice { message: String },
    /// Show one org's details
    Detail { org: Box<OrgRecord> },
    /// The user declined; nothing changed
    Nothing,
}
