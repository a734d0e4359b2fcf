//! Org data model
//!
//! Records as reported by the external CLI, their derived classifications,
//! and the decoding of list results.

pub mod listing;
pub mod record;

pub use listing::{GroupedOrgs, OrgListResult};
pub use record::{CONNECTED, InstanceKind, OrgRecord, OrgType, classify_instance};
