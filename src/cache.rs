//! Org list cache
//!
//! Serves the persisted list unless a refresh is forced, in which case the
//! CLI is asked again and the result replaces the stored list.

use crate::org::OrgRecord;
use crate::sf::OrgCli;
use crate::store::StateStore;
use anyhow::Result;
use tracing::{debug, info};

/// Read-through cache over the state store
pub struct OrgCache<'a, 'sys> {
    cli: &'a OrgCli<'sys>,
    store: &'a mut StateStore<'sys>,
}

impl<'a, 'sys> OrgCache<'a, 'sys> {
    #[must_use]
    pub const fn new(cli: &'a OrgCli<'sys>, store: &'a mut StateStore<'sys>) -> Self {
        Self { cli, store }
    }

    /// Return the last-known org list, fetching it when forced or absent
    ///
    /// On failure the stored list is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails or its output cannot be decoded,
    /// or if the fetched list cannot be persisted
    pub fn get(&mut self, force_refresh: bool) -> Result<Vec<OrgRecord>> {
        if !force_refresh && let Some(cached) = self.store.org_list() {
            debug!("Serving {} cached orgs", cached.len());
            return Ok(cached.to_vec());
        }

        let orgs = self.cli.list_orgs()?;
        info!("Fetched {} orgs", orgs.len());
        self.store.set_org_list(orgs.clone())?;
        Ok(orgs)
    }
}
