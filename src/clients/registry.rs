//! In-memory client registry

use log::{debug, warn};

use super::data::{Client, SubscriptionPatch, SubscriptionState};
use super::resolver::is_active;
use crate::error::{MetricsError, Result};

/// All clients plus the id counter
///
/// Ids are assigned sequentially and never reused, even after removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRegistry {
    clients: Vec<Client>,
    next_client_id: u64,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self {
            clients: Vec::new(),
            next_client_id: 1,
        }
    }
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts, repairing the id counter if needed
    pub fn from_parts(clients: Vec<Client>, next_client_id: u64) -> Self {
        let mut registry = Self {
            clients,
            next_client_id,
        };
        registry.repair_next_id();
        registry
    }

    pub fn into_parts(self) -> (Vec<Client>, u64) {
        (self.clients, self.next_client_id)
    }

    pub fn next_client_id(&self) -> u64 {
        self.next_client_id
    }

    /// Raise the id counter above every stored id
    pub fn repair_next_id(&mut self) {
        let floor = self.clients.iter().map(|c| c.id.saturating_add(1)).max().unwrap_or(1);
        if self.next_client_id < floor {
            warn!(
                "Client id counter {} is not above stored ids, raising to {}",
                self.next_client_id, floor
            );
            self.next_client_id = floor;
        }
    }

    /// Add a client and return its id
    pub fn add_client(
        &mut self,
        name: impl Into<String>,
        start_month: u32,
        subscription: SubscriptionState,
    ) -> u64 {
        let id = self.next_client_id;
        self.next_client_id = self.next_client_id.saturating_add(1);
        self.clients.push(Client::new(id, name, start_month, subscription));
        debug!("Added client {} starting month {}", id, start_month);
        id
    }

    /// Remove a client; its id is not handed out again
    pub fn remove_client(&mut self, id: u64) -> Result<Client> {
        let idx = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(MetricsError::ClientNotFound(id))?;
        Ok(self.clients.remove(idx))
    }

    /// Make the client inactive from `month` onward
    pub fn pause_client(&mut self, id: u64, month: u32) -> Result<()> {
        self.get_mut(id)?.paused_at = Some(month);
        Ok(())
    }

    pub fn unpause_client(&mut self, id: u64) -> Result<()> {
        self.get_mut(id)?.paused_at = None;
        Ok(())
    }

    pub fn rename_client(&mut self, id: u64, name: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Change a client's subscription as of `month`
    ///
    /// At the start month the patch is merged into the base subscription;
    /// any other month stores the patch as that month's override, replacing
    /// an existing one.
    pub fn update_subscription(&mut self, id: u64, month: u32, patch: SubscriptionPatch) -> Result<()> {
        let client = self.get_mut(id)?;
        if month == client.start_month {
            client.subscription = client.subscription.apply(&patch);
        } else {
            client.overrides.insert(month, patch);
        }
        Ok(())
    }

    pub fn get(&self, id: u64) -> Result<&Client> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or(MetricsError::ClientNotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Client> {
        self.clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(MetricsError::ClientNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Clients paying in `month`
    pub fn active_in(&self, month: u32) -> impl Iterator<Item = &Client> {
        self.clients.iter().filter(move |c| is_active(c, month))
    }

    /// Clients whose first month is `month`
    pub fn starting_in(&self, month: u32) -> impl Iterator<Item = &Client> {
        self.clients.iter().filter(move |c| c.start_month == month)
    }
}
