//! Session-local client registry.

use tracing::{debug, info};

use crate::confirm::RemovalConfirmation;
use crate::error::{RetailError, RetailResult};
use crate::types::{Client, ClientDraft, ClientId};

/// Owns the client list for the current session.
///
/// Ids come from a counter kept next to the list, so an id freed by a
/// removal is never handed out again.
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    clients: Vec<Client>,
    next_id: ClientId,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, draft: ClientDraft) -> RetailResult<Client> {
        draft.validate()?;
        let client = Client {
            id: self.next_id,
            name: draft.name,
            address: draft.address,
            phone: draft.phone,
        };
        self.next_id += 1;
        self.clients.push(client.clone());
        info!(client_id = client.id, "client added");
        Ok(client)
    }

    pub fn update(&mut self, id: ClientId, draft: ClientDraft) -> RetailResult<Client> {
        draft.validate()?;
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RetailError::not_found(format!("client {id}")))?;
        client.name = draft.name;
        client.address = draft.address;
        client.phone = draft.phone;
        info!(client_id = id, "client updated");
        Ok(client.clone())
    }

    /// First step of a removal: hand the UI something to confirm.
    pub fn request_removal(&self, id: ClientId) -> RemovalConfirmation<ClientId> {
        debug!(client_id = id, "client removal requested");
        RemovalConfirmation::new(id)
    }

    /// Second step. Returns whether a record was actually removed; removing
    /// an id that is already gone is a no-op.
    pub fn remove(&mut self, confirmation: RemovalConfirmation<ClientId>) -> bool {
        let id = confirmation.id();
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        let removed = self.clients.len() != before;
        if removed {
            info!(client_id = id, "client removed");
        }
        removed
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn list(&self) -> &[Client] {
        &self.clients
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn ana() -> ClientDraft {
        ClientDraft::new("Ana", "Calle 1", "555")
    }

    #[test]
    fn first_clients_get_sequential_ids() {
        let mut registry = ClientRegistry::new();
        registry.add(ana()).unwrap();
        assert_eq!(
            registry.list(),
            &[Client {
                id: 1,
                name: "Ana".to_string(),
                address: "Calle 1".to_string(),
                phone: "555".to_string(),
            }]
        );
        let second = registry.add(ClientDraft::new("Luis", "", "")).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn blank_name_is_rejected_without_side_effects() {
        let mut registry = ClientRegistry::new();
        let err = registry.add(ClientDraft::new("   ", "Calle 1", "555")).unwrap_err();
        assert!(matches!(err, RetailError::Validation(_)));
        assert!(registry.list().is_empty());

        // the counter did not move either
        assert_eq!(registry.add(ana()).unwrap().id, 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry = ClientRegistry::new();
        registry.add(ana()).unwrap();
        let second = registry.add(ClientDraft::new("Luis", "", "")).unwrap();
        assert!(registry.remove(registry.request_removal(1)));

        let third = registry.add(ClientDraft::new("Eva", "", "")).unwrap();
        assert_eq!(third.id, 3);
        assert_ne!(third.id, second.id);
    }

    #[test]
    fn update_replaces_fields_and_keeps_id() {
        let mut registry = ClientRegistry::new();
        registry.add(ana()).unwrap();
        let updated = registry
            .update(1, ClientDraft::new("Ana María", "Calle 2", "556"))
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(registry.get(1), Some(&updated));
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut registry = ClientRegistry::new();
        let err = registry.update(9, ana()).unwrap_err();
        assert!(matches!(err, RetailError::NotFound(_)));
    }

    #[test]
    fn update_with_blank_name_leaves_record_untouched() {
        let mut registry = ClientRegistry::new();
        let original = registry.add(ana()).unwrap();
        let err = registry.update(1, ClientDraft::new("", "x", "y")).unwrap_err();
        assert!(matches!(err, RetailError::Validation(_)));
        assert_eq!(registry.get(1), Some(&original));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = ClientRegistry::new();
        registry.add(ana()).unwrap();
        registry.add(ClientDraft::new("Luis", "", "")).unwrap();

        assert!(registry.remove(registry.request_removal(1)));
        assert!(!registry.remove(registry.request_removal(1)));
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].name, "Luis");
    }

    #[test]
    fn dropped_confirmation_removes_nothing() {
        let mut registry = ClientRegistry::new();
        registry.add(ana()).unwrap();
        let confirmation = registry.request_removal(1);
        assert_eq!(confirmation.id(), 1);
        drop(confirmation);
        assert_eq!(registry.list().len(), 1);
    }

    proptest! {
        #[test]
        fn add_always_yields_a_fresh_id(
            names in proptest::collection::vec("[a-z]{1,8}", 1..20),
            removals in proptest::collection::vec(any::<bool>(), 1..20),
        ) {
            let mut registry = ClientRegistry::new();
            let mut seen = HashSet::new();
            for (name, remove) in names.iter().zip(removals.iter().cycle()) {
                let before = registry.list().len();
                let client = registry.add(ClientDraft::new(name.clone(), "", "")).unwrap();
                prop_assert!(seen.insert(client.id));
                prop_assert_eq!(registry.list().len(), before + 1);
                prop_assert_eq!(registry.list().iter().filter(|c| c.id == client.id).count(), 1);
                if *remove {
                    registry.remove(registry.request_removal(client.id));
                }
            }
        }
    }
}
