//! Dispatch registry
//!
//! Tracks every notification that was handed to the platform and is still believed
//! to be on screen, in dispatch order. An entry leaves the registry on the first
//! interaction, close or clear, so a late second event for the same notification
//! finds nothing.

use indexmap::IndexMap;

use crate::domain::DispatchedNotification;

/// Registry entry: the dispatched notification plus the dispatch generation.
///
/// Generations tell a replacement apart from the notification it replaced, so a
/// timer armed for the old one does not withdraw the new one.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub dispatched: DispatchedNotification,
    pub generation: u64,
}

/// Identifier -> most recently sent notification
#[derive(Debug, Default)]
pub struct DispatchRegistry {
    entries: IndexMap<String, RegistryEntry>,
    next_generation: u64,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dispatched notification, replacing any entry with the same
    /// identifier. Replacements move to the back of the dispatch order.
    ///
    /// # Returns
    /// The generation assigned to this dispatch
    pub fn insert(&mut self, dispatched: DispatchedNotification) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        let identifier = dispatched.identifier().to_string();

        self.entries.shift_remove(&identifier);
        self.entries.insert(
            identifier,
            RegistryEntry {
                dispatched,
                generation,
            },
        );
        generation
    }

    pub fn get(&self, identifier: &str) -> Option<&DispatchedNotification> {
        self.entries.get(identifier).map(|entry| &entry.dispatched)
    }

    pub fn generation(&self, identifier: &str) -> Option<u64> {
        self.entries.get(identifier).map(|entry| entry.generation)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn remove(&mut self, identifier: &str) -> Option<DispatchedNotification> {
        self.entries
            .shift_remove(identifier)
            .map(|entry| entry.dispatched)
    }

    /// Remove `identifier` only if it still belongs to `generation`
    pub fn remove_generation(
        &mut self,
        identifier: &str,
        generation: u64,
    ) -> Option<DispatchedNotification> {
        if self.generation(identifier) == Some(generation) {
            self.remove(identifier)
        } else {
            None
        }
    }

    /// Identifier of the longest-displayed notification
    pub fn oldest(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    /// Identifiers in dispatch order
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove everything, returning the removed notifications in dispatch order
    pub fn drain(&mut self) -> Vec<DispatchedNotification> {
        self.entries
            .drain(..)
            .map(|(_, entry)| entry.dispatched)
            .collect()
    }
}
