//! Option lists for finder stages and the keyed slots that load them.
//!
//! Each stage's options are fetched for a key made of the upstream choices.
//! When an upstream choice changes, the slot is re-keyed and any response
//! still in flight for the old key is discarded on arrival. Independent slots
//! never touch each other, so completion order between them does not matter.

use std::fmt::Debug;

/// What a stage can currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsState<T> {
    /// Upstream stages are not filled yet; nothing to fetch.
    Locked,
    Loading,
    /// At least one option is available.
    Loaded(Vec<T>),
    /// Loaded successfully but nothing matches, distinct from `Loading`.
    Empty,
    /// The fetch for this stage failed. Upstream choices are unaffected.
    Failed(String),
}

impl<T> OptionsState<T> {
    /// Classifies a loaded list as `Loaded` or `Empty`.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            OptionsState::Empty
        } else {
            OptionsState::Loaded(items)
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            OptionsState::Loaded(items) => items,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, OptionsState::Loading)
    }

    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> OptionsState<U> {
        match self {
            OptionsState::Locked => OptionsState::Locked,
            OptionsState::Loading => OptionsState::Loading,
            OptionsState::Loaded(items) => OptionsState::Loaded(items.into_iter().map(f).collect()),
            OptionsState::Empty => OptionsState::Empty,
            OptionsState::Failed(message) => OptionsState::Failed(message),
        }
    }
}

/// Proof that a request was issued for a particular key and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Holds one stage's options and the key they were requested for.
#[derive(Debug, Clone)]
pub struct OptionSlot<K, T> {
    key: Option<K>,
    generation: u64,
    state: OptionsState<T>,
}

impl<K, T> Default for OptionSlot<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            state: OptionsState::Locked,
        }
    }
}

impl<K: Clone + PartialEq + Debug, T> OptionSlot<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &OptionsState<T> {
        &self.state
    }

    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Starts a request for `key`, superseding any request in flight.
    pub fn request(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.state = OptionsState::Loading;
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// Returns the slot to `Locked`, invalidating any request in flight.
    pub fn lock(&mut self) {
        self.generation += 1;
        self.key = None;
        self.state = OptionsState::Locked;
    }

    /// Applies a response if `ticket` is still current. Returns `false` and
    /// leaves the slot untouched for a superseded ticket.
    pub fn complete(&mut self, ticket: &Ticket<K>, result: Result<Vec<T>, String>) -> bool {
        if ticket.generation != self.generation || self.key.as_ref() != Some(&ticket.key) {
            tracing::debug!(
                stale_key = ?ticket.key,
                current_key = ?self.key,
                "discarding stale options response"
            );
            return false;
        }
        self.state = match result {
            Ok(items) => OptionsState::from_items(items),
            Err(message) => OptionsState::Failed(message),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_locked() {
        let slot: OptionSlot<String, String> = OptionSlot::new();
        assert_eq!(slot.state(), &OptionsState::Locked);
        assert!(slot.key().is_none());
    }

    #[test]
    fn request_then_complete_loads_items() {
        let mut slot = OptionSlot::new();
        let ticket = slot.request("2020".to_owned());
        assert!(slot.state().is_loading());
        assert!(slot.complete(&ticket, Ok(vec!["Honda".to_owned()])));
        assert_eq!(slot.state().items(), ["Honda".to_owned()]);
    }

    #[test]
    fn empty_result_is_distinct_from_loading() {
        let mut slot: OptionSlot<String, String> = OptionSlot::new();
        let ticket = slot.request("1901".to_owned());
        assert!(slot.complete(&ticket, Ok(vec![])));
        assert_eq!(slot.state(), &OptionsState::Empty);
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut slot = OptionSlot::new();
        let stale = slot.request("Honda".to_owned());
        let fresh = slot.request("Toyota".to_owned());

        assert!(slot.complete(&fresh, Ok(vec!["Camry".to_owned()])));
        assert!(!slot.complete(&stale, Ok(vec!["Civic".to_owned()])));
        assert_eq!(slot.state().items(), ["Camry".to_owned()]);
    }

    #[test]
    fn stale_response_arriving_first_is_still_discarded() {
        let mut slot = OptionSlot::new();
        let stale = slot.request("Honda".to_owned());
        let fresh = slot.request("Toyota".to_owned());

        assert!(!slot.complete(&stale, Ok(vec!["Civic".to_owned()])));
        assert!(slot.state().is_loading());
        assert!(slot.complete(&fresh, Ok(vec!["Camry".to_owned()])));
    }

    #[test]
    fn re_requesting_same_key_supersedes_previous_ticket() {
        let mut slot: OptionSlot<String, String> = OptionSlot::new();
        let first = slot.request("Honda".to_owned());
        let second = slot.request("Honda".to_owned());
        assert!(!slot.complete(&first, Ok(vec!["Old".to_owned()])));
        assert!(slot.complete(&second, Ok(vec!["New".to_owned()])));
    }

    #[test]
    fn lock_invalidates_in_flight_request() {
        let mut slot: OptionSlot<String, String> = OptionSlot::new();
        let ticket = slot.request("Honda".to_owned());
        slot.lock();
        assert!(!slot.complete(&ticket, Ok(vec!["Civic".to_owned()])));
        assert_eq!(slot.state(), &OptionsState::Locked);
    }

    #[test]
    fn failure_is_recorded_on_the_slot() {
        let mut slot: OptionSlot<String, String> = OptionSlot::new();
        let ticket = slot.request("Honda".to_owned());
        assert!(slot.complete(&ticket, Err("timed out".to_owned())));
        assert_eq!(slot.state(), &OptionsState::Failed("timed out".to_owned()));
    }
}
