use std::hash::Hash;
use std::time::Duration;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::Transition;

/// Independent transitions keyed by their subject.
///
/// Each subject owns exactly one transition; inserting for an existing key
/// replaces (cancels) the previous one. Nothing is shared between entries, so
/// one dispatcher can advance them all on every tick.
#[derive(Debug, Clone)]
pub struct TransitionSet<K: Hash + Eq + Clone, T: Transition> {
    entries: IndexMap<K, T>,
}

impl<K: Hash + Eq + Clone, T: Transition> Default for TransitionSet<K, T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, T: Transition> TransitionSet<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    /// Stores `transition` for `key`, returning the cancelled one if any.
    pub fn insert(&mut self, key: K, transition: T) -> Option<T> {
        self.entries.insert(key, transition)
    }

    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> T) -> &mut T {
        self.entries.entry(key).or_insert_with(make)
    }

    pub fn remove(&mut self, key: &K) -> Option<T> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut T)> {
        self.entries.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advances every entry to `now` and returns the keys whose value changed.
    pub fn advance_all(&mut self, now: Duration) -> SmallVec<[K; 4]> {
        self.entries
            .iter_mut()
            .filter_map(|(key, transition)| transition.advance(now).then(|| key.clone()))
            .collect()
    }

    #[must_use]
    pub fn any_running(&self) -> bool {
        self.entries.values().any(Transition::is_running)
    }

    /// Drops entries for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &T) -> bool) {
        self.entries.retain(|key, transition| keep(key, transition));
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionSet;
    use crate::transition::{Easing, OPAQUE, OpacityTransition, TRANSPARENT, Transition};
    use std::time::Duration;

    #[test]
    fn insert_replaces_previous_transition_for_subject() {
        let mut set = TransitionSet::new();
        let first = OpacityTransition::starting(
            OPAQUE,
            TRANSPARENT,
            Duration::ZERO,
            Duration::from_millis(100),
            Easing::Linear,
        );
        set.insert("a", first);
        let replaced = set.insert(
            "a",
            OpacityTransition::settled(OPAQUE, Duration::from_millis(100), Easing::Linear),
        );
        assert!(replaced.is_some_and(|old| old.is_running()));
        assert_eq!(set.len(), 1);
        assert!(!set.any_running());
    }

    #[test]
    fn advance_reports_only_changed_subjects() {
        let mut set = TransitionSet::new();
        set.insert(
            "fading",
            OpacityTransition::starting(
                OPAQUE,
                TRANSPARENT,
                Duration::ZERO,
                Duration::from_millis(100),
                Easing::Linear,
            ),
        );
        set.insert(
            "idle",
            OpacityTransition::settled(OPAQUE, Duration::from_millis(100), Easing::Linear),
        );
        let changed = set.advance_all(Duration::from_millis(30));
        assert_eq!(changed.as_slice(), &["fading"]);
    }
}
