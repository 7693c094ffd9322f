/// ObjectRegistry: named scene objects and their lifecycle state.
///
/// Entries live in a SlotMap so keys stay stable while other entries come
/// and go; a name index gives O(1) lookup and a separate vector keeps
/// registration order for iteration. Pending keys are tracked on their own
/// so readiness polling only visits pending entries. An object is taken out of its entry
/// while one of its callbacks runs and put back afterwards.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use super::scene_object::SceneObject;

new_key_type! {
    /// Stable key for a registered object
    pub struct ObjectKey;
}

/// Per-object lifecycle: `Pending -> Active -> Ended` or `Pending -> Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Registered, not admitted to the pipeline yet
    Pending,
    /// Admitted, receiving render callbacks
    Active,
    /// Unregistered (terminal)
    Ended,
}

struct Entry {
    name: String,
    object: Option<Box<dyn SceneObject>>,
    state: ObjectState,
}

#[derive(Default)]
pub struct ObjectRegistry {
    entries: SlotMap<ObjectKey, Entry>,
    names: FxHashMap<String, ObjectKey>,
    order: Vec<ObjectKey>,
    /// Pending keys in registration order
    pending: Vec<ObjectKey>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the object's name. The caller makes sure the name is free.
    pub fn insert(&mut self, object: Box<dyn SceneObject>, state: ObjectState) -> ObjectKey {
        let name = object.name().to_string();
        let key = self.entries.insert(Entry {
            name: name.clone(),
            object: Some(object),
            state,
        });
        self.names.insert(name, key);
        self.order.push(key);
        if state == ObjectState::Pending {
            self.pending.push(key);
        }
        key
    }

    /// Drop the entry and return its object (if it is not checked out)
    pub fn remove(&mut self, key: ObjectKey) -> Option<Box<dyn SceneObject>> {
        let entry = self.entries.remove(key)?;
        if self.names.get(&entry.name) == Some(&key) {
            self.names.remove(&entry.name);
        }
        self.order.retain(|k| *k != key);
        if entry.state == ObjectState::Pending {
            self.pending.retain(|k| *k != key);
        }
        entry.object
    }

    pub fn key(&self, name: &str) -> Option<ObjectKey> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn name(&self, key: ObjectKey) -> Option<&str> {
        self.entries.get(key).map(|e| e.name.as_str())
    }

    pub fn state(&self, key: ObjectKey) -> Option<ObjectState> {
        self.entries.get(key).map(|e| e.state)
    }

    pub fn set_state(&mut self, key: ObjectKey, state: ObjectState) {
        let Some(entry) = self.entries.get_mut(key) else { return };
        let previous = std::mem::replace(&mut entry.state, state);
        if previous == state {
            return;
        }
        if previous == ObjectState::Pending {
            self.pending.retain(|k| *k != key);
        } else if state == ObjectState::Pending {
            // Keep registration order among pending keys
            let order = &self.order;
            let rank = |k: &ObjectKey| order.iter().position(|o| o == k);
            let at = self.pending.partition_point(|k| rank(k) < rank(&key));
            self.pending.insert(at, key);
        }
    }

    /// Borrow an object that is not currently checked out
    pub fn get(&self, key: ObjectKey) -> Option<&dyn SceneObject> {
        self.entries.get(key)?.object.as_deref()
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut (dyn SceneObject + 'static)> {
        self.entries.get_mut(key)?.object.as_deref_mut()
    }

    /// Check an object out for the duration of a callback
    pub(crate) fn take(&mut self, key: ObjectKey) -> Option<Box<dyn SceneObject>> {
        self.entries.get_mut(key)?.object.take()
    }

    /// Return a checked-out object. Dropped if its entry was removed meanwhile.
    pub(crate) fn restore(&mut self, key: ObjectKey, object: Box<dyn SceneObject>) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.object = Some(object);
        }
    }

    /// Keys in registration order
    pub fn keys(&self) -> &[ObjectKey] {
        &self.order
    }

    /// Keys in a given state, in registration order
    pub fn keys_in_state(&self, state: ObjectState) -> Vec<ObjectKey> {
        self.order
            .iter()
            .copied()
            .filter(|k| self.state(*k) == Some(state))
            .collect()
    }

    pub fn count_in_state(&self, state: ObjectState) -> usize {
        match state {
            ObjectState::Pending => self.pending.len(),
            _ => self.entries.values().filter(|e| e.state == state).count(),
        }
    }

    /// Pending keys in registration order, without scanning other entries
    pub fn pending_keys(&self) -> &[ObjectKey] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(*k))
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
