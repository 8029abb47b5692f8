//! Name-addressed arena.
//!
//! Entries are created on first use (or stored explicitly), addressed by
//! name or by the `Handle` returned at insertion, and only dropped by
//! `remove` or an explicit `reset`. Handles stay valid until their entry is
//! removed; a removed slot is never reused before the next `reset`.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug, Clone)]
pub struct Repository<T> {
    slots: Vec<Option<(String, T)>>,
    index: HashMap<String, usize>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or replace. Replacing keeps the existing handle.
    pub fn store(&mut self, name: impl Into<String>, value: T) -> Handle {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            self.slots[idx] = Some((name, value));
            return Handle(idx);
        }
        let idx = self.slots.len();
        self.index.insert(name.clone(), idx);
        self.slots.push(Some((name, value)));
        Handle(idx)
    }

    /// Entry for `name`, created with `make` when absent.
    pub fn find_or_create(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.slots.len();
                self.index.insert(name.to_string(), idx);
                self.slots.push(None);
                idx
            }
        };
        &mut self.slots[idx]
            .get_or_insert_with(|| (name.to_string(), make()))
            .1
    }

    pub fn handle(&self, name: &str) -> Option<Handle> {
        self.index.get(name).map(|&idx| Handle(idx))
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0)?.as_ref().map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.0)?.as_mut().map(|(_, v)| v)
    }

    pub fn by_name(&self, name: &str) -> Option<&T> {
        self.get(self.handle(name)?)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut T> {
        let handle = self.handle(name)?;
        self.get_mut(handle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let idx = self.index.remove(name)?;
        self.slots[idx].take().map(|(_, v)| v)
    }

    /// Drop every entry and invalidate all handles.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|(name, _)| name.to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(n, v)| (n.as_str(), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut T)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.as_mut().map(|(n, v)| (n.as_str(), v)))
    }
}
