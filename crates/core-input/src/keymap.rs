//! Key name -> system event table.
//!
//! Lookups consult the bindings scoped to the focused region first and fall
//! back to the global table. A key with no binding in either is reported as
//! unbound; the caller then triggers an event named after the key itself.

use core_events::Value;
use std::collections::{BTreeMap, HashMap};

/// Event (and arguments) a key is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAction {
    pub event: String,
    pub args: Vec<Value>,
}

impl KeyAction {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(event: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            event: event.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    global: BTreeMap<String, KeyAction>,
    scoped: HashMap<String, BTreeMap<String, KeyAction>>,
}

impl Keymap {
    /// An empty keymap; every key is unbound.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Navigation, focus, mode switch and exit keys.
    pub fn defaults() -> Self {
        let mut map = Self::empty();
        for (key, event) in [
            ("escape", "_mode_switch_"),
            ("q", "_exit_"),
            ("ctrl_c", "_exit_"),
            ("up", "_cursor_up_"),
            ("down", "_cursor_down_"),
            ("left", "_cursor_left_"),
            ("right", "_cursor_right_"),
            ("home", "_cursor_origin_"),
            ("tab", "_focus_next_"),
            ("shift_tab", "_focus_prev_"),
        ] {
            map.bind(key, KeyAction::new(event));
        }
        map
    }

    /// Bind `key` globally, returning the action it replaced.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) -> Option<KeyAction> {
        self.global.insert(key.into(), action)
    }

    /// Bind `key` only while `region` has focus.
    pub fn bind_for(
        &mut self,
        region: impl Into<String>,
        key: impl Into<String>,
        action: KeyAction,
    ) -> Option<KeyAction> {
        self.scoped
            .entry(region.into())
            .or_default()
            .insert(key.into(), action)
    }

    /// Remove the global binding for `key` (scoped bindings are untouched).
    pub fn unbind(&mut self, key: &str) -> Option<KeyAction> {
        self.global.remove(key)
    }

    pub fn unbind_for(&mut self, region: &str, key: &str) -> Option<KeyAction> {
        let table = self.scoped.get_mut(region)?;
        let removed = table.remove(key);
        if table.is_empty() {
            self.scoped.remove(region);
        }
        removed
    }

    pub fn lookup(&self, region: Option<&str>, key: &str) -> Option<&KeyAction> {
        region
            .and_then(|r| self.scoped.get(r))
            .and_then(|table| table.get(key))
            .or_else(|| self.global.get(key))
    }

    /// Globally bound key names, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.global.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.scoped.values().map(BTreeMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
