//! Lazily built media groups.

use std::collections::HashMap;
use std::sync::Arc;

use crate::trigger::{GroupKey, Trigger};

/// Entries of every group resolved so far.
///
/// A group is built the first time one of its triggers is opened and is never
/// rebuilt afterwards, even if the triggers change on a later scan.
#[derive(Debug, Default)]
pub struct GroupCache {
    groups: HashMap<GroupKey, Arc<[String]>>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entries of `key`, building them from `triggers` on first use.
    pub fn resolve(&mut self, key: &GroupKey, triggers: &[Trigger]) -> Arc<[String]> {
        if let Some(entries) = self.groups.get(key) {
            return entries.clone();
        }

        let mut entries: Vec<String> = Vec::new();
        for trigger in triggers.iter().filter(|t| &t.config.group == key) {
            let entry = trigger.config.group_entry();
            if !entries.iter().any(|existing| existing == entry) {
                entries.push(entry.to_string());
            }
        }
        log::debug!("Resolved group {} with {} entries", key, entries.len());

        let entries: Arc<[String]> = entries.into();
        self.groups.insert(key.clone(), entries.clone());
        entries
    }
}
