//! Data models for extracted item sources.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::collections::HashSet;

/// Item identifier as it appears in the loot tables.
pub type ItemId = u32;

/// Where an item drops: the boss and the instance display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemSource {
    pub boss: String,
    pub instance: String,
}

impl ItemSource {
    pub fn new(boss: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            boss: boss.into(),
            instance: instance.into(),
        }
    }
}

/// Extracted relation from item id to its drop source.
///
/// At most one source is kept per item. The first association inserted wins,
/// later ones for the same id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSources {
    entries: HashMap<ItemId, ItemSource>,
}

impl ItemSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `source` for `item_id` unless the id already has one.
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, item_id: ItemId, source: ItemSource) -> bool {
        match self.entries.entry(item_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(source);
                true
            }
        }
    }

    pub fn get(&self, item_id: ItemId) -> Option<&ItemSource> {
        self.entries.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemSource)> {
        self.entries.iter().map(|(id, source)| (*id, source))
    }

    pub fn distinct_instances(&self) -> usize {
        self.entries
            .values()
            .map(|s| s.instance.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn distinct_bosses(&self) -> usize {
        self.entries
            .values()
            .map(|s| s.boss.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            items: self.len(),
            instances: self.distinct_instances(),
            bosses: self.distinct_bosses(),
        }
    }
}

impl FromIterator<(ItemId, ItemSource)> for ItemSources {
    fn from_iter<I: IntoIterator<Item = (ItemId, ItemSource)>>(iter: I) -> Self {
        let mut sources = ItemSources::new();
        for (item_id, source) in iter {
            sources.insert_if_absent(item_id, source);
        }
        sources
    }
}

/// Summary counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub items: usize,
    pub instances: usize,
    pub bosses: usize,
}
