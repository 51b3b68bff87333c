// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered collection of areas.
//!
//! List order is paint order: later entries are drawn on top and win hit
//! tests. Each area gets a key that stays stable while it is reordered.

use super::area::Area;

/// Identity of an area within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaKey(u64);

#[derive(Debug, Default, Clone)]
pub struct AreaCollection {
    entries: Vec<(AreaKey, Area)>,
    next_key: u64,
}

impl AreaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an area on top of all others.
    pub fn push(&mut self, area: Area) -> AreaKey {
        let key = AreaKey(self.next_key);
        self.next_key += 1;
        self.entries.push((key, area));
        key
    }

    pub fn remove(&mut self, key: AreaKey) -> Option<Area> {
        let index = self.index_of(key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: AreaKey) -> Option<&Area> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    pub fn get_mut(&mut self, key: AreaKey) -> Option<&mut Area> {
        self.entries.iter_mut().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    pub fn index_of(&self, key: AreaKey) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    /// Move an area to the end of the list so it paints last.
    pub fn move_to_top(&mut self, key: AreaKey) -> bool {
        match self.index_of(key) {
            Some(index) => {
                let entry = self.entries.remove(index);
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (AreaKey, &Area)> {
        self.entries.iter().map(|(k, a)| (*k, a))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AreaKey, &mut Area)> {
        self.entries.iter_mut().map(|(k, a)| (*k, a))
    }

    pub fn keys(&self) -> Vec<AreaKey> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
