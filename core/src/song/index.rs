//! Block index: the referenceable names of one song
//!
//! The index maps each block name to the block's id and keeps names in
//! ascending order, which is the order reference pickers present them in.
//! It is a projection of the song's block list, never a second source of
//! truth; only [`Song`](crate::Song) mutates it.

use crate::error::{Result, SongbookError};
use crate::model::{Block, BlockId, AUTO_NAME_PREFIX};
use std::collections::BTreeMap;

/// First auto name `_ab_<n>` with `n >= start` that `is_taken` rejects
///
/// Returns the chosen `n` together with the name, so a caller naming a batch
/// can continue probing from `n + 1`.
pub fn auto_name_from(start: usize, is_taken: impl Fn(&str) -> bool) -> (usize, String) {
    let mut n = start;
    loop {
        let name = format!("{}{}", AUTO_NAME_PREFIX, n);
        if !is_taken(&name) {
            return (n, name);
        }
        n += 1;
    }
}

/// First auto name not accepted by `is_taken`, probing from `_ab_0`
pub fn auto_name(is_taken: impl Fn(&str) -> bool) -> String {
    auto_name_from(0, is_taken).1
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockIndex {
    names: BTreeMap<String, BlockId>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `block` under its current name
    pub fn add(&mut self, block: &Block) -> Result<()> {
        self.insert(block.name(), block.id())
    }

    pub(crate) fn insert(&mut self, name: &str, id: BlockId) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(SongbookError::DuplicateName(name.to_string()));
        }
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    /// Unregister `block`; its name must map to this very block
    pub fn remove(&mut self, block: &Block) -> Result<()> {
        match self.names.get(block.name()) {
            Some(&id) if id == block.id() => {
                self.names.remove(block.name());
                Ok(())
            }
            _ => Err(SongbookError::NotFound(format!(
                "block {:?} in index",
                block.name()
            ))),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<BlockId> {
        self.names.get(name).copied()
    }

    /// Names in ascending lexicographic order
    pub fn ordered_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Row of `name` within [`ordered_names`](Self::ordered_names)
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.keys().position(|n| n == name)
    }

    /// The first auto name not present in this index (nothing is reserved)
    pub fn auto_name(&self) -> String {
        auto_name(|name| self.contains(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
