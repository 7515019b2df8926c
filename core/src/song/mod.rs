//! Song: an ordered arrangement of named blocks
//!
//! A song owns its blocks and the [`BlockIndex`] of their names, and is the
//! only place either is changed. Every structural edit keeps the two in
//! lockstep, and [`Song::cleanup`] rebuilds the index from scratch.
//!
//! # Cleanup
//!
//! Cleanup normalizes a song before it is saved and after every
//! [`Song::replace`]:
//!
//! 1. Placeholder (empty) blocks are dropped.
//! 2. Unnamed blocks get the first free `_ab_<n>` name, in document order;
//!    two blocks with the same name are an error.
//! 3. Every reference must name a block of the song; contents blocks get
//!    unique line and segment keys.
//!
//! The whole pass is planned against the untouched song first and committed
//! only when it succeeds, so a failing cleanup leaves the song as it was.
//!
//! # Example
//!
//! ```rust
//! use songbook_core::model::Block;
//! use songbook_core::Song;
//!
//! let mut song = Song::new("Greensleeves", vec![]);
//! let verse = song.insert(None, Block::from_text("verse", "Alas my love\nyou do me wrong"))?;
//! let again = song.insert(Some(verse), Block::reference("", "verse"))?;
//!
//! song.cleanup()?;
//! assert_eq!(song.block(again).unwrap().name(), "_ab_0");
//! assert_eq!(song.resolve(again)?.lines.len(), 2);
//! # Ok::<(), songbook_core::SongbookError>(())
//! ```

mod index;

pub use index::{auto_name, auto_name_from, BlockIndex};

use crate::error::{Result, SongbookError};
use crate::model::{Block, BlockId, BlockKind, Contents};
use crate::raw::RawSong;
use crate::songbook::Author;
use std::collections::HashSet;
use std::rc::Rc;

/// Register `blocks` in `index` one by one, auto-naming unnamed ones
fn ref_into(index: &mut BlockIndex, blocks: &mut [Block]) -> Result<()> {
    for block in blocks {
        if block.name().is_empty() {
            let name = index.auto_name();
            tracing::debug!(%name, "auto-naming block");
            block.set_name(name);
        }
        index.add(block)?;
    }
    Ok(())
}

/// Unregister `blocks` from `index`; unnamed blocks were never indexed
fn unref_from(index: &mut BlockIndex, blocks: &[&Block]) -> Result<()> {
    for block in blocks.iter().filter(|b| !b.name().is_empty()) {
        index.remove(block)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct Song {
    title: String,
    authors: Vec<Rc<Author>>,
    blocks: Vec<Block>,
    index: BlockIndex,
}

impl Song {
    pub fn new(title: impl Into<String>, authors: Vec<Rc<Author>>) -> Self {
        Self {
            title: title.into(),
            authors,
            blocks: Vec::new(),
            index: BlockIndex::new(),
        }
    }

    /// Build a song from raw data, resolving author names through `author`
    ///
    /// Named blocks are indexed right away, so duplicate names are rejected
    /// here. Unnamed blocks and dangling references are left for cleanup.
    pub fn from_raw(raw: RawSong, author: impl Fn(&str) -> Option<Rc<Author>>) -> Result<Self> {
        let authors = raw
            .authors
            .iter()
            .map(|name| {
                author(name).ok_or_else(|| SongbookError::UnknownAuthor {
                    song: raw.name.clone(),
                    author: name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let blocks: Vec<Block> = raw.blocks.into_iter().map(Block::from_raw).collect();
        let mut index = BlockIndex::new();
        for block in blocks.iter().filter(|b| !b.name().is_empty()) {
            index.add(block)?;
        }

        Ok(Self {
            title: raw.name,
            authors,
            blocks,
            index,
        })
    }

    /// Raw form of the song; placeholder blocks are skipped
    pub fn to_raw(&self) -> RawSong {
        RawSong {
            name: self.title.clone(),
            authors: self.authors.iter().map(|a| a.name().to_string()).collect(),
            blocks: self.blocks.iter().filter_map(Block::to_raw).collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn authors(&self) -> &[Rc<Author>] {
        &self.authors
    }

    /// Author names joined for display, e.g. `"Lennon, McCartney"`
    pub fn display_authors(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Blocks in document order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn block_named(&self, name: &str) -> Option<&Block> {
        self.index.get(name).and_then(|id| self.block(id))
    }

    /// Document position of a block
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Referenceable names, for pickers
    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    /// The name the next unnamed block would receive
    pub fn auto_name(&self) -> String {
        self.index.auto_name()
    }

    fn require(&self, id: BlockId) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| SongbookError::NotFound(format!("block {}", id)))
    }

    /// Register new blocks; on failure the index is left untouched
    pub(crate) fn ref_blocks(&mut self, blocks: &mut [Block]) -> Result<()> {
        let mut staged = self.index.clone();
        ref_into(&mut staged, blocks)?;
        self.index = staged;
        Ok(())
    }

    /// Unregister blocks leaving the song; on failure the index is untouched
    pub(crate) fn unref_blocks(&mut self, blocks: &[&Block]) -> Result<()> {
        let mut staged = self.index.clone();
        unref_from(&mut staged, blocks)?;
        self.index = staged;
        Ok(())
    }

    /// Insert `block` right after `after`, or first when `after` is `None`
    pub fn insert(&mut self, after: Option<BlockId>, block: Block) -> Result<BlockId> {
        let at = match after {
            Some(anchor) => self.require(anchor)? + 1,
            None => 0,
        };

        let mut block = block;
        self.ref_blocks(std::slice::from_mut(&mut block))?;

        let id = block.id();
        self.blocks.insert(at, block);
        Ok(id)
    }

    /// Replace block `old` with `new_blocks` (possibly none), then clean up
    ///
    /// This is how content edits are committed. If registering the new
    /// blocks or the following cleanup fails, the song is restored to its
    /// state before the call. Returns the ids of the inserted blocks.
    pub fn replace(&mut self, old: BlockId, new_blocks: Vec<Block>) -> Result<Vec<BlockId>> {
        let at = self.require(old)?;

        let mut staged = self.index.clone();
        unref_from(&mut staged, &[&self.blocks[at]])?;
        let mut new_blocks = new_blocks;
        ref_into(&mut staged, &mut new_blocks)?;

        let ids: Vec<BlockId> = new_blocks.iter().map(Block::id).collect();
        let previous_index = std::mem::replace(&mut self.index, staged);
        let removed: Vec<Block> = self.blocks.splice(at..=at, new_blocks).collect();

        if let Err(err) = self.cleanup() {
            tracing::warn!(%err, "replace rolled back");
            self.blocks.splice(at..at + ids.len(), removed);
            self.index = previous_index;
            return Err(err);
        }
        Ok(ids)
    }

    /// Delete one block; blocks referring to it are not touched
    pub fn remove(&mut self, id: BlockId) -> Result<Block> {
        let at = self.require(id)?;
        let block = self.blocks.remove(at);
        if let Err(err) = self.unref_blocks(&[&block]) {
            self.blocks.insert(at, block);
            return Err(err);
        }
        Ok(block)
    }

    /// Rename a block; an empty name picks a fresh auto name
    ///
    /// References naming the old name are not rewritten.
    pub fn rename(&mut self, id: BlockId, name: impl Into<String>) -> Result<()> {
        let at = self.require(id)?;
        let mut staged = self.index.clone();
        unref_from(&mut staged, &[&self.blocks[at]])?;

        let mut name = name.into();
        if name.is_empty() {
            name = staged.auto_name();
        }
        staged.insert(&name, id)?;

        self.blocks[at].set_name(name);
        self.index = staged;
        Ok(())
    }

    /// Lines of a contents block, for line and segment level edits
    pub fn contents_mut(&mut self, id: BlockId) -> Result<&mut Contents> {
        let at = self.require(id)?;
        self.blocks[at].contents_mut()
    }

    /// Split a contents block before line `before` into two blocks
    ///
    /// The first keeps the name, the second is auto-named.
    pub fn split(&mut self, id: BlockId, before: usize) -> Result<(BlockId, BlockId)> {
        let at = self.require(id)?;
        let (first, second) = self.blocks[at].split(before)?;
        let ids = (first.id(), second.id());
        self.replace(id, vec![first, second])?;
        Ok(ids)
    }

    /// Merge chord line `chord_line` with the lyric line below it
    ///
    /// Returns the id of the block replacing `id`.
    pub fn merge_chords(&mut self, id: BlockId, chord_line: usize) -> Result<BlockId> {
        let at = self.require(id)?;
        let block = &self.blocks[at];
        let mut contents = block
            .as_contents()
            .ok_or_else(|| SongbookError::WrongKind {
                name: block.name().to_string(),
                expected: "contents",
            })?
            .clone();
        contents.merge_chords(chord_line)?;

        let merged = Block::new(block.name(), BlockKind::Contents(contents));
        let merged_id = merged.id();
        self.replace(id, vec![merged])?;
        Ok(merged_id)
    }

    /// Turn free text into a contents block in place of `id`
    pub fn normalize(&mut self, id: BlockId, name: impl Into<String>, text: &str) -> Result<BlockId> {
        let block = Block::from_text(name, text);
        let new_id = block.id();
        self.replace(id, vec![block])?;
        Ok(new_id)
    }

    /// Give a song without blocks a placeholder to type into
    pub fn ensure_placeholder(&mut self) -> Result<Option<BlockId>> {
        if !self.blocks.is_empty() {
            return Ok(None);
        }
        self.insert(None, Block::empty()).map(Some)
    }

    /// Follow references from `id` to the contents block they display
    pub fn resolve(&self, id: BlockId) -> Result<&Contents> {
        let mut block = self
            .block(id)
            .ok_or_else(|| SongbookError::NotFound(format!("block {}", id)))?;
        let mut visited = HashSet::new();

        loop {
            match block.kind() {
                BlockKind::Contents(contents) => return Ok(contents),
                BlockKind::Reference(reference) => {
                    if !visited.insert(block.id()) {
                        return Err(SongbookError::ReferenceCycle(block.name().to_string()));
                    }
                    block = self.block_named(&reference.target).ok_or_else(|| {
                        SongbookError::UnresolvedReference {
                            block: block.name().to_string(),
                            target: reference.target.clone(),
                        }
                    })?;
                }
                BlockKind::Empty => {
                    return Err(SongbookError::WrongKind {
                        name: block.name().to_string(),
                        expected: "contents",
                    })
                }
            }
        }
    }

    /// Normalize and validate the whole song (see the module docs)
    pub fn cleanup(&mut self) -> Result<()> {
        let (names, index) = self.plan_cleanup()?;

        self.blocks.retain(|b| !b.is_empty());
        for (block, name) in self.blocks.iter_mut().zip(names) {
            if block.name() != name {
                tracing::debug!(%name, "cleanup named block");
                block.set_name(name);
            }
            block.cleanup();
        }
        self.index = index;
        Ok(())
    }

    /// Names for every surviving block and the index they form
    fn plan_cleanup(&self) -> Result<(Vec<String>, BlockIndex)> {
        let kept = || self.blocks.iter().filter(|b| !b.is_empty());
        let explicit: HashSet<&str> = kept()
            .map(Block::name)
            .filter(|name| !name.is_empty())
            .collect();

        let mut index = BlockIndex::new();
        let mut names = Vec::new();
        let mut next = 0;
        for block in kept() {
            let name = if block.name().is_empty() {
                let (n, name) =
                    auto_name_from(next, |c| index.contains(c) || explicit.contains(c));
                next = n + 1;
                name
            } else {
                block.name().to_string()
            };
            index.insert(&name, block.id())?;
            names.push(name);
        }

        for (block, name) in kept().zip(&names) {
            if let Some(target) = block.target() {
                if !index.contains(target) {
                    return Err(SongbookError::UnresolvedReference {
                        block: name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        Ok((names, index))
    }
}
