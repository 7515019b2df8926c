//! Blocks: the named units a song is made of
//!
//! A block is either literal content, a reference to another block of the
//! same song (a repeated chorus, say), or an empty placeholder an editor shows
//! for a song that has no blocks yet. Placeholders never survive cleanup.

use super::line::{assign_unique_keys, Line};
use super::merge::align;
use crate::error::{Result, SongbookError};
use crate::raw::{RawBlock, RawContents, RawReference};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of generated block names
pub const AUTO_NAME_PREFIX: &str = "_ab_";

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a block, stable across renames and moves
///
/// Structural edits on a [`Song`](crate::Song) take block ids as anchors, so
/// a block can be addressed even while its name is still empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    fn next() -> Self {
        BlockId(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Literal song content: an ordered run of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contents {
    pub lines: Vec<Line>,
}

impl Contents {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// One lyrics-only line per `\n`-separated line of `text`
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n').map(Line::from_text).collect())
    }

    /// Partition the lines before `before` and from `before` on
    pub fn split(&self, before: usize) -> Result<(Contents, Contents)> {
        if before >= self.lines.len() {
            return Err(SongbookError::NotFound(format!("line {}", before)));
        }
        let (head, tail) = self.lines.split_at(before);
        Ok((Contents::new(head.to_vec()), Contents::new(tail.to_vec())))
    }

    pub fn delete_line(&mut self, at: usize) -> Result<Line> {
        if at >= self.lines.len() {
            return Err(SongbookError::NotFound(format!("line {}", at)));
        }
        Ok(self.lines.remove(at))
    }

    /// Merge the chord line at `chord_line` into the lyric line right below it
    ///
    /// Both lines must hold exactly one segment with no chord text yet.
    /// Otherwise the merge is rejected with
    /// [`SongbookError::UnsupportedMerge`] and nothing changes.
    pub fn merge_chords(&mut self, chord_line: usize) -> Result<()> {
        let lyric_line = chord_line
            .checked_add(1)
            .filter(|&at| at < self.lines.len())
            .ok_or_else(|| SongbookError::NotFound(format!("line after {}", chord_line)))?;

        let chords = &self.lines[chord_line];
        let lyrics = &self.lines[lyric_line];
        let (Some(chord_text), Some(lyric_text)) = (chords.plain_text(), lyrics.plain_text()) else {
            let err = SongbookError::UnsupportedMerge {
                chord_segments: chords.segments.len(),
                lyric_segments: lyrics.segments.len(),
            };
            tracing::warn!(chord_line, %err, "chord merge rejected");
            return Err(err);
        };

        let merged = Line::new(align(chord_text, lyric_text));
        self.lines
            .splice(chord_line..=lyric_line, std::iter::once(merged));
        Ok(())
    }

    /// Unique line keys, then unique segment keys within each line
    pub fn cleanup(&mut self) {
        assign_unique_keys(self.lines.iter_mut().map(|l| &mut l.key));
        for line in &mut self.lines {
            line.cleanup();
        }
    }
}

/// A named link to another block of the same song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Contents(Contents),
    Reference(Reference),
    Empty,
}

impl BlockKind {
    fn label(&self) -> &'static str {
        match self {
            BlockKind::Contents(_) => "contents",
            BlockKind::Reference(_) => "reference",
            BlockKind::Empty => "empty",
        }
    }
}

/// A named block of a song
///
/// An empty name means "not named yet"; the owning song assigns an
/// [auto name](AUTO_NAME_PREFIX) when the block is registered or cleaned up.
#[derive(Debug)]
pub struct Block {
    id: BlockId,
    name: String,
    kind: BlockKind,
}

impl Block {
    pub fn new(name: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: BlockId::next(),
            name: name.into(),
            kind,
        }
    }

    pub fn contents(name: impl Into<String>, lines: Vec<Line>) -> Self {
        Self::new(name, BlockKind::Contents(Contents::new(lines)))
    }

    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            BlockKind::Reference(Reference {
                target: target.into(),
            }),
        )
    }

    /// An unnamed placeholder awaiting input
    pub fn empty() -> Self {
        Self::new("", BlockKind::Empty)
    }

    /// A contents block built from free text, one line per `\n`
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, BlockKind::Contents(Contents::from_text(text)))
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Generated names are hidden from readers of the song
    pub fn is_auto_named(&self) -> bool {
        self.name.starts_with(AUTO_NAME_PREFIX)
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, BlockKind::Empty)
    }

    pub fn as_contents(&self) -> Option<&Contents> {
        match &self.kind {
            BlockKind::Contents(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable lines of a contents block, `WrongKind` for anything else
    pub fn contents_mut(&mut self) -> Result<&mut Contents> {
        match &mut self.kind {
            BlockKind::Contents(c) => Ok(c),
            other => {
                tracing::debug!(kind = other.label(), "contents edit on non-contents block");
                Err(SongbookError::WrongKind {
                    name: self.name.clone(),
                    expected: "contents",
                })
            }
        }
    }

    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Reference(r) => Some(&r.target),
            _ => None,
        }
    }

    /// Split a contents block before line `before`
    ///
    /// The first half keeps this block's name, the second is unnamed.
    pub fn split(&self, before: usize) -> Result<(Block, Block)> {
        let contents = self.as_contents().ok_or_else(|| SongbookError::WrongKind {
            name: self.name.clone(),
            expected: "contents",
        })?;
        let (head, tail) = contents.split(before)?;
        Ok((
            Block::new(self.name.clone(), BlockKind::Contents(head)),
            Block::new("", BlockKind::Contents(tail)),
        ))
    }

    /// Per-variant cleanup of the block's own payload
    pub(crate) fn cleanup(&mut self) {
        match &mut self.kind {
            BlockKind::Contents(c) => c.cleanup(),
            BlockKind::Reference(_) | BlockKind::Empty => {}
        }
    }

    pub fn from_raw(raw: RawBlock) -> Self {
        match raw {
            RawBlock::Reference(r) => Block::reference(r.name, r.target),
            RawBlock::Contents(c) => Block::contents(
                c.name,
                c.lines.into_iter().map(Line::from_raw).collect(),
            ),
        }
    }

    /// Raw form of the block; placeholders have none
    pub fn to_raw(&self) -> Option<RawBlock> {
        match &self.kind {
            BlockKind::Contents(c) => Some(RawBlock::Contents(RawContents {
                name: self.name.clone(),
                lines: c.lines.iter().map(Line::to_raw).collect(),
            })),
            BlockKind::Reference(r) => Some(RawBlock::Reference(RawReference {
                name: self.name.clone(),
                target: r.target.clone(),
            })),
            BlockKind::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    fn numbered(n: usize) -> Vec<Line> {
        (0..n).map(|i| Line::from_text(format!("line {}", i))).collect()
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = Block::empty();
        let b = Block::empty();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_from_text() {
        let block = Block::from_text("verse", "one\ntwo\n");
        let lines = &block.as_contents().unwrap().lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].sole_text(), Some("two"));
        assert_eq!(lines[2].sole_text(), Some(""));
    }

    #[test]
    fn test_split() {
        let block = Block::contents("verse", numbered(4));
        let (first, second) = block.split(2).unwrap();

        assert_eq!(first.name(), "verse");
        assert_eq!(second.name(), "");
        let first_lines = &first.as_contents().unwrap().lines;
        let second_lines = &second.as_contents().unwrap().lines;
        assert_eq!(first_lines.len(), 2);
        assert_eq!(second_lines.len(), 2);
        assert_eq!(first_lines[1].text(), "line 1");
        assert_eq!(second_lines[0].text(), "line 2");
    }

    #[test]
    fn test_split_missing_line() {
        let block = Block::contents("verse", numbered(2));
        assert!(matches!(block.split(2), Err(SongbookError::NotFound(_))));

        let reference = Block::reference("again", "verse");
        assert!(matches!(
            reference.split(0),
            Err(SongbookError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_merge_chords() {
        let mut contents = Contents::from_text("intro\nC G\nAb Cd\noutro");
        contents.merge_chords(1).unwrap();

        assert_eq!(contents.lines.len(), 3);
        assert_eq!(
            contents.lines[1].segments,
            vec![Segment::with_chord("C ", "Ab"), Segment::with_chord("G", " Cd")]
        );
        assert_eq!(contents.lines[2].text(), "outro");
    }

    #[test]
    fn test_merge_rejects_multi_segment_lines() {
        let mut contents = Contents::from_text("C G\nAb Cd");
        contents.lines[1].segments.push(Segment::lyrics("!"));
        let before = contents.clone();

        let err = contents.merge_chords(0).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(
            err,
            SongbookError::UnsupportedMerge {
                chord_segments: 1,
                lyric_segments: 2
            }
        ));
        assert_eq!(contents, before);
    }

    #[test]
    fn test_merge_rejects_lines_with_chords() {
        let mut contents = Contents::from_text("C G\nla la");
        contents.lines[1].segments[0].chord = Some("G".to_string());
        let before = contents.clone();

        let err = contents.merge_chords(0).unwrap_err();
        assert!(matches!(
            err,
            SongbookError::UnsupportedMerge {
                chord_segments: 1,
                lyric_segments: 1
            }
        ));
        assert_eq!(contents, before);

        // An empty chord slot is still plain text
        contents.lines[1].segments[0].chord = Some(String::new());
        contents.merge_chords(0).unwrap();
        assert_eq!(contents.lines.len(), 1);
    }

    #[test]
    fn test_merge_needs_a_following_line() {
        let mut contents = Contents::from_text("C G");
        assert!(matches!(
            contents.merge_chords(0),
            Err(SongbookError::NotFound(_))
        ));
        assert!(matches!(
            contents.merge_chords(usize::MAX),
            Err(SongbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_line() {
        let mut contents = Contents::new(numbered(3));
        let removed = contents.delete_line(1).unwrap();
        assert_eq!(removed.text(), "line 1");
        assert_eq!(contents.lines.len(), 2);
        assert!(contents.delete_line(2).is_err());
    }

    #[test]
    fn test_contents_cleanup_assigns_line_and_segment_keys() {
        let mut contents = Contents::new(numbered(3));
        contents.lines[0].key = Some(1);
        contents.cleanup();

        let keys: Vec<_> = contents.lines.iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![Some(1), Some(0), Some(2)]);
        assert!(contents
            .lines
            .iter()
            .all(|l| l.segments[0].key == Some(0)));
    }

    #[test]
    fn test_contents_mut_on_reference() {
        let mut block = Block::reference("again", "verse");
        assert!(matches!(
            block.contents_mut(),
            Err(SongbookError::WrongKind { expected: "contents", .. })
        ));
    }

    #[test]
    fn test_auto_named() {
        assert!(Block::contents("_ab_3", vec![]).is_auto_named());
        assert!(!Block::contents("chorus", vec![]).is_auto_named());
    }

    #[test]
    fn test_empty_has_no_raw_form() {
        assert!(Block::empty().to_raw().is_none());
    }
}
