//! Song content model
//!
//! Leaf-first: [`Segment`]s make up [`Line`]s, lines make up the
//! [`Contents`] of a [`Block`]. Blocks are the unit a
//! [`Song`](crate::Song) arranges, names and references.

mod block;
mod line;
mod merge;
mod segment;

pub use block::{Block, BlockId, BlockKind, Contents, Reference, AUTO_NAME_PREFIX};
pub use line::{Line, LineLayout};
pub use merge::align;
pub use segment::Segment;
