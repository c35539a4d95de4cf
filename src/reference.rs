//! Non-owning coordinates into the document tree.
//!
//! A reference identifies a sentence, chunk, or token by position only and
//! carries no linguistic data. References are the currency of relations and
//! of the alignment engines: they stay meaningful while the tree they point
//! into is looked up, compared, or re-segmented.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Coordinate of a chunk: `(sid, cid)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkReference {
    /// Sentence id within the document.
    pub sid: i32,
    /// Chunk id within that sentence.
    pub cid: i32,
}

impl ChunkReference {
    pub fn new(sid: i32, cid: i32) -> Self {
        Self { sid, cid }
    }

    /// The out-of-document sentinel, `(-1, -1)`.
    pub fn null() -> Self {
        Self { sid: -1, cid: -1 }
    }

    /// Historical validity predicate: either coordinate non-negative.
    ///
    /// Note the `||`: a reference with a negative `sid` but a non-negative
    /// `cid` still counts as valid. Kept as-is for corpus compatibility.
    pub fn is_valid(&self) -> bool {
        self.sid >= 0 || self.cid >= 0
    }

    pub fn to_pair(&self) -> (i32, i32) {
        (self.sid, self.cid)
    }
}

/// Coordinate of a token: `(sid, tid)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenReference {
    /// Sentence id within the document.
    pub sid: i32,
    /// Token id within that sentence.
    pub tid: i32,
}

impl TokenReference {
    pub fn new(sid: i32, tid: i32) -> Self {
        Self { sid, tid }
    }

    /// The out-of-document sentinel, `(-1, -1)`.
    pub fn null() -> Self {
        Self { sid: -1, tid: -1 }
    }

    /// Historical validity predicate: either coordinate non-negative.
    ///
    /// Same `||` caveat as [`ChunkReference::is_valid`].
    pub fn is_valid(&self) -> bool {
        self.sid >= 0 || self.tid >= 0
    }

    pub fn to_pair(&self) -> (i32, i32) {
        (self.sid, self.tid)
    }
}

/// Reference to an entity outside the document text (an unnamed real-world
/// referent, the author, an unspecified person).
///
/// Carries a display name instead of coordinates and never resolves to a
/// tree entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExoReference {
    pub name: String,
}

impl ExoReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ExoReference {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
        }
    }
}

/// Any reference: a bare sentence id, a chunk or token coordinate, or an
/// exophoric referent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    Sentence(i32),
    Chunk(ChunkReference),
    Token(TokenReference),
    Exo(ExoReference),
}

impl Reference {
    /// Coordinate pair of this reference. Sentences use `-1` for the local
    /// id, exophoric references the `(-2, -2)` sentinel.
    pub fn to_pair(&self) -> (i32, i32) {
        match self {
            Reference::Sentence(sid) => (*sid, -1),
            Reference::Chunk(c) => c.to_pair(),
            Reference::Token(t) => t.to_pair(),
            Reference::Exo(_) => (-2, -2),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Reference::Sentence(sid) => *sid >= 0,
            Reference::Chunk(c) => c.is_valid(),
            Reference::Token(t) => t.is_valid(),
            Reference::Exo(_) => false,
        }
    }

    fn sort_key(&self) -> ((i32, i32), u8, &str) {
        match self {
            Reference::Exo(e) => (self.to_pair(), 0, e.name.as_str()),
            Reference::Sentence(_) => (self.to_pair(), 1, ""),
            Reference::Chunk(_) => (self.to_pair(), 2, ""),
            Reference::Token(_) => (self.to_pair(), 3, ""),
        }
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<ChunkReference> for Reference {
    fn from(value: ChunkReference) -> Self {
        Reference::Chunk(value)
    }
}

impl From<TokenReference> for Reference {
    fn from(value: TokenReference) -> Self {
        Reference::Token(value)
    }
}

impl From<ExoReference> for Reference {
    fn from(value: ExoReference) -> Self {
        Reference::Exo(value)
    }
}
