//! Hierarchical annotated-corpus model with chunk alignment and
//! cross-segmentation reference projection.
//!
//! Documents are sentence sequences; sentences own dependency-linked phrase
//! chunks over a flat token arena; typed relations (coreference,
//! predicate-argument, semantic role) connect tokens across sentence and
//! document boundaries through non-owning references.
//!
//! ## Structural model
//!
//! - [`Document`] / [`Sentence`] / [`Chunk`] / [`Token`] - the container
//!   hierarchy; sentences own both arenas, chunks index into them
//! - [`Reference`] ([`ChunkReference`], [`TokenReference`],
//!   [`ExoReference`]) - totally ordered, non-owning coordinates
//! - [`Relation`] / [`RelationLabel`] - labeled edges anchored at tokens
//!
//! ## Alignment
//!
//! - [`ChunkMerger`] - rewrites one document's chunk segmentation to mirror
//!   an independently chunked annotation of the same text, reporting
//!   alignment quality in a [`MergeReport`]
//! - [`ReferenceProjector`] - maps a reference valid in one segmentation
//!   into the equivalent reference in another, by cumulative character
//!   offsets
//!
//! Loaders and writers for concrete corpus formats, persistence, and
//! statistics live outside this crate; they produce and consume the model
//! defined here.
//!
//! ## Example
//!
//! ```
//! use layered_corpus::{Chunk, Document, Reference, Sentence, Token, TokenReference};
//!
//! let mut sentence = Sentence::new(0);
//! let cid = sentence.push_chunk(Chunk::new());
//! sentence.add_token(cid, Token::new("太郎"));
//! sentence.add_token(cid, Token::new("は"));
//! sentence.finalize();
//!
//! let mut doc = Document::with_name("sample");
//! doc.push_sentence(sentence);
//!
//! let entity = doc.resolve(&Reference::Token(TokenReference::new(0, 1)));
//! assert_eq!(entity.unwrap().as_token().unwrap().surface, "は");
//! ```

mod chunk;
mod document;
mod merge;
mod project;
mod reference;
mod relation;
mod sentence;
mod token;

pub use chunk::{Chunk, ChunkKind};
pub use document::{Document, Entity};
pub use merge::{ChunkMerger, MergeError, MergeReport};
pub use project::{ConvertMode, ReferenceProjector};
pub use reference::{ChunkReference, ExoReference, Reference, TokenReference};
pub use relation::{AnnotationScheme, LinkType, Relation, RelationKind, RelationLabel};
pub use sentence::Sentence;
pub use token::{NamedEntity, PartOfSpeech, PosCategory, Token};
