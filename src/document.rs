//! Documents: named sentence sequences with reference resolution and
//! character-offset arithmetic.

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::reference::{ChunkReference, Reference, TokenReference};
use crate::relation::{Relation, RelationKind};
use crate::sentence::Sentence;
use crate::token::Token;

/// A resolved reference: a borrowed entity from the document tree.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Sentence(&'a Sentence),
    Chunk(&'a Chunk),
    Token(&'a Token),
}

impl<'a> Entity<'a> {
    pub fn as_sentence(&self) -> Option<&'a Sentence> {
        match self {
            Entity::Sentence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_chunk(&self) -> Option<&'a Chunk> {
        match self {
            Entity::Chunk(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&'a Token> {
        match self {
            Entity::Token(t) => Some(t),
            _ => None,
        }
    }
}

/// An ordered sequence of sentences with a corpus-level name.
///
/// All lookups are bounds-checked and return `None` for coordinates that do
/// not resolve; callers routinely probe speculative references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sentences: Vec::new(),
        }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub(crate) fn sentences_mut(&mut self) -> &mut [Sentence] {
        &mut self.sentences
    }

    /// Append a sentence. Sentence ids must be unique within a document;
    /// a duplicate is a construction error.
    pub fn push_sentence(&mut self, sentence: Sentence) {
        assert!(
            self.sentence(sentence.sid).is_none(),
            "duplicate sentence id {} in document {:?}",
            sentence.sid,
            self.name
        );
        self.sentences.push(sentence);
    }

    /// The sentence with the given id, searched by `sid` value.
    pub fn sentence(&self, sid: i32) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.sid == sid)
    }

    pub fn sentence_mut(&mut self, sid: i32) -> Option<&mut Sentence> {
        self.sentences.iter_mut().find(|s| s.sid == sid)
    }

    /// Dereference a coordinate. Out-of-range coordinates and exophoric
    /// references resolve to `None`, never an error.
    pub fn resolve(&self, reference: &Reference) -> Option<Entity<'_>> {
        match reference {
            Reference::Sentence(sid) => self.sentence(*sid).map(Entity::Sentence),
            Reference::Chunk(r) => self.chunk_by_ref(*r).map(Entity::Chunk),
            Reference::Token(r) => self.token_by_ref(*r).map(Entity::Token),
            Reference::Exo(_) => None,
        }
    }

    pub fn chunk_by_ref(&self, reference: ChunkReference) -> Option<&Chunk> {
        let cid = usize::try_from(reference.cid).ok()?;
        self.sentence(reference.sid)?.chunk(cid)
    }

    pub fn token_by_ref(&self, reference: TokenReference) -> Option<&Token> {
        let tid = usize::try_from(reference.tid).ok()?;
        self.sentence(reference.sid)?.token(tid)
    }

    /// The chunk containing the referenced token.
    pub fn chunk_ref_from_token_ref(&self, reference: TokenReference) -> Option<ChunkReference> {
        let tid = usize::try_from(reference.tid).ok()?;
        self.sentence(reference.sid)?
            .chunk_from_token(tid)
            .map(Chunk::reference)
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens().iter())
    }

    /// All chunks in document order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.sentences.iter().flat_map(|s| s.chunks().iter())
    }

    /// Start offset, in characters, of the referenced entity within the
    /// document. `None` when the reference does not resolve.
    pub fn position_of(&self, reference: &Reference) -> Option<usize> {
        match reference {
            Reference::Sentence(sid) => {
                self.sentence(*sid)?;
                let mut offset = 0;
                for sentence in &self.sentences {
                    if sentence.sid == *sid {
                        return Some(offset);
                    }
                    offset += sentence.char_len();
                }
                None
            }
            Reference::Chunk(r) => {
                let chunk = self.chunk_by_ref(*r)?;
                let sentence = self.sentence(r.sid)?;
                let mut offset = 0;
                for s in &self.sentences {
                    if s.sid == r.sid {
                        break;
                    }
                    offset += s.chunks().iter().map(|c| c.char_len(s)).sum::<usize>();
                }
                offset += sentence
                    .chunks()
                    .iter()
                    .take(chunk.cid as usize)
                    .map(|c| c.char_len(sentence))
                    .sum::<usize>();
                Some(offset)
            }
            Reference::Token(r) => {
                self.token_by_ref(*r)?;
                let mut offset = 0;
                for s in &self.sentences {
                    if s.sid == r.sid {
                        break;
                    }
                    offset += s.char_len();
                }
                offset += self
                    .sentence(r.sid)?
                    .tokens()
                    .iter()
                    .take(r.tid as usize)
                    .map(Token::char_len)
                    .sum::<usize>();
                Some(offset)
            }
            Reference::Exo(_) => None,
        }
    }

    /// The sentence whose character window contains the offset.
    pub fn sentence_at(&self, offset: usize) -> Option<&Sentence> {
        let mut total = 0;
        for sentence in &self.sentences {
            let len = sentence.char_len();
            if total + len > offset {
                return Some(sentence);
            }
            total += len;
        }
        None
    }

    /// The chunk whose character window contains the offset.
    pub fn chunk_at(&self, offset: usize) -> Option<&Chunk> {
        let mut total = 0;
        for sentence in &self.sentences {
            for chunk in sentence.chunks() {
                let len = chunk.char_len(sentence);
                if total + len > offset {
                    return Some(chunk);
                }
                total += len;
            }
        }
        None
    }

    /// The token whose character window contains the offset.
    pub fn token_at(&self, offset: usize) -> Option<&Token> {
        let mut total = 0;
        for token in self.tokens() {
            let len = token.char_len();
            if total + len > offset {
                return Some(token);
            }
            total += len;
        }
        None
    }

    /// The first chunk of the sentence starting at or after the given
    /// sentence-local offset, via the offset table built by
    /// [`Sentence::finalize`].
    pub fn chunk_from_char_offset(&self, sid: i32, offset: usize) -> Option<&Chunk> {
        let sentence = self.sentence(sid)?;
        for (cid, &position) in sentence.chunk_positions().iter().enumerate() {
            if position >= offset {
                return sentence.chunk(cid);
            }
        }
        None
    }

    /// Surface of each sentence, in order.
    pub fn surfaces(&self) -> Vec<String> {
        self.sentences.iter().map(Sentence::surface).collect()
    }

    /// Surface length of the whole document in characters.
    pub fn char_len(&self) -> usize {
        self.sentences.iter().map(Sentence::char_len).sum()
    }

    /// All coreference relations anchored at this document's tokens.
    pub fn coreference_labels(&self) -> Vec<Relation> {
        self.tokens()
            .flat_map(|t| t.relations_of(RelationKind::Coreference))
            .cloned()
            .collect()
    }

    /// All predicate-argument and semantic-role relations anchored at this
    /// document's tokens, labels normalized.
    pub fn predicate_labels(&self) -> Vec<Relation> {
        self.tokens()
            .flat_map(|t| t.relations())
            .filter(|r| r.kind() != RelationKind::Coreference)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ExoReference;

    fn two_sentence_doc() -> Document {
        let mut doc = Document::with_name("doc");
        let mut s0 = Sentence::new(0);
        s0.push_token(Token::new("太郎"));
        s0.push_token(Token::new("は"));
        doc.push_sentence(s0);
        let mut s1 = Sentence::new(1);
        s1.push_token(Token::new("寝"));
        s1.push_token(Token::new("た"));
        doc.push_sentence(s1);
        doc
    }

    #[test]
    fn resolve_is_bounds_checked() {
        let doc = two_sentence_doc();
        assert!(doc
            .resolve(&Reference::Token(TokenReference::new(0, 1)))
            .is_some());
        assert!(doc
            .resolve(&Reference::Token(TokenReference::new(0, 2)))
            .is_none());
        assert!(doc
            .resolve(&Reference::Token(TokenReference::new(5, 0)))
            .is_none());
        assert!(doc
            .resolve(&Reference::Chunk(ChunkReference::new(0, 0)))
            .is_none());
        assert!(doc.resolve(&Reference::Sentence(1)).is_some());
        assert!(doc
            .resolve(&Reference::Exo(ExoReference::default()))
            .is_none());
    }

    #[test]
    fn position_of_sums_preceding_lengths() {
        let doc = two_sentence_doc();
        let position = |sid, tid| {
            doc.position_of(&Reference::Token(TokenReference::new(sid, tid)))
        };
        assert_eq!(position(0, 0), Some(0));
        assert_eq!(position(0, 1), Some(2));
        assert_eq!(position(1, 0), Some(3));
        assert_eq!(position(1, 1), Some(4));
        assert_eq!(position(2, 0), None);
        assert_eq!(doc.position_of(&Reference::Sentence(1)), Some(3));
    }

    #[test]
    fn token_at_walks_windows() {
        let doc = two_sentence_doc();
        assert_eq!(doc.token_at(0).unwrap().surface, "太郎");
        assert_eq!(doc.token_at(1).unwrap().surface, "太郎");
        assert_eq!(doc.token_at(2).unwrap().surface, "は");
        assert_eq!(doc.token_at(4).unwrap().surface, "た");
        assert!(doc.token_at(5).is_none());
        assert_eq!(doc.sentence_at(3).unwrap().sid, 1);
    }

    #[test]
    #[should_panic(expected = "duplicate sentence id")]
    fn duplicate_sentence_ids_are_rejected() {
        let mut doc = Document::new();
        doc.push_sentence(Sentence::new(0));
        doc.push_sentence(Sentence::new(0));
    }
}
