//! Reference projection across independent segmentations.
//!
//! Maps a chunk/token coordinate valid in one document into the
//! corresponding coordinate of a second document covering the same text but
//! segmented differently, by matching cumulative character offsets. A miss
//! (diverged or truncated text) yields the null coordinate, never an error.

use crate::chunk::Chunk;
use crate::document::Document;
use crate::reference::{ChunkReference, Reference, TokenReference};
use crate::sentence::Sentence;
use crate::token::Token;

/// Which end of the referenced entity anchors the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    /// Project the start offset; select the first destination entity whose
    /// window extends past it.
    Head,
    /// Project the end offset (the entity's own length is included); select
    /// the first destination entity whose window reaches it.
    Tail,
}

fn char_length(token: &Token) -> usize {
    token.char_len()
}

/// Projects references from a source document into a destination document.
///
/// The length function defaults to character counting; a caller-supplied
/// function substitutes alternate weighting (chunk and sentence lengths are
/// sums of token measures). `same_sentence` restricts the destination walk
/// to the sentence with the same `sid`, for inputs whose sentence
/// segmentation is already aligned.
pub struct ReferenceProjector<'a, F = fn(&Token) -> usize> {
    dest: &'a Document,
    src: &'a Document,
    length: F,
    same_sentence: bool,
}

impl<'a> ReferenceProjector<'a> {
    pub fn new(dest: &'a Document, src: &'a Document) -> Self {
        Self {
            dest,
            src,
            length: char_length,
            same_sentence: false,
        }
    }
}

impl<'a, F: Fn(&Token) -> usize> ReferenceProjector<'a, F> {
    pub fn with_length(dest: &'a Document, src: &'a Document, length: F) -> Self {
        Self {
            dest,
            src,
            length,
            same_sentence: false,
        }
    }

    pub fn same_sentence(mut self, same_sentence: bool) -> Self {
        self.same_sentence = same_sentence;
        self
    }

    /// Project a reference. The result is the same flavor of reference;
    /// misses come back with null coordinates, exophoric references pass
    /// through unchanged.
    pub fn convert(&self, reference: &Reference, mode: ConvertMode) -> Reference {
        match reference {
            Reference::Chunk(r) => Reference::Chunk(self.convert_chunk(*r, mode)),
            Reference::Token(r) => Reference::Token(self.convert_token(*r, mode)),
            Reference::Sentence(sid) => Reference::Sentence(self.convert_sentence(*sid, mode)),
            Reference::Exo(e) => Reference::Exo(e.clone()),
        }
    }

    fn token_len(&self, token: &Token) -> usize {
        (self.length)(token)
    }

    fn sentence_len(&self, sentence: &Sentence) -> usize {
        sentence.tokens().iter().map(|t| (self.length)(t)).sum()
    }

    fn chunk_len(&self, sentence: &Sentence, chunk: &Chunk) -> usize {
        chunk.tokens(sentence).map(|t| (self.length)(t)).sum()
    }

    fn window_hit(&self, running: usize, len: usize, target: usize, mode: ConvertMode) -> bool {
        match mode {
            ConvertMode::Head => running + len > target,
            ConvertMode::Tail => running + len >= target,
        }
    }

    fn convert_token(&self, reference: TokenReference, mode: ConvertMode) -> TokenReference {
        if self.src.token_by_ref(reference).is_none() {
            return TokenReference::null();
        }
        if self.same_sentence {
            let (Some(src_sentence), Some(dest_sentence)) = (
                self.src.sentence(reference.sid),
                self.dest.sentence(reference.sid),
            ) else {
                return TokenReference::null();
            };
            let offset = self.token_offset_within(src_sentence, reference.tid, mode);
            return self.walk_sentence_tokens(dest_sentence, offset, mode);
        }

        let mut offset = 0;
        for sentence in self.src.sentences() {
            if sentence.sid == reference.sid {
                offset += self.token_offset_within(sentence, reference.tid, mode);
                break;
            }
            offset += self.sentence_len(sentence);
        }

        let mut running = 0;
        for sentence in self.dest.sentences() {
            let len = self.sentence_len(sentence);
            if self.window_hit(running, len, offset, mode) {
                for token in sentence.tokens() {
                    let token_len = self.token_len(token);
                    if self.window_hit(running, token_len, offset, mode) {
                        return TokenReference::new(sentence.sid, token.tid);
                    }
                    running += token_len;
                }
                return TokenReference::null();
            }
            running += len;
        }
        TokenReference::null()
    }

    fn convert_chunk(&self, reference: ChunkReference, mode: ConvertMode) -> ChunkReference {
        if self.src.chunk_by_ref(reference).is_none() {
            return ChunkReference::null();
        }
        if self.same_sentence {
            let (Some(src_sentence), Some(dest_sentence)) = (
                self.src.sentence(reference.sid),
                self.dest.sentence(reference.sid),
            ) else {
                return ChunkReference::null();
            };
            let offset = self.chunk_offset_within(src_sentence, reference.cid, mode);
            let mut running = 0;
            for chunk in dest_sentence.chunks() {
                let len = self.chunk_len(dest_sentence, chunk);
                if self.window_hit(running, len, offset, mode) {
                    return ChunkReference::new(dest_sentence.sid, chunk.cid);
                }
                running += len;
            }
            return ChunkReference::null();
        }

        let mut offset = 0;
        for sentence in self.src.sentences() {
            if sentence.sid == reference.sid {
                offset += self.chunk_offset_within(sentence, reference.cid, mode);
                break;
            }
            offset += self.sentence_len(sentence);
        }

        let mut running = 0;
        for sentence in self.dest.sentences() {
            let len = self.sentence_len(sentence);
            if self.window_hit(running, len, offset, mode) {
                for chunk in sentence.chunks() {
                    let chunk_len = self.chunk_len(sentence, chunk);
                    if self.window_hit(running, chunk_len, offset, mode) {
                        return ChunkReference::new(sentence.sid, chunk.cid);
                    }
                    running += chunk_len;
                }
                return ChunkReference::null();
            }
            running += len;
        }
        ChunkReference::null()
    }

    fn convert_sentence(&self, sid: i32, mode: ConvertMode) -> i32 {
        if self.src.sentence(sid).is_none() {
            return -1;
        }
        if self.same_sentence {
            return if self.dest.sentence(sid).is_some() { sid } else { -1 };
        }

        let mut offset = 0;
        for sentence in self.src.sentences() {
            if sentence.sid == sid {
                if mode == ConvertMode::Tail {
                    offset += self.sentence_len(sentence);
                }
                break;
            }
            offset += self.sentence_len(sentence);
        }

        let mut running = 0;
        for sentence in self.dest.sentences() {
            let len = self.sentence_len(sentence);
            if self.window_hit(running, len, offset, mode) {
                return sentence.sid;
            }
            running += len;
        }
        -1
    }

    /// Offset of a token within its sentence; tail mode includes the
    /// token's own length.
    fn token_offset_within(&self, sentence: &Sentence, tid: i32, mode: ConvertMode) -> usize {
        let mut offset = 0;
        for token in sentence.tokens() {
            if token.tid == tid {
                if mode == ConvertMode::Tail {
                    offset += self.token_len(token);
                }
                break;
            }
            offset += self.token_len(token);
        }
        offset
    }

    fn chunk_offset_within(&self, sentence: &Sentence, cid: i32, mode: ConvertMode) -> usize {
        let mut offset = 0;
        for chunk in sentence.chunks() {
            if chunk.cid == cid {
                if mode == ConvertMode::Tail {
                    offset += self.chunk_len(sentence, chunk);
                }
                break;
            }
            offset += self.chunk_len(sentence, chunk);
        }
        offset
    }

    fn walk_sentence_tokens(
        &self,
        sentence: &Sentence,
        offset: usize,
        mode: ConvertMode,
    ) -> TokenReference {
        let mut running = 0;
        for token in sentence.tokens() {
            let len = self.token_len(token);
            if self.window_hit(running, len, offset, mode) {
                return TokenReference::new(sentence.sid, token.tid);
            }
            running += len;
        }
        TokenReference::null()
    }
}
