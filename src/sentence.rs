//! Sentences: the owning containers for tokens and chunks.

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::reference::{ChunkReference, TokenReference};
use crate::token::Token;

/// A sentence owns its token arena and its chunk sequence.
///
/// Tokens are owned exactly once, here; chunks index into the arena. The
/// flat token sequence is the concatenation of all chunks' tokens, in order,
/// whenever chunks are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence id, unique within the owning document.
    pub sid: i32,
    pub name: String,
    tokens: Vec<Token>,
    chunks: Vec<Chunk>,
    chunk_positions: Vec<usize>,
    quote_depth: i32,
}

impl Sentence {
    pub fn new(sid: i32) -> Self {
        Self {
            sid,
            ..Default::default()
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, tid: usize) -> Option<&Token> {
        self.tokens.get(tid)
    }

    pub fn token_mut(&mut self, tid: usize) -> Option<&mut Token> {
        self.tokens.get_mut(tid)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, cid: usize) -> Option<&Chunk> {
        self.chunks.get(cid)
    }

    pub fn chunk_mut(&mut self, cid: usize) -> Option<&mut Chunk> {
        self.chunks.get_mut(cid)
    }

    pub(crate) fn chunks_vec_mut(&mut self) -> &mut Vec<Chunk> {
        &mut self.chunks
    }

    /// Start offset (in characters) of each chunk, filled in by
    /// [`Sentence::finalize`].
    pub fn chunk_positions(&self) -> &[usize] {
        &self.chunk_positions
    }

    /// Append a chunk, assigning it the next `cid`.
    pub fn push_chunk(&mut self, mut chunk: Chunk) -> usize {
        let cid = self.chunks.len();
        chunk.sid = self.sid;
        chunk.cid = cid as i32;
        self.chunks.push(chunk);
        cid
    }

    /// Append a token to the flat sequence only, for documents without
    /// chunk structure.
    pub fn push_token(&mut self, mut token: Token) -> TokenReference {
        let tid = self.tokens.len();
        token.sid = self.sid;
        token.tid = tid as i32;
        self.tokens.push(token);
        TokenReference::new(self.sid, tid as i32)
    }

    /// Append a token to the given chunk and to the flat sequence.
    ///
    /// The chunk must be the sentence's last: appending anywhere else would
    /// break token contiguity, which is a construction error.
    pub fn add_token(&mut self, cid: usize, mut token: Token) -> TokenReference {
        assert!(
            cid + 1 == self.chunks.len(),
            "tokens must be appended to the sentence's last chunk"
        );
        let tid = self.tokens.len();
        token.sid = self.sid;
        token.tid = tid as i32;

        if token.surface == "「" {
            self.quote_depth += 1;
        } else if token.surface == "」" {
            self.quote_depth -= 1;
        }
        let depth = self.quote_depth;

        let chunk = &mut self.chunks[cid];
        chunk.on_add_token(&token);
        chunk.push_token_id(tid);
        chunk.in_quote = depth;

        self.tokens.push(token);
        TokenReference::new(self.sid, tid as i32)
    }

    /// Resolve `link_id`s into `link`/`reverse_links` and compute the
    /// derived per-chunk state. Safe to call again: links and reverse links
    /// are rebuilt from scratch, never appended to.
    pub fn finalize(&mut self) {
        let n = self.chunks.len() as i32;
        let sid = self.sid;
        for chunk in &mut self.chunks {
            chunk.link = if chunk.link_id >= 0 && chunk.link_id < n {
                Some(ChunkReference::new(sid, chunk.link_id))
            } else {
                None
            };
            chunk.reverse_links.clear();
        }
        for cid in 0..self.chunks.len() {
            if let Some(target) = self.chunks[cid].link {
                let source = self.chunks[cid].reference();
                self.chunks[target.cid as usize].reverse_links.push(source);
            }
        }
        self.refresh_derived();
    }

    /// Rebuild the chunk offset table, per-chunk derived attributes, and the
    /// first-mention mark.
    pub(crate) fn refresh_derived(&mut self) {
        self.chunk_positions.clear();
        let mut position = 0;
        for cid in 0..self.chunks.len() {
            self.chunk_positions.push(position);
            position += self.chunks[cid]
                .token_ids()
                .iter()
                .map(|&tid| self.tokens[tid].char_len())
                .sum::<usize>();
            self.chunks[cid].refresh_attrs(&self.tokens);
        }

        for chunk in &mut self.chunks {
            chunk.first_mentioned = false;
        }
        let first = (0..self.chunks.len()).find(|&cid| self.chunks[cid].is_antecedent_candidate(self));
        if let Some(cid) = first {
            self.chunks[cid].first_mentioned = true;
        }
    }

    /// The chunk containing the token with the given `tid`.
    pub fn chunk_from_token(&self, tid: usize) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| {
            let ids = chunk.token_ids();
            match (ids.first(), ids.last()) {
                (Some(&first), Some(&last)) => first <= tid && tid <= last,
                _ => false,
            }
        })
    }

    /// Same-sentence chunks depending on the given chunk.
    pub fn reverse_link_chunks<'a>(&'a self, chunk: &'a Chunk) -> impl Iterator<Item = &'a Chunk> + 'a {
        chunk
            .reverse_links
            .iter()
            .filter(move |r| r.sid == self.sid)
            .filter_map(move |r| self.chunks.get(r.cid as usize))
    }

    pub fn surface(&self) -> String {
        self.tokens.iter().map(|t| t.surface.as_str()).collect()
    }

    /// Surface length in characters.
    pub fn char_len(&self) -> usize {
        self.tokens.iter().map(Token::char_len).sum()
    }
}
