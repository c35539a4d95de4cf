//! Phrase chunks: contiguous token spans with one outgoing dependency edge.

use serde::{Deserialize, Serialize};

use crate::reference::ChunkReference;
use crate::sentence::Sentence;
use crate::token::{PosCategory, Token};

/// Coarse classification of a chunk by its predicate-ness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkKind {
    /// Plain (nominal or other non-predicate) chunk.
    #[default]
    Elem,
    Verb,
    Adjective,
    Copula,
}

fn is_copula_conj_type(conjugation_type: &str) -> bool {
    matches!(conjugation_type, "助動詞-ダ" | "助動詞-デス")
}

fn is_copula_conj_form(conjugation_form: &str) -> bool {
    ["ダ列", "デアル列", "デス列"]
        .iter()
        .any(|prefix| conjugation_form.starts_with(prefix))
}

/// An ordered, contiguous, non-empty span of one sentence's tokens.
///
/// The chunk does not own its tokens; it indexes into the owning sentence's
/// token arena (`tid` values double as arena indices). Dependency edges are
/// plain coordinates: `link_id` for the same-sentence case, `link` for any
/// case. The two agree whenever both are set within one sentence;
/// cross-sentence dependencies (which only the merge engine creates) are
/// expressed through `link` alone, with `link_id == -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Sentence id of the owning sentence.
    pub sid: i32,
    /// Chunk id within that sentence.
    pub cid: i32,
    tokens: Vec<usize>,
    /// Index of the lexical-head token within this chunk.
    pub head_position: usize,
    /// Index where the trailing functional tokens begin.
    pub func_position: usize,
    /// Same-sentence dependency target cid, `-1` for the root chunk.
    pub link_id: i32,
    /// Dependency target, if any.
    pub link: Option<ChunkReference>,
    /// Chunks whose `link` points here.
    pub reverse_links: Vec<ChunkReference>,
    /// First antecedent-eligible chunk of its sentence.
    pub first_mentioned: bool,
    /// Quote nesting depth at this chunk.
    pub in_quote: i32,
    pub begin_paren: bool,
    pub end_paren: bool,
    pub emphasis: bool,
    /// Surface of the trailing case particle, empty when there is none.
    pub case: String,
    /// `tid` of the governing particle among the functional tokens.
    pub particle: Option<usize>,
    pub kind: ChunkKind,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            sid: 0,
            cid: 0,
            tokens: Vec::new(),
            head_position: 0,
            func_position: 0,
            link_id: -1,
            link: None,
            reverse_links: Vec::new(),
            first_mentioned: false,
            in_quote: 0,
            begin_paren: false,
            end_paren: false,
            emphasis: false,
            case: String::new(),
            particle: None,
            kind: ChunkKind::Elem,
        }
    }

    pub fn reference(&self) -> ChunkReference {
        ChunkReference::new(self.sid, self.cid)
    }

    pub fn token_num(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `tid`s of this chunk's tokens, in order.
    pub fn token_ids(&self) -> &[usize] {
        &self.tokens
    }

    pub(crate) fn push_token_id(&mut self, tid: usize) {
        self.tokens.push(tid);
    }

    /// `tid`s of the trailing functional tokens. Empty when the head and
    /// function positions coincide.
    pub fn func_token_ids(&self) -> &[usize] {
        if self.head_position == self.func_position || self.func_position >= self.tokens.len() {
            &[]
        } else {
            &self.tokens[self.func_position..]
        }
    }

    /// The tokens of this chunk, resolved against the owning sentence.
    pub fn tokens<'a>(&'a self, sentence: &'a Sentence) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.iter().map(move |&tid| &sentence.tokens()[tid])
    }

    pub fn surface(&self, sentence: &Sentence) -> String {
        self.tokens(sentence).map(|t| t.surface.as_str()).collect()
    }

    /// Surface length in characters.
    pub fn char_len(&self, sentence: &Sentence) -> usize {
        self.tokens(sentence).map(Token::char_len).sum()
    }

    /// The lexical-head token: the token at `head_position`, or the last
    /// token when the chunk has no functional tail.
    pub fn head_token<'a>(&self, sentence: &'a Sentence) -> Option<&'a Token> {
        if self.tokens.is_empty() {
            return None;
        }
        let arena = sentence.tokens();
        if self.head_position == self.func_position || self.func_position >= self.tokens.len() {
            Some(&arena[*self.tokens.last().unwrap()])
        } else {
            Some(&arena[self.tokens[self.head_position]])
        }
    }

    /// Whether this chunk can serve as an antecedent (nominal head).
    pub fn is_antecedent_candidate(&self, sentence: &Sentence) -> bool {
        self.head_token(sentence)
            .is_some_and(|t| t.pos.is_nominal())
    }

    pub fn is_conjunction(&self, sentence: &Sentence) -> bool {
        self.head_token(sentence)
            .is_some_and(|t| t.pos.category == PosCategory::Conjunction)
    }

    /// Incremental position bookkeeping for a token being appended: a
    /// content word pushes the function boundary forward, corner brackets
    /// set the quote flags.
    pub(crate) fn on_add_token(&mut self, token: &Token) {
        if token.is_content {
            self.func_position += 1;
            self.head_position = self.func_position - 1;
        }
        if token.surface == "「" {
            self.begin_paren = true;
            self.emphasis = true;
        } else if token.surface == "」" {
            self.end_paren = true;
            self.emphasis = true;
        }
    }

    /// Recompute the derived attributes (governing particle, case surface,
    /// chunk kind) from the attached tokens.
    pub(crate) fn refresh_attrs(&mut self, arena: &[Token]) {
        let mut particle = None;
        for &tid in self.func_token_ids() {
            if arena[tid].pos.is_governing_particle() {
                particle = Some(tid);
            }
        }
        self.particle = particle;
        self.case = match self.particle {
            Some(tid) if arena[tid].pos.is_case_particle() => arena[tid].surface.clone(),
            _ => String::new(),
        };

        self.kind = ChunkKind::Elem;
        for &tid in &self.tokens {
            let token = &arena[tid];
            match token.pos.category {
                PosCategory::Verb => self.kind = ChunkKind::Verb,
                PosCategory::Adjective => {
                    self.kind = ChunkKind::Adjective;
                    break;
                }
                _ => {
                    if is_copula_conj_type(&token.conjugation_type)
                        || is_copula_conj_form(&token.conjugation_form)
                    {
                        self.kind = ChunkKind::Copula;
                    }
                }
            }
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}
