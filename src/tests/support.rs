//! Shared builders for the cross-module tests.

use crate::chunk::Chunk;
use crate::document::Document;
use crate::sentence::Sentence;
use crate::token::{PartOfSpeech, PosCategory, Token};

pub fn noun(surface: &str) -> Token {
    let mut token = Token::new(surface);
    token.pos = PartOfSpeech::new(PosCategory::Noun);
    token.is_content = true;
    token
}

pub fn verb(surface: &str) -> Token {
    let mut token = Token::new(surface);
    token.pos = PartOfSpeech::new(PosCategory::Verb);
    token.is_content = true;
    token
}

pub fn particle(surface: &str, attr1: &str) -> Token {
    let mut token = Token::new(surface);
    token.pos = PartOfSpeech::with_attrs(PosCategory::Particle, attr1, "*");
    token
}

/// A finalized sentence built from `(tokens, link_id)` chunk specs.
pub fn sentence_with_chunks(sid: i32, chunks: Vec<(Vec<Token>, i32)>) -> Sentence {
    let mut sentence = Sentence::new(sid);
    for (tokens, link_id) in chunks {
        let mut chunk = Chunk::new();
        chunk.link_id = link_id;
        let cid = sentence.push_chunk(chunk);
        for token in tokens {
            sentence.add_token(cid, token);
        }
    }
    sentence.finalize();
    sentence
}

/// A sentence holding a flat token sequence with no chunk structure.
pub fn token_sentence(sid: i32, surfaces: &[&str]) -> Sentence {
    let mut sentence = Sentence::new(sid);
    for surface in surfaces {
        sentence.push_token(Token::new(*surface));
    }
    sentence
}

/// A chunkless document, one entry per sentence.
pub fn token_document(name: &str, sentences: &[&[&str]]) -> Document {
    let mut doc = Document::with_name(name);
    for (sid, surfaces) in sentences.iter().enumerate() {
        doc.push_sentence(token_sentence(sid as i32, surfaces));
    }
    doc
}

/// 太郎はプリウスを買った as one fully annotated sentence:
/// [太郎|は] -> [買っ|た] <- [プリウス|を].
pub fn taro_annotation(name: &str) -> Document {
    let mut doc = Document::with_name(name);
    doc.push_sentence(sentence_with_chunks(
        0,
        vec![
            (vec![noun("太郎"), particle("は", "係助詞")], 2),
            (vec![noun("プリウス"), particle("を", "格助詞")], 2),
            (vec![verb("買っ"), particle("た", "*")], -1),
        ],
    ));
    doc
}

/// The same text as [`taro_annotation`], tokenized identically but with no
/// chunk structure.
pub fn taro_source(name: &str) -> Document {
    token_document(name, &[&["太郎", "は", "プリウス", "を", "買っ", "た"]])
}
