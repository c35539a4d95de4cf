//! Morphological tokens and their part-of-speech classification.

use serde::{Deserialize, Serialize};

use crate::reference::TokenReference;
use crate::relation::{Relation, RelationKind};

/// Major part-of-speech category.
///
/// The closed set a chunker actually branches on; tagger-specific
/// sub-classifications stay as raw strings on [`PartOfSpeech`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PosCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Adnominal,
    Conjunction,
    Particle,
    AuxiliaryVerb,
    Interjection,
    Prefix,
    Suffix,
    Symbol,
    #[default]
    Other,
}

impl PosCategory {
    /// Map a tagger's major-POS name (IPA/JUMAN/UniDic spellings).
    pub fn from_ja(name: &str) -> Self {
        match name {
            "名詞" => PosCategory::Noun,
            "動詞" => PosCategory::Verb,
            "形容詞" | "形容動詞" => PosCategory::Adjective,
            "副詞" => PosCategory::Adverb,
            "連体詞" => PosCategory::Adnominal,
            "接続詞" => PosCategory::Conjunction,
            "助詞" => PosCategory::Particle,
            "助動詞" => PosCategory::AuxiliaryVerb,
            "感動詞" | "フィラー" => PosCategory::Interjection,
            "接頭詞" | "接頭辞" => PosCategory::Prefix,
            "接尾辞" => PosCategory::Suffix,
            "記号" | "補助記号" | "特殊" => PosCategory::Symbol,
            _ => PosCategory::Other,
        }
    }
}

/// Part-of-speech classification: typed major category plus the tagger's raw
/// middle/minor sub-classifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub category: PosCategory,
    /// Middle classification as emitted by the tagger (e.g. 格助詞, サ変).
    pub attr1: String,
    /// Minor classification as emitted by the tagger.
    pub attr2: String,
}

impl PartOfSpeech {
    pub fn new(category: PosCategory) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    pub fn with_attrs(category: PosCategory, attr1: impl Into<String>, attr2: impl Into<String>) -> Self {
        Self {
            category,
            attr1: attr1.into(),
            attr2: attr2.into(),
        }
    }

    pub fn is_nominal(&self) -> bool {
        self.category == PosCategory::Noun
    }

    pub fn is_case_particle(&self) -> bool {
        self.category == PosCategory::Particle && self.attr1 == "格助詞"
    }

    /// Case, binding, or adverbial particle. JUMAN files the binding
    /// particle は under 副助詞.
    pub fn is_governing_particle(&self) -> bool {
        self.category == PosCategory::Particle
            && matches!(self.attr1.as_str(), "格助詞" | "係助詞" | "副助詞")
    }
}

/// Named-entity tag attached to a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub label: String,
    /// Position within the entity span (B/I/O style).
    pub part: String,
}

/// A morpheme: the atomic unit of the model.
///
/// Created by a loader and attached to exactly one sentence (which owns it)
/// and one chunk (which indexes it). Immutable once attached except for the
/// lazily derived fields (`is_content`, `named_entity`) and relations added
/// post-hoc.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
    /// Token id within the owning sentence; assigned on attachment.
    pub tid: i32,
    /// Sentence id of the owning sentence; assigned on attachment.
    pub sid: i32,
    pub surface: String,
    pub reading: String,
    pub base: String,
    pub pos: PartOfSpeech,
    pub conjugation_type: String,
    pub conjugation_form: String,
    pub named_entity: Option<NamedEntity>,
    /// Content word (as opposed to functional morpheme).
    pub is_content: bool,
    /// Independent word (can head a phrase on its own).
    pub is_independent: bool,
    relations: Vec<Relation>,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            ..Default::default()
        }
    }

    /// Surface length in characters (not bytes); the unit of all offset
    /// arithmetic in this crate.
    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }

    /// Coordinate of this token. Meaningful once attached to a sentence.
    pub fn reference(&self) -> TokenReference {
        TokenReference::new(self.sid, self.tid)
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relations_of(&self, kind: RelationKind) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.kind() == kind)
    }

    /// The token's coreference edge, if any.
    pub fn coreference(&self) -> Option<&Relation> {
        self.relations_of(RelationKind::Coreference).next()
    }
}
