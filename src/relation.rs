//! Labeled directed edges between references.
//!
//! A relation is anchored at an anaphor/predicate token and points at an
//! antecedent/argument reference it does not own. The label set is closed:
//! coreference, the normalized case markers, and named semantic roles.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::reference::Reference;

/// Families of relation a token can anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Coreference,
    PredicateArgument,
    SemanticRole,
}

/// Relation label.
///
/// Case-marker arguments are normalized to `Ga`/`O`/`Ni`; everything that is
/// neither a case marker nor `coref` is a semantic-role name and passes
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationLabel {
    Coref,
    Ga,
    O,
    Ni,
    Role(String),
}

// 二 (the numeral) appears in corpus annotation alongside ニ.
static CASE_LABELS: Lazy<HashMap<&'static str, RelationLabel>> = Lazy::new(|| {
    HashMap::from([
        ("ガ", RelationLabel::Ga),
        ("ga", RelationLabel::Ga),
        ("ヲ", RelationLabel::O),
        ("o", RelationLabel::O),
        ("ニ", RelationLabel::Ni),
        ("二", RelationLabel::Ni),
        ("ni", RelationLabel::Ni),
    ])
});

impl RelationLabel {
    /// Map a raw annotation label to its normalized form.
    pub fn normalize(raw: &str) -> Self {
        if raw == "coref" {
            return RelationLabel::Coref;
        }
        match CASE_LABELS.get(raw) {
            Some(label) => label.clone(),
            None => RelationLabel::Role(raw.to_string()),
        }
    }

    pub fn kind(&self) -> RelationKind {
        match self {
            RelationLabel::Coref => RelationKind::Coreference,
            RelationLabel::Ga | RelationLabel::O | RelationLabel::Ni => {
                RelationKind::PredicateArgument
            }
            RelationLabel::Role(_) => RelationKind::SemanticRole,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationLabel::Coref => "coref",
            RelationLabel::Ga => "ga",
            RelationLabel::O => "o",
            RelationLabel::Ni => "ni",
            RelationLabel::Role(name) => name.as_str(),
        }
    }
}

/// Positional classification of an anaphoric link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkType {
    /// Antecedent is the dependency target.
    Dep,
    /// Adnominal relation.
    Adnom,
    /// Zero anaphora: the argument is elided in the surface text.
    Zero,
}

/// Which granularities a relation's endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationScheme {
    ChunkToChunk,
    ChunkToToken,
    TokenToChunk,
    TokenToToken,
}

/// Directed edge from an anaphor/predicate to an antecedent/argument.
///
/// `antecedent` is `None` when there is no prior mention; it may also be an
/// exophoric reference, which never resolves to a tree entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    pub anaphor: Reference,
    pub antecedent: Option<Reference>,
    pub label: RelationLabel,
    pub link_type: Option<LinkType>,
}

impl Relation {
    pub fn new(anaphor: Reference, antecedent: Option<Reference>, label: RelationLabel) -> Self {
        Self {
            anaphor,
            antecedent,
            label,
            link_type: None,
        }
    }

    pub fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    pub fn kind(&self) -> RelationKind {
        self.label.kind()
    }

    /// Whether the antecedent is an in-document mention.
    pub fn is_in_document(&self) -> bool {
        self.antecedent.as_ref().is_some_and(|r| r.is_valid())
    }

    /// Endpoint granularities, when both endpoints are chunk or token
    /// coordinates.
    pub fn scheme(&self) -> Option<AnnotationScheme> {
        let antecedent = self.antecedent.as_ref()?;
        match (&self.anaphor, antecedent) {
            (Reference::Chunk(_), Reference::Chunk(_)) => Some(AnnotationScheme::ChunkToChunk),
            (Reference::Chunk(_), Reference::Token(_)) => Some(AnnotationScheme::ChunkToToken),
            (Reference::Token(_), Reference::Chunk(_)) => Some(AnnotationScheme::TokenToChunk),
            (Reference::Token(_), Reference::Token(_)) => Some(AnnotationScheme::TokenToToken),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ChunkReference, ExoReference, TokenReference};

    #[test]
    fn labels_normalize_case_markers() {
        assert_eq!(RelationLabel::normalize("ガ"), RelationLabel::Ga);
        assert_eq!(RelationLabel::normalize("ヲ"), RelationLabel::O);
        assert_eq!(RelationLabel::normalize("ニ"), RelationLabel::Ni);
        assert_eq!(RelationLabel::normalize("二"), RelationLabel::Ni);
        assert_eq!(RelationLabel::normalize("coref"), RelationLabel::Coref);
        assert_eq!(
            RelationLabel::normalize("agent"),
            RelationLabel::Role("agent".to_string())
        );
    }

    #[test]
    fn label_kinds() {
        assert_eq!(RelationLabel::Coref.kind(), RelationKind::Coreference);
        assert_eq!(RelationLabel::Ga.kind(), RelationKind::PredicateArgument);
        assert_eq!(
            RelationLabel::Role("theme".into()).kind(),
            RelationKind::SemanticRole
        );
    }

    #[test]
    fn scheme_reflects_endpoint_granularity() {
        let rel = Relation::new(
            TokenReference::new(0, 1).into(),
            Some(ChunkReference::new(0, 0).into()),
            RelationLabel::Ga,
        );
        assert_eq!(rel.scheme(), Some(AnnotationScheme::TokenToChunk));

        let exo = Relation::new(
            TokenReference::new(0, 1).into(),
            Some(ExoReference::default().into()),
            RelationLabel::Coref,
        );
        assert_eq!(exo.scheme(), None);
        assert!(!exo.is_in_document());
    }

    #[test]
    fn relations_order_by_anaphor_then_antecedent() {
        let a = Relation::new(
            TokenReference::new(0, 1).into(),
            Some(TokenReference::new(0, 0).into()),
            RelationLabel::Coref,
        );
        let b = Relation::new(
            TokenReference::new(1, 0).into(),
            Some(TokenReference::new(0, 0).into()),
            RelationLabel::Coref,
        );
        assert!(a < b);
    }
}
