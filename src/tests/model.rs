//! Structural-model tests spanning documents, sentences, and relations.

use super::support::{taro_annotation, token_document};
use crate::{
    ChunkKind, ChunkReference, Document, ExoReference, LinkType, Reference, Relation,
    RelationKind, RelationLabel, TokenReference,
};

fn annotated() -> Document {
    let mut doc = taro_annotation("OC01_00001");
    // 買っ takes 太郎 as ガ and プリウス as ヲ; プリウス corefers with an
    // exophoric referent.
    let predicate = TokenReference::new(0, 4);
    let token = doc
        .sentence_mut(0)
        .unwrap()
        .token_mut(4)
        .unwrap();
    token.add_relation(Relation::new(
        predicate.into(),
        Some(TokenReference::new(0, 0).into()),
        RelationLabel::normalize("ガ"),
    ));
    token.add_relation(Relation::new(
        predicate.into(),
        Some(TokenReference::new(0, 2).into()),
        RelationLabel::normalize("ヲ"),
    ));
    let token = doc
        .sentence_mut(0)
        .unwrap()
        .token_mut(2)
        .unwrap();
    token.add_relation(
        Relation::new(
            TokenReference::new(0, 2).into(),
            Some(ExoReference::new("不特定:物").into()),
            RelationLabel::Coref,
        )
        .with_link_type(LinkType::Zero),
    );
    doc
}

#[test]
fn resolve_navigates_the_hierarchy() {
    let doc = annotated();
    let sentence = doc
        .resolve(&Reference::Sentence(0))
        .and_then(|e| e.as_sentence())
        .unwrap();
    assert_eq!(sentence.surface(), "太郎はプリウスを買った");

    let chunk = doc
        .resolve(&Reference::Chunk(ChunkReference::new(0, 1)))
        .and_then(|e| e.as_chunk())
        .unwrap();
    assert_eq!(chunk.surface(sentence), "プリウスを");
    assert_eq!(chunk.case, "を");
    assert_eq!(chunk.kind, ChunkKind::Elem);

    let token = doc
        .resolve(&Reference::Token(TokenReference::new(0, 4)))
        .and_then(|e| e.as_token())
        .unwrap();
    assert_eq!(token.surface, "買っ");
}

#[test]
fn chunk_reference_from_token_reference() {
    let doc = annotated();
    assert_eq!(
        doc.chunk_ref_from_token_ref(TokenReference::new(0, 3)),
        Some(ChunkReference::new(0, 1))
    );
    assert_eq!(
        doc.chunk_ref_from_token_ref(TokenReference::new(0, 5)),
        Some(ChunkReference::new(0, 2))
    );
    assert_eq!(doc.chunk_ref_from_token_ref(TokenReference::new(0, 9)), None);
    assert_eq!(doc.chunk_ref_from_token_ref(TokenReference::new(3, 0)), None);
}

#[test]
fn chunk_positions_drive_char_offset_lookup() {
    let doc = annotated();
    assert_eq!(doc.chunk_from_char_offset(0, 0).unwrap().cid, 0);
    // First chunk starting at or after the offset.
    assert_eq!(doc.chunk_from_char_offset(0, 1).unwrap().cid, 1);
    assert_eq!(doc.chunk_from_char_offset(0, 3).unwrap().cid, 1);
    assert_eq!(doc.chunk_from_char_offset(0, 8).unwrap().cid, 2);
    assert!(doc.chunk_from_char_offset(0, 9).is_none());
}

#[test]
fn position_arithmetic_matches_entity_lookup() {
    let doc = token_document("doc", &[&["太郎", "は"], &["プリウス", "を"]]);
    for (sid, tid, surface) in [(0, 0, "太郎"), (0, 1, "は"), (1, 0, "プリウス"), (1, 1, "を")] {
        let reference = Reference::Token(TokenReference::new(sid, tid));
        let offset = doc.position_of(&reference).unwrap();
        assert_eq!(doc.token_at(offset).unwrap().surface, surface);
    }
}

#[test]
fn relation_labels_are_harvested_per_kind() {
    let doc = annotated();

    let corefs = doc.coreference_labels();
    assert_eq!(corefs.len(), 1);
    assert_eq!(corefs[0].label, RelationLabel::Coref);
    assert_eq!(corefs[0].link_type, Some(LinkType::Zero));
    assert!(!corefs[0].is_in_document());

    let predicates = doc.predicate_labels();
    assert_eq!(predicates.len(), 2);
    assert_eq!(predicates[0].label, RelationLabel::Ga);
    assert_eq!(predicates[1].label, RelationLabel::O);
    assert!(predicates.iter().all(|r| r.kind() == RelationKind::PredicateArgument));
    assert!(predicates.iter().all(|r| r.is_in_document()));
}

#[test]
fn relation_endpoints_resolve_back_to_entities() {
    let doc = annotated();
    let sentence = doc.sentence(0).unwrap();

    let predicates = doc.predicate_labels();
    let ga = &predicates[0];
    let anaphor = doc.resolve(&ga.anaphor).and_then(|e| e.as_token()).unwrap();
    assert_eq!(anaphor.surface, "買っ");
    let antecedent = doc
        .resolve(ga.antecedent.as_ref().unwrap())
        .and_then(|e| e.as_token())
        .unwrap();
    assert_eq!(antecedent.surface, "太郎");

    // The exophoric antecedent never resolves.
    let coref = &doc.coreference_labels()[0];
    assert!(doc.resolve(coref.antecedent.as_ref().unwrap()).is_none());

    // And the anaphor's chunk is recoverable through the span lookup.
    let anaphor_ref = match coref.anaphor {
        Reference::Token(r) => r,
        _ => unreachable!(),
    };
    let chunk_ref = doc.chunk_ref_from_token_ref(anaphor_ref).unwrap();
    assert_eq!(
        doc.chunk_by_ref(chunk_ref).unwrap().surface(sentence),
        "プリウスを"
    );
}

#[test]
fn reverse_links_enumerate_dependents() {
    let doc = annotated();
    let sentence = doc.sentence(0).unwrap();
    let root = sentence.chunk(2).unwrap();
    let dependents: Vec<String> = sentence
        .reverse_link_chunks(root)
        .map(|c| c.surface(sentence))
        .collect();
    assert_eq!(dependents, vec!["太郎は", "プリウスを"]);
}

#[test]
fn verb_chunks_are_classified() {
    let doc = annotated();
    let sentence = doc.sentence(0).unwrap();
    assert_eq!(sentence.chunk(2).unwrap().kind, ChunkKind::Verb);
    assert!(sentence.chunk(0).unwrap().first_mentioned);
}
