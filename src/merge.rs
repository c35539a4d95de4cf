//! Chunk-merge engine.
//!
//! Rewrites the chunk segmentation of a source document so that it mirrors
//! the boundaries of an independently (and usually more finely) chunked
//! annotation document over the same text. The two inputs may disagree on
//! tokenization; alignment runs on cumulative character lengths, and
//! disagreements are collected in the report instead of raised. Input
//! corpora are irregular, and a partial result is more useful than none.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::Chunk;
use crate::document::Document;
use crate::reference::ChunkReference;

/// A data-quality problem observed while merging. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MergeError {
    /// The two token streams disagreed at a point where their cumulative
    /// lengths matched.
    #[error("surface mismatch in {document}: source {found:?} != annotation {expected:?}")]
    SurfaceMismatch {
        document: String,
        expected: String,
        found: String,
    },
    /// The source token stream ended before the annotation was fully
    /// consumed; remaining annotation chunks were not processed.
    #[error("source token stream exhausted in {document}")]
    SourceExhausted { document: String },
}

impl MergeError {
    pub fn document(&self) -> &str {
        match self {
            MergeError::SurfaceMismatch { document, .. } => document,
            MergeError::SourceExhausted { document } => document,
        }
    }
}

/// Outcome of a merge run. The error counts are the only signal of
/// alignment quality; a clean merge reports zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    pub errors: Vec<MergeError>,
    per_document: BTreeMap<String, usize>,
}

impl MergeReport {
    pub fn total_errors(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn document_errors(&self, name: &str) -> usize {
        self.per_document.get(name).copied().unwrap_or(0)
    }

    pub fn documents_with_errors(&self) -> impl Iterator<Item = &str> {
        self.per_document.keys().map(String::as_str)
    }

    fn record(&mut self, error: MergeError) {
        *self
            .per_document
            .entry(error.document().to_string())
            .or_default() += 1;
        self.errors.push(error);
    }
}

/// A chunk to be created on the source document, planned during the
/// read-only sweep and applied afterwards.
struct ChunkPlan {
    sid: i32,
    token_ids: Vec<usize>,
    head_position: usize,
    func_position: usize,
    /// The annotation chunk this plan derives from. Stable across
    /// sentence-boundary splitting, unlike positional correspondence.
    anno_ref: ChunkReference,
    /// First fragment of its annotation chunk; represents it as a link
    /// target.
    primary: bool,
}

/// Reconciles chunk boundaries between document pairs matched by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkMerger;

impl ChunkMerger {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite each source document whose name appears among the
    /// annotations. Documents present in only one of the two lists are left
    /// untouched.
    pub fn merge(&self, sources: &mut [Document], annotations: &[Document]) -> MergeReport {
        let mut report = MergeReport::default();
        let by_name: HashMap<String, usize> = sources
            .iter()
            .enumerate()
            .map(|(index, doc)| (doc.name.clone(), index))
            .collect();

        for annotation in annotations {
            let Some(&index) = by_name.get(&annotation.name) else {
                continue;
            };
            debug!("merging chunk structure of {}", annotation.name);
            let before = report.total_errors();
            merge_document(&mut sources[index], annotation, &mut report);
            let errors = report.total_errors() - before;
            if errors > 0 {
                warn!(
                    "alignment errors detected in {}: {}",
                    annotation.name, errors
                );
            }
        }
        report
    }
}

fn merge_document(source: &mut Document, annotation: &Document, report: &mut MergeReport) {
    let plans = plan_chunks(source, annotation, report);

    // Rewrite: the old segmentation is discarded wholesale.
    for sentence in source.sentences_mut() {
        sentence.chunks_vec_mut().clear();
    }

    // Create the planned chunks and record the annotation correspondence.
    let mut created: Vec<(ChunkReference, ChunkReference)> = Vec::new();
    let mut primary: HashMap<ChunkReference, ChunkReference> = HashMap::new();
    for plan in plans {
        let Some(sentence) = source.sentence_mut(plan.sid) else {
            continue;
        };
        let mut chunk = Chunk::new();
        chunk.head_position = plan.head_position;
        chunk.func_position = plan.func_position;
        for tid in plan.token_ids {
            chunk.push_token_id(tid);
        }
        let cid = sentence.push_chunk(chunk);
        let source_ref = ChunkReference::new(plan.sid, cid as i32);
        created.push((source_ref, plan.anno_ref));
        if plan.primary {
            primary.insert(plan.anno_ref, source_ref);
        }
    }

    // Copy dependency edges across via the correspondence table.
    for (source_ref, anno_ref) in &created {
        let target = annotation
            .chunk_by_ref(*anno_ref)
            .and_then(|anno_chunk| {
                anno_chunk.link.or_else(|| {
                    (anno_chunk.link_id >= 0)
                        .then(|| ChunkReference::new(anno_ref.sid, anno_chunk.link_id))
                })
            })
            .and_then(|anno_target| primary.get(&anno_target).copied());
        if let Some(chunk) = source
            .sentence_mut(source_ref.sid)
            .and_then(|s| s.chunk_mut(source_ref.cid as usize))
        {
            chunk.link = target;
        }
    }

    remove_empty_chunks(source);

    for sentence in source.sentences_mut() {
        sentence.refresh_derived();
    }
}

/// The forward sweep: walk the annotation's chunks, pulling source tokens
/// from a shared cursor until the cumulative character lengths meet. Reads
/// only; produces plans.
fn plan_chunks(source: &Document, annotation: &Document, report: &mut MergeReport) -> Vec<ChunkPlan> {
    let mut plans = Vec::new();
    let mut cursor = source.tokens();
    let mut last_sid = match source.sentences().first() {
        Some(sentence) => sentence.sid,
        None => {
            if annotation.chunks().next().is_some() {
                report.record(MergeError::SourceExhausted {
                    document: annotation.name.clone(),
                });
            }
            return plans;
        }
    };

    let mut source_len = 0usize;
    let mut anno_len = 0usize;
    let mut source_surf = String::new();
    let mut anno_surf = String::new();

    'sweep: for anno_sentence in annotation.sentences() {
        for anno_chunk in anno_sentence.chunks() {
            let mut pulled: Vec<(i32, usize)> = Vec::new();
            let mut head: Option<usize> = None;
            let mut func: Option<usize> = None;

            for (ordinal, anno_token) in anno_chunk.tokens(anno_sentence).enumerate() {
                anno_surf.push_str(&anno_token.surface);
                anno_len += anno_token.char_len();

                while source_len < anno_len {
                    let Some(token) = cursor.next() else {
                        // The partially built chunk is dropped; everything
                        // planned so far still applies.
                        report.record(MergeError::SourceExhausted {
                            document: annotation.name.clone(),
                        });
                        break 'sweep;
                    };
                    source_len += token.char_len();
                    source_surf.push_str(&token.surface);
                    last_sid = token.sid;
                    pulled.push((token.sid, token.tid as usize));
                }

                if source_len == anno_len {
                    if source_surf != anno_surf {
                        report.record(MergeError::SurfaceMismatch {
                            document: annotation.name.clone(),
                            expected: anno_surf.clone(),
                            found: source_surf.clone(),
                        });
                    }
                    source_surf.clear();
                    anno_surf.clear();
                }

                // Head and function positions transfer by token ordinal
                // within the chunk, not by character offset.
                if ordinal == anno_chunk.head_position {
                    head = Some(pulled.len().saturating_sub(1));
                } else if ordinal == anno_chunk.func_position {
                    func = Some(pulled.len().saturating_sub(1));
                }
            }

            let head = head.unwrap_or(0);
            let func = func.unwrap_or(pulled.len());
            push_fragments(&mut plans, pulled, head, func, anno_chunk.reference(), last_sid);
        }
    }
    plans
}

/// Split a planned chunk at sentence-id transitions: one annotation chunk
/// cannot span source sentences. Positions are re-based into each fragment
/// and `func` is clamped to `head` when the split divides them.
fn push_fragments(
    plans: &mut Vec<ChunkPlan>,
    pulled: Vec<(i32, usize)>,
    head: usize,
    func: usize,
    anno_ref: ChunkReference,
    fallback_sid: i32,
) {
    if pulled.is_empty() {
        plans.push(ChunkPlan {
            sid: fallback_sid,
            token_ids: Vec::new(),
            head_position: 0,
            func_position: 0,
            anno_ref,
            primary: true,
        });
        return;
    }

    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for i in 1..pulled.len() {
        if pulled[i].0 != pulled[i - 1].0 {
            runs.push((start, i));
            start = i;
        }
    }
    runs.push((start, pulled.len()));

    let split = runs.len() > 1;
    for (index, &(start, end)) in runs.iter().enumerate() {
        let sid = pulled[start].0;
        let token_ids = pulled[start..end].iter().map(|&(_, tid)| tid).collect();
        let (head_position, func_position) = if split {
            let h = if (start..end).contains(&head) { head - start } else { 0 };
            let mut f = if (start..end).contains(&func) { func - start } else { 0 };
            if h >= f {
                f = h;
            }
            (h, f)
        } else {
            (head, func)
        };
        plans.push(ChunkPlan {
            sid,
            token_ids,
            head_position,
            func_position,
            anno_ref,
            primary: index == 0,
        });
    }
}

/// Drop zero-token chunks, re-pointing their dependents at the next
/// surviving chunk of the same sentence (or unlinking them when none
/// follows), renumbering `cid`s contiguously, and remapping every stored
/// coordinate into the renumbered sentence. Always finishes by recomputing
/// `link_id` and rebuilding reverse links.
fn remove_empty_chunks(doc: &mut Document) {
    let sids: Vec<i32> = doc.sentences().iter().map(|s| s.sid).collect();
    for sid in sids {
        let Some(sentence) = doc.sentence(sid) else {
            continue;
        };
        if !sentence.chunks().iter().any(Chunk::is_empty) {
            continue;
        }

        let n = sentence.chunks().len();
        let mut new_ids: Vec<Option<i32>> = Vec::with_capacity(n);
        let mut next = 0;
        for chunk in sentence.chunks() {
            if chunk.is_empty() {
                new_ids.push(None);
            } else {
                new_ids.push(Some(next));
                next += 1;
            }
        }
        // For a removed chunk, the dependent is re-pointed here.
        let successor: Vec<Option<i32>> = (0..n)
            .map(|i| ((i + 1)..n).find_map(|j| new_ids[j]))
            .collect();

        for other in doc.sentences_mut() {
            for chunk in other.chunks_vec_mut() {
                let Some(target) = chunk.link else { continue };
                if target.sid != sid {
                    continue;
                }
                let old = target.cid as usize;
                let mapped = new_ids
                    .get(old)
                    .copied()
                    .flatten()
                    .or_else(|| successor.get(old).copied().flatten());
                chunk.link = mapped.map(|cid| ChunkReference::new(sid, cid));
            }
        }

        let sentence = doc.sentence_mut(sid).expect("sentence disappeared");
        let chunks = sentence.chunks_vec_mut();
        chunks.retain(|chunk| !chunk.is_empty());
        for (cid, chunk) in chunks.iter_mut().enumerate() {
            chunk.cid = cid as i32;
        }
    }

    for sentence in doc.sentences_mut() {
        let sid = sentence.sid;
        for chunk in sentence.chunks_vec_mut() {
            chunk.link_id = match chunk.link {
                Some(target) if target.sid == sid => target.cid,
                _ => -1,
            };
        }
    }
    rebuild_reverse_links(doc);
}

fn rebuild_reverse_links(doc: &mut Document) {
    for sentence in doc.sentences_mut() {
        for chunk in sentence.chunks_vec_mut() {
            chunk.reverse_links.clear();
        }
    }
    let edges: Vec<(ChunkReference, ChunkReference)> = doc
        .chunks()
        .filter_map(|chunk| chunk.link.map(|target| (chunk.reference(), target)))
        .collect();
    for (source, target) in edges {
        if let Some(chunk) = doc
            .sentence_mut(target.sid)
            .and_then(|s| s.chunk_mut(target.cid as usize))
        {
            chunk.reverse_links.push(source);
        }
    }
}
