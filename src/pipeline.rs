//! The seven-stage extraction pipeline (§4), wired end to end.
//!
//! Each stage is instrumented with its own [`tracing::info_span`]
//! ([AMBIENT-1]); set `TRACE_SPANS=1` (or `DEBUG=1`) to see per-stage entry
//! in a subscriber. No stage mutates another stage's output in place --
//! preprocessing hands the cleaned text forward, nomination hands
//! candidates forward, and so on, strictly left to right.

use tracing::info_span;

use crate::classify::gate;
use crate::classify::hints;
use crate::cluster;
use crate::config::ExtractionConfig;
use crate::error::{ExtractionError, RejectReason, Result};
use crate::lexicon::LexiconBundle;
use crate::mint;
use crate::model::{Candidate, DurableMention, Entity, EntitySpan, GateVerdict, ParsedDocument, ParsedSentence};
use crate::nominate;
use crate::postprocess;
use crate::preprocess;
use crate::promote;
use crate::stats::ExtractionStats;

/// Everything [`extract`] hands back: the minted entities, their document
/// occurrences, and the run's statistics (§6).
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub entities: Vec<Entity>,
    pub entity_spans: Vec<EntitySpan>,
    pub stats: ExtractionStats,
    /// Per-entity decision log from post-processing (kept, merged, or beaten
    /// in span conflict), consumed by [`crate::debug_report::DebugReport`].
    pub decisions: Vec<postprocess::EntityDecision>,
}

/// Checks the external-analyser contract (§6) before trusting any offset in
/// `parsed`: sentence spans within the document, token spans within their
/// sentence, and every `head` resolvable within the same sentence.
fn validate_parse(text: &str, parsed: &ParsedDocument) -> Result<()> {
    if parsed.sentences.is_empty() && !text.trim().is_empty() {
        return Err(ExtractionError::ParserUnavailable(
            "no sentences produced for a non-empty document".to_string(),
        ));
    }

    let char_len = text.chars().count();
    for sentence in &parsed.sentences {
        if sentence.start > sentence.end || sentence.end > char_len {
            return Err(ExtractionError::MalformedInput(format!(
                "sentence span {}..{} out of document bounds (len {})",
                sentence.start, sentence.end, char_len
            )));
        }
        for token in &sentence.tokens {
            if token.start > token.end || token.start < sentence.start || token.end > sentence.end {
                return Err(ExtractionError::MalformedInput(format!(
                    "token {} span {}..{} out of sentence bounds {}..{}",
                    token.i, token.start, token.end, sentence.start, sentence.end
                )));
            }
            if sentence.token(token.head).is_none() {
                return Err(ExtractionError::MalformedInput(format!(
                    "token {} head {} not found in its own sentence",
                    token.i, token.head
                )));
            }
        }
    }
    Ok(())
}

/// Rewrites a preposition-led fragment ("in Gondor") into its NP object
/// ("Gondor") for re-gating (§4.3): drops the leading ADP token and
/// reconstructs the candidate from what remains.
fn rewrite_pp_fragment(candidate: &Candidate, sentence: &ParsedSentence) -> Option<Candidate> {
    if candidate.token_indices.len() < 2 {
        return None;
    }
    let &first_idx = candidate.token_indices.first()?;
    if sentence.token(first_idx)?.pos != "ADP" {
        return None;
    }
    let object_indices = candidate.token_indices[1..].to_vec();
    let first = sentence.token(*object_indices.first()?)?;
    let last = sentence.token(*object_indices.last()?)?;
    let surface = object_indices
        .iter()
        .filter_map(|&i| sentence.token(i))
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Some(Candidate {
        surface,
        start: first.start,
        end: last.end,
        token_indices: object_indices,
        source: candidate.source,
        sentence_index: candidate.sentence_index,
        ner_hint: candidate.ner_hint.clone(),
    })
}

/// Builds the [`DurableMention`] a candidate that cleared the gate
/// contributes to the mention buffer (dependency role, PROPN-ness,
/// sentence-initial position, introduction cue).
fn durable_mention_for(candidate: Candidate, sentence: &ParsedSentence, lexicon: &LexiconBundle) -> DurableMention {
    let context = hints::extract_hints(sentence, &candidate.token_indices);
    DurableMention {
        all_propn: hints::all_propn(sentence, &candidate.token_indices),
        sentence_initial: hints::is_sentence_initial(sentence, &candidate.token_indices),
        introduction_cue: hints::has_introduction_cue(sentence, &candidate.token_indices, lexicon),
        document_position: candidate.start,
        surface: candidate.surface,
        start: candidate.start,
        end: candidate.end,
        source: candidate.source,
        sentence_index: candidate.sentence_index,
        ner_hint: candidate.ner_hint,
        dep_role: context.head_role,
    }
}

/// Stage (3), continued: evaluates every candidate through the meaning gate
/// and, for those that pass, builds the [`DurableMention`] the mention
/// buffer needs. A preposition-led fragment that's rejected gets one retry:
/// its NP object is re-gated on its own, and admitted if durable (§4.3).
fn run_meaning_gate(
    candidates: Vec<crate::model::Candidate>,
    parsed: &ParsedDocument,
    lexicon: &LexiconBundle,
    stats: &mut ExtractionStats,
) -> Vec<DurableMention> {
    let mut mentions = Vec::new();

    for candidate in candidates {
        let Some(sentence) = parsed.sentences.get(candidate.sentence_index) else {
            continue;
        };
        let (verdict, reason) = gate::evaluate(&candidate, sentence, lexicon);
        stats.record_gate_verdict(verdict);
        if let Some(reason) = reason {
            stats.record_reject(reason);
        }

        if verdict != GateVerdict::DurableCandidate {
            if reason == Some(RejectReason::PrepositionLedFragment) {
                if let Some(rewritten) = rewrite_pp_fragment(&candidate, sentence) {
                    let (inner_verdict, _) = gate::evaluate(&rewritten, sentence, lexicon);
                    if inner_verdict == GateVerdict::DurableCandidate {
                        mentions.push(durable_mention_for(rewritten, sentence, lexicon));
                    }
                }
            }
            continue;
        }

        mentions.push(durable_mention_for(candidate, sentence, lexicon));
    }

    mentions.sort_by_key(|m| m.document_position);
    mentions
}

/// Runs the full pipeline over `text`/`parsed` with `config`, producing the
/// minted entities and their document spans.
pub fn extract(text: &str, parsed: &ParsedDocument, config: &ExtractionConfig) -> Result<ExtractionOutput> {
    validate_parse(text, parsed)?;

    let lexicon = LexiconBundle::load();
    let mut stats = ExtractionStats::new();

    let cleaned_text = info_span!("preprocess", doc_id = %config.doc_id).in_scope(|| preprocess::preprocess(text));

    let candidates = info_span!("nominate", doc_id = %config.doc_id)
        .in_scope(|| nominate::nominate_document(&cleaned_text, parsed, &lexicon, config, &mut stats));

    let durable_mentions = info_span!("meaning_gate", doc_id = %config.doc_id)
        .in_scope(|| run_meaning_gate(candidates, parsed, &lexicon, &mut stats));

    let clusters =
        info_span!("cluster", doc_id = %config.doc_id).in_scope(|| cluster::cluster_mentions(durable_mentions, &lexicon));

    let (promoted, _deferred) = info_span!("promote", doc_id = %config.doc_id)
        .in_scope(|| promote::promote_clusters(clusters, config, &mut stats));

    let (entities, spans) = info_span!("mint", doc_id = %config.doc_id).in_scope(|| {
        let mut entities = Vec::with_capacity(promoted.len());
        let mut spans = Vec::new();
        for promotion in &promoted {
            let (entity, entity_spans) = mint::mint_entity(promotion, &lexicon, &mut stats);
            spans.extend(entity_spans);
            entities.push(entity);
        }
        (entities, spans)
    });

    let outcome = info_span!("postprocess", doc_id = %config.doc_id)
        .in_scope(|| postprocess::postprocess(entities, spans, &cleaned_text, &lexicon, &mut stats));

    Ok(ExtractionOutput {
        entities: outcome.entities,
        entity_spans: outcome.spans,
        stats,
        decisions: outcome.decisions,
    })
}
