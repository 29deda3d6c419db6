//! Stage (2): nomination (§4.2).
//!
//! Six independent nominators scan every sentence for spans that might name
//! an entity: NER spans, dependency-headed proper-noun chains, gazetteer
//! hits, regex patterns, the caller-supplied whitelist, and a capitalized-run
//! fallback. Each nominator is a plain value — a [`MentionSource`] tag paired
//! with a function pointer — not a trait object: per §9's "nominator as
//! value, not as inheritance hierarchy" design note, there is no shared base
//! type to subclass, just a uniform `(source, fn)` pair iterated in a table.
//!
//! A final conjunctive-split pass breaks "X and Y" nominations produced by
//! any nominator into their individual conjuncts before the meaning gate
//! ever sees them.

pub mod conjunctive;
pub mod dependency;
pub mod fallback;
pub mod gazetteer;
pub mod ner;
pub mod pattern;
pub mod whitelist;

use crate::config::ExtractionConfig;
use crate::lexicon::LexiconBundle;
use crate::model::{Candidate, MentionSource, ParsedDocument};
use crate::stats::ExtractionStats;

/// Everything a single nominator needs to scan one sentence.
pub struct NominatorInput<'a> {
    pub sentence: &'a crate::model::ParsedSentence,
    pub sentence_index: usize,
    /// The sentence's own text, sliced from the document by character
    /// offset (`sentence.span().slice(document_text)`).
    pub sentence_text: &'a str,
    pub lexicon: &'a LexiconBundle,
    pub config: &'a ExtractionConfig,
}

type NominatorFn = fn(&NominatorInput) -> Vec<Candidate>;

const NOMINATORS: &[(MentionSource, NominatorFn)] = &[
    (MentionSource::Ner, ner::nominate),
    (MentionSource::Dep, dependency::nominate),
    (MentionSource::Gaz, gazetteer::nominate),
    (MentionSource::Pattern, pattern::nominate),
    (MentionSource::Whitelist, whitelist::nominate),
    (MentionSource::Fallback, fallback::nominate),
];

/// Converts a byte offset within `slice` into a character offset, for
/// translating a regex match's byte-based `start()`/`end()` into the
/// character-offset coordinate system the rest of the pipeline uses.
pub(crate) fn char_offset(slice: &str, byte_offset: usize) -> usize {
    slice[..byte_offset].chars().count()
}

/// Runs every nominator over every sentence in `document`, then splits any
/// conjunctive nominations ("Frodo and Sam") into their conjuncts.
pub fn nominate_document(
    document_text: &str,
    document: &ParsedDocument,
    lexicon: &LexiconBundle,
    config: &ExtractionConfig,
    stats: &mut ExtractionStats,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (sentence_index, sentence) in document.sentences.iter().enumerate() {
        let sentence_text = sentence.span().slice(document_text).unwrap_or_default();
        let input = NominatorInput {
            sentence,
            sentence_index,
            sentence_text,
            lexicon,
            config,
        };

        for (_source, nominate) in NOMINATORS {
            for candidate in nominate(&input) {
                stats.record_nomination(candidate.source);
                candidates.push(candidate);
            }
        }
    }

    candidates
        .into_iter()
        .flat_map(|c| conjunctive::split(c, document))
        .collect()
}
