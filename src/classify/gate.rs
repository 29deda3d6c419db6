//! The meaning gate (§4.3): decides whether a nominated [`Candidate`] names
//! something durable, something worth keeping only for this sentence, or
//! nothing at all.
//!
//! Every rejection carries a [`RejectReason`] so [`crate::stats::ExtractionStats`]
//! can tally *why* candidates were dropped, not just that they were.

use crate::classify::hints::{self, ContextHints};
use crate::error::RejectReason;
use crate::lexicon::regexes;
use crate::lexicon::LexiconBundle;
use crate::model::{Candidate, GateVerdict, ParsedSentence};

/// Runs every meaning-gate check against `candidate` in order, short-
/// circuiting on the first match. Order matters: cheap structural checks
/// run before lexicon lookups, which run before dependency-context checks.
pub fn evaluate(
    candidate: &Candidate,
    sentence: &ParsedSentence,
    lexicon: &LexiconBundle,
) -> (GateVerdict, Option<RejectReason>) {
    let surface = candidate.surface.trim();

    if surface.is_empty() || candidate.start >= candidate.end || candidate.token_indices.is_empty() {
        return (GateVerdict::NonEntity, Some(RejectReason::Empty));
    }
    if candidate.end > sentence.end || candidate.start < sentence.start {
        return (GateVerdict::NonEntity, Some(RejectReason::SpanValidationFailure));
    }

    if all_tokens_stopword(candidate, sentence, lexicon) {
        return (GateVerdict::NonEntity, Some(RejectReason::AllTokensStopword));
    }

    if regexes::REPEATED_LETTER_INTERJECTION.is_match(surface) && surface.split_whitespace().count() == 1 {
        return (
            GateVerdict::NonEntity,
            Some(RejectReason::RepeatedLetterInterjection),
        );
    }

    if surface.split_whitespace().count() == 1 && lexicon.is_common_interjection(surface) {
        return (GateVerdict::NonEntity, Some(RejectReason::CommonInterjection));
    }

    if regexes::ROAD_SIGN.is_match(surface) {
        return (GateVerdict::NonEntity, Some(RejectReason::RoadSignFragment));
    }

    let context = hints::extract_hints(sentence, &candidate.token_indices);

    if context.governing_verb.as_deref() == Some("collect") && !context.head_role.is_empty() {
        return (GateVerdict::NonEntity, Some(RejectReason::CollectiblePattern));
    }

    if let Some(reason) = leading_fragment_reason(candidate, sentence, &context) {
        return (GateVerdict::NonEntity, Some(reason));
    }

    if context.head_role == "vocative" {
        return (
            GateVerdict::ContextOnly,
            Some(RejectReason::ContextOnlyImperative),
        );
    }

    if is_demonym_adjective(surface, &context) {
        return (
            GateVerdict::ContextOnly,
            Some(RejectReason::ContextOnlyDemonym),
        );
    }

    if let Some(following) = hints::following_token(sentence, &candidate.token_indices) {
        if following.pos == "NOUN"
            && following.text.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
            && candidate.ner_hint.is_none()
            && !hints::all_propn(sentence, &candidate.token_indices)
        {
            return (
                GateVerdict::NonEntity,
                Some(RejectReason::TitleCaseFollowedByCommonNoun),
            );
        }
    }

    if surface.chars().next().map(|c| c.is_lowercase()).unwrap_or(false) {
        return (GateVerdict::NonEntity, Some(RejectReason::LowercaseRawSpan));
    }

    (GateVerdict::DurableCandidate, None)
}

fn all_tokens_stopword(candidate: &Candidate, sentence: &ParsedSentence, lexicon: &LexiconBundle) -> bool {
    candidate.token_indices.iter().all(|&i| {
        sentence
            .token(i)
            .map(|t| lexicon.is_stopword(&t.text))
            .unwrap_or(false)
    })
}

/// Checks the family of "this is a fragment of something bigger" rejections
/// that hinge on the candidate's leading token and its immediate left
/// context within the sentence.
fn leading_fragment_reason(
    candidate: &Candidate,
    sentence: &ParsedSentence,
    context: &ContextHints,
) -> Option<RejectReason> {
    let first_idx = *candidate.token_indices.first()?;
    let first = sentence.token(first_idx)?;

    if first.pos == "ADP" {
        return Some(RejectReason::PrepositionLedFragment);
    }
    if first.pos == "DET" {
        if first.text.chars().next().map(|c| c.is_lowercase()).unwrap_or(false) {
            return Some(RejectReason::DeterminerLedLowercase);
        }
        return Some(RejectReason::BareDeterminerPrefixed);
    }

    let all_propn = hints::all_propn(sentence, &candidate.token_indices);
    if !all_propn && candidate.ner_hint.is_none() && hints::has_lowercase_predecessor(sentence, &candidate.token_indices) {
        return Some(RejectReason::LowercasePredecessor);
    }

    if context.head_role == "dobj" {
        if let Some(verb) = &context.governing_verb {
            const LIGHT_VERBS: [&str; 5] = ["have", "get", "take", "make", "do"];
            if LIGHT_VERBS.contains(&verb.as_str()) && !all_propn {
                return Some(RejectReason::VerbObjectFragment);
            }
        }
    }

    None
}

const DEMONYM_SUFFIXES: [&str; 4] = ["ish", "ian", "ese", "an"];

fn is_demonym_adjective(surface: &str, context: &ContextHints) -> bool {
    if context.head_role != "amod" {
        return false;
    }
    let lower = surface.to_lowercase();
    surface.split_whitespace().count() == 1
        && DEMONYM_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}
