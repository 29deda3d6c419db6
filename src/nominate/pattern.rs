//! Pattern nominator: the regex family in [`crate::lexicon::regexes`] that
//! recognises structural name shapes NER and dependency parsing miss --
//! acronym pairs, titled names, "X family", event-of phrases, social
//! handles, and year literals (numeric and spelled-out).

use crate::classify::convert_spelled_year;
use crate::lexicon::regexes::{
    ACRONYM_PAIR, EVENT_OF, FAMILY_NAME, SOCIAL_HANDLE, SPELLED_YEAR, TITLED_NAME, YEAR_LITERAL,
};
use crate::model::{Candidate, MentionSource};
use crate::nominate::{char_offset, NominatorInput};

const PLAUSIBLE_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1500..=2099;

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    let text = input.sentence_text;
    let mut candidates = Vec::new();

    for caps in ACRONYM_PAIR.captures_iter(text) {
        if let (Some(acr), Some(exp)) = (caps.name("acr2"), caps.name("exp2")) {
            push(input, &mut candidates, acr.start(), acr.end(), acr.as_str());
            push(input, &mut candidates, exp.start(), exp.end(), exp.as_str());
        } else if let (Some(acr), Some(exp)) = (caps.name("acr1"), caps.name("exp1")) {
            push(input, &mut candidates, acr.start(), acr.end(), acr.as_str());
            push(input, &mut candidates, exp.start(), exp.end(), exp.as_str());
        }
    }

    for caps in TITLED_NAME.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push(input, &mut candidates, whole.start(), whole.end(), whole.as_str());
    }

    for caps in FAMILY_NAME.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push(input, &mut candidates, whole.start(), whole.end(), whole.as_str());
    }

    for caps in EVENT_OF.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push(input, &mut candidates, whole.start(), whole.end(), whole.as_str());
    }

    for caps in SOCIAL_HANDLE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push(input, &mut candidates, whole.start(), whole.end(), whole.as_str());
    }

    for caps in YEAR_LITERAL.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        push_date(input, &mut candidates, whole.start(), whole.end(), whole.as_str());
    }

    for mat in SPELLED_YEAR.find_iter(text) {
        let Some(year) = convert_spelled_year(mat.as_str()) else {
            continue;
        };
        if !PLAUSIBLE_YEAR_RANGE.contains(&year) {
            continue;
        }
        push_date(input, &mut candidates, mat.start(), mat.end(), &year.to_string());
    }

    candidates
}

fn push(input: &NominatorInput, out: &mut Vec<Candidate>, byte_start: usize, byte_end: usize, surface: &str) {
    let start = input.sentence.start + char_offset(input.sentence_text, byte_start);
    let end = input.sentence.start + char_offset(input.sentence_text, byte_end);
    let token_indices: Vec<usize> = input
        .sentence
        .tokens
        .iter()
        .filter(|t| t.start >= start && t.end <= end)
        .map(|t| t.i)
        .collect();
    out.push(Candidate {
        surface: surface.to_string(),
        start,
        end,
        token_indices,
        source: MentionSource::Pattern,
        sentence_index: input.sentence_index,
        ner_hint: None,
    });
}

/// Like [`push`] but tags the candidate `ner_hint` as `DATE` and sets the
/// candidate surface to its canonicalised numeric form (§4.2) even when the
/// span it covers (`byte_start..byte_end`) is a spelled-out year.
fn push_date(input: &NominatorInput, out: &mut Vec<Candidate>, byte_start: usize, byte_end: usize, canonical: &str) {
    let start = input.sentence.start + char_offset(input.sentence_text, byte_start);
    let end = input.sentence.start + char_offset(input.sentence_text, byte_end);
    let token_indices: Vec<usize> = input
        .sentence
        .tokens
        .iter()
        .filter(|t| t.start >= start && t.end <= end)
        .map(|t| t.i)
        .collect();
    out.push(Candidate {
        surface: canonical.to_string(),
        start,
        end,
        token_indices,
        source: MentionSource::Pattern,
        sentence_index: input.sentence_index,
        ner_hint: Some("DATE".to_string()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::lexicon::LexiconBundle;
    use crate::model::ParsedSentence;

    #[test]
    fn event_of_nominates_keyword_and_object_separately() {
        let text = "The Battle of Pelennor Fields was fought in Gondor.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence: &sentence,
            sentence_index: 0,
            sentence_text: text,
            lexicon: &lexicon,
            config: &config,
        };
        let candidates = nominate(&input);
        assert!(candidates.iter().any(|c| c.surface.contains("Battle of Pelennor Fields")));
    }

    #[test]
    fn social_handle_nominates_at_handle() {
        let text = "@tim_cook attended the keynote.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence: &sentence,
            sentence_index: 0,
            sentence_text: text,
            lexicon: &lexicon,
            config: &config,
        };
        let candidates = nominate(&input);
        assert!(candidates.iter().any(|c| c.surface == "@tim_cook"));
    }

    #[test]
    fn year_literal_nominates_with_date_hint() {
        let text = "The treaty was signed in 1775.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence: &sentence,
            sentence_index: 0,
            sentence_text: text,
            lexicon: &lexicon,
            config: &config,
        };
        let candidates = nominate(&input);
        let year = candidates.iter().find(|c| c.surface == "1775").expect("year candidate");
        assert_eq!(year.ner_hint.as_deref(), Some("DATE"));
    }

    #[test]
    fn spelled_year_canonicalises_to_its_numeric_form() {
        let text = "The treaty was signed in one thousand seven hundred and seventy-five.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence: &sentence,
            sentence_index: 0,
            sentence_text: text,
            lexicon: &lexicon,
            config: &config,
        };
        let candidates = nominate(&input);
        let year = candidates.iter().find(|c| c.surface == "1775").expect("spelled year candidate");
        assert_eq!(year.ner_hint.as_deref(), Some("DATE"));
    }

    #[test]
    fn out_of_range_spelled_number_is_not_nominated_as_a_year() {
        let text = "She counted twenty five sheep.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence: &sentence,
            sentence_index: 0,
            sentence_text: text,
            lexicon: &lexicon,
            config: &config,
        };
        let candidates = nominate(&input);
        assert!(candidates.iter().all(|c| c.ner_hint.as_deref() != Some("DATE")));
    }
}
