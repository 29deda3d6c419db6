//! Gazetteer nominator: matches known places/orgs and school-suffixed names
//! directly against sentence text, independent of NER tagging.

use crate::lexicon::regexes::SCHOOL_NAME;
use crate::model::{Candidate, MentionSource};
use crate::nominate::{char_offset, NominatorInput};

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let text = input.sentence_text;

    for mat in crate::lexicon::regexes::CAPITALIZED_RUN.find_iter(text) {
        let surface = mat.as_str();
        if input.lexicon.is_known_place(surface) || input.lexicon.is_known_org(surface) {
            candidates.push(make_candidate(input, mat.start(), mat.end(), surface));
        }
    }

    for caps in SCHOOL_NAME.captures_iter(text) {
        let m = caps.name("name").unwrap();
        candidates.push(make_candidate(input, m.start(), m.end(), m.as_str()));
    }

    candidates
}

fn make_candidate(input: &NominatorInput, byte_start: usize, byte_end: usize, surface: &str) -> Candidate {
    let start = input.sentence.start + char_offset(input.sentence_text, byte_start);
    let end = input.sentence.start + char_offset(input.sentence_text, byte_end);
    let token_indices: Vec<usize> = input
        .sentence
        .tokens
        .iter()
        .filter(|t| t.start >= start && t.end <= end)
        .map(|t| t.i)
        .collect();
    Candidate {
        surface: surface.to_string(),
        start,
        end,
        token_indices,
        source: MentionSource::Gaz,
        sentence_index: input.sentence_index,
        ner_hint: None,
    }
}
