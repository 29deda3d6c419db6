//! Whitelist nominator: the caller supplies exact-surface entries (known
//! character names, organisations, etc.) that should always be nominated
//! wherever they occur, regardless of casing or NER coverage.

use crate::model::{Candidate, MentionSource};
use crate::nominate::NominatorInput;

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    if input.config.whitelist.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    let text = input.sentence_text;
    let lower_text = text.to_lowercase();

    for entry in &input.config.whitelist {
        let lower_entry = entry.to_lowercase();
        let mut search_from = 0;
        while let Some(rel) = lower_text[search_from..].find(&lower_entry) {
            let byte_start = search_from + rel;
            let byte_end = byte_start + lower_entry.len();
            let start = input.sentence.start + crate::nominate::char_offset(text, byte_start);
            let end = input.sentence.start + crate::nominate::char_offset(text, byte_end);
            let token_indices: Vec<usize> = input
                .sentence
                .tokens
                .iter()
                .filter(|t| t.start >= start && t.end <= end)
                .map(|t| t.i)
                .collect();
            candidates.push(Candidate {
                surface: text[byte_start..byte_end].to_string(),
                start,
                end,
                token_indices,
                source: MentionSource::Whitelist,
                sentence_index: input.sentence_index,
                ner_hint: None,
            });
            search_from = byte_end.max(search_from + 1);
        }
    }

    candidates
}
