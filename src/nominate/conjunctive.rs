//! Conjunctive split: "Frodo and Sam" nominated as one span by any source is
//! broken into its individual conjuncts before the meaning gate runs, so
//! each name gets judged (and later clustered) on its own.

use crate::model::{Candidate, ParsedDocument, ParsedSentence};

const CONJUNCTIONS: [&str; 3] = [" and ", " & ", " or "];

/// Splits `candidate` on a top-level conjunction if its surface contains
/// one and every conjunct looks like its own capitalized name. Candidates
/// that don't split are returned unchanged. When the first conjunct is a
/// single token and the last conjunct carries a trailing surname ("James and
/// Lily Potter"), that surname is folded onto the first conjunct.
pub fn split(candidate: Candidate, document: &ParsedDocument) -> Vec<Candidate> {
    for sep in CONJUNCTIONS {
        if let Some(rel) = candidate.surface.find(sep) {
            let left = &candidate.surface[..rel];
            let right = &candidate.surface[rel + sep.len()..];
            if is_name_like(left) && is_name_like(right) {
                let mid = candidate.start + left.chars().count() + sep.chars().count();
                let left_end = candidate.start + left.chars().count();
                let Some(sentence) = document.sentences.get(sentence_index_of(document, &candidate)) else {
                    return vec![candidate];
                };
                let left_tokens: Vec<usize> = sentence
                    .tokens
                    .iter()
                    .filter(|t| t.start >= candidate.start && t.end <= left_end)
                    .map(|t| t.i)
                    .collect();
                let right_tokens: Vec<usize> = sentence
                    .tokens
                    .iter()
                    .filter(|t| t.start >= mid && t.end <= candidate.end)
                    .map(|t| t.i)
                    .collect();

                let mut left_candidate = Candidate {
                    surface: left.to_string(),
                    start: candidate.start,
                    end: left_end,
                    token_indices: left_tokens,
                    source: candidate.source,
                    sentence_index: candidate.sentence_index,
                    ner_hint: candidate.ner_hint.clone(),
                };
                let right_candidate = Candidate {
                    surface: right.to_string(),
                    start: mid,
                    end: candidate.end,
                    token_indices: right_tokens,
                    source: candidate.source,
                    sentence_index: candidate.sentence_index,
                    ner_hint: candidate.ner_hint,
                };

                attach_shared_surname(&mut left_candidate, &right_candidate, sentence);

                return vec![left_candidate, right_candidate];
            }
        }
    }

    vec![candidate]
}

/// When `left` is a bare single-token conjunct and `right` carries a
/// trailing surname, folds that surname onto `left` so "James and Lily
/// Potter" yields "James Potter" rather than a bare first name.
fn attach_shared_surname(left: &mut Candidate, right: &Candidate, sentence: &ParsedSentence) {
    if left.surface.split_whitespace().count() != 1 {
        return;
    }
    if right.surface.split_whitespace().count() < 2 {
        return;
    }
    let Some(&surname_idx) = right.token_indices.last() else {
        return;
    };
    let Some(surname_token) = sentence.token(surname_idx) else {
        return;
    };

    left.surface = format!("{} {}", left.surface, surname_token.text);
    left.end = surname_token.end;
    if !left.token_indices.contains(&surname_idx) {
        left.token_indices.push(surname_idx);
    }
}

fn sentence_index_of(document: &ParsedDocument, candidate: &Candidate) -> usize {
    document
        .sentences
        .iter()
        .position(|s| s.start <= candidate.start && candidate.end <= s.end)
        .unwrap_or(candidate.sentence_index)
}

fn is_name_like(surface: &str) -> bool {
    let surface = surface.trim();
    !surface.is_empty()
        && surface
            .chars()
            .next()
            .map(|c| c.is_uppercase())
            .unwrap_or(false)
        && surface.split_whitespace().all(|w| {
            w.chars()
                .next()
                .map(|c| c.is_uppercase() || !c.is_alphabetic())
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MentionSource, ParsedSentence, Token};

    fn tok(i: usize, text: &str, start: usize) -> Token {
        let end = start + text.chars().count();
        Token {
            i,
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: "PROPN".to_string(),
            dep: "conj".to_string(),
            head: i,
            ent: String::new(),
            start,
            end,
        }
    }

    #[test]
    fn splits_and_joined_names() {
        let document = ParsedDocument {
            sentences: vec![ParsedSentence {
                start: 0,
                end: 14,
                tokens: vec![tok(0, "Frodo", 0), tok(1, "and", 6), tok(2, "Sam", 10)],
            }],
        };
        let candidate = Candidate {
            surface: "Frodo and Sam".to_string(),
            start: 0,
            end: 13,
            token_indices: vec![0, 1, 2],
            source: MentionSource::Fallback,
            sentence_index: 0,
            ner_hint: None,
        };
        let split_result = split(candidate, &document);
        assert_eq!(split_result.len(), 2);
        assert_eq!(split_result[0].surface, "Frodo");
        assert_eq!(split_result[1].surface, "Sam");
    }

    #[test]
    fn attaches_shared_surname_to_single_token_conjunct() {
        let document = ParsedDocument {
            sentences: vec![ParsedSentence {
                start: 0,
                end: 21,
                tokens: vec![
                    tok(0, "James", 0),
                    tok(1, "and", 6),
                    tok(2, "Lily", 10),
                    tok(3, "Potter", 15),
                ],
            }],
        };
        let candidate = Candidate {
            surface: "James and Lily Potter".to_string(),
            start: 0,
            end: 21,
            token_indices: vec![0, 1, 2, 3],
            source: MentionSource::Fallback,
            sentence_index: 0,
            ner_hint: None,
        };
        let split_result = split(candidate, &document);
        assert_eq!(split_result.len(), 2);
        assert_eq!(split_result[0].surface, "James Potter");
        assert_eq!(split_result[0].token_indices, vec![0, 3]);
        assert_eq!(split_result[1].surface, "Lily Potter");
    }

    #[test]
    fn leaves_non_conjunctive_candidate_untouched() {
        let document = ParsedDocument { sentences: vec![] };
        let candidate = Candidate {
            surface: "Gondor".to_string(),
            start: 0,
            end: 6,
            token_indices: vec![],
            source: MentionSource::Gaz,
            sentence_index: 0,
            ner_hint: None,
        };
        let result = split(candidate.clone(), &document);
        assert_eq!(result, vec![candidate]);
    }
}
