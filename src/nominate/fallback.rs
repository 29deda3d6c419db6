//! Fallback nominator: a capitalized-run regex over raw sentence text,
//! catching proper-noun-shaped spans that NER, dependency parsing, the
//! gazetteer, and the pattern library all missed. Lowest conflict priority
//! of every source (§4.7) -- it exists to surface candidates for the
//! meaning gate to judge, not to assert confident identity.
//!
//! A raw regex match is repaired before it becomes a candidate (§4.2): it
//! extends forward through connector words ("of", "de", "von", ...), a
//! single trailing Roman numeral, or an organisational descriptor ("Inc",
//! "Group", ...); trailing punctuation tokens are trimmed off; and a
//! single-token span immediately preceded by "the" or an uncoordinated
//! "and" is dropped rather than nominated.

use crate::lexicon::regexes::CAPITALIZED_RUN;
use crate::model::{Candidate, MentionSource, ParsedSentence, Token};
use crate::nominate::{char_offset, NominatorInput};

const CONNECTORS: [&str; 7] = ["of", "the", "de", "von", "van", "la", "le"];
const ORG_DESCRIPTORS: [&str; 8] = ["inc", "corp", "ltd", "llc", "co", "group", "holdings", "foundation"];

fn is_roman_numeral(word: &str) -> bool {
    !word.is_empty() && word.len() <= 6 && word.chars().all(|c| "IVXLCDM".contains(c))
}

fn token_at(sentence: &ParsedSentence, pos: usize) -> Option<&Token> {
    sentence.tokens.get(pos)
}

/// Extends `token_indices` forward past its current end, one hop at a time,
/// through a connector-plus-capitalized-word pair, a bare Roman numeral, or
/// an organisational descriptor -- stopping the first time none apply.
fn extend_forward(sentence: &ParsedSentence, token_indices: &mut Vec<usize>) {
    loop {
        let Some(&last_idx) = token_indices.last() else {
            return;
        };
        let Some(last_pos) = sentence.tokens.iter().position(|t| t.i == last_idx) else {
            return;
        };

        if let Some(next) = token_at(sentence, last_pos + 1) {
            let word = next.text.to_lowercase();
            if CONNECTORS.contains(&word.as_str()) {
                if let Some(after) = token_at(sentence, last_pos + 2) {
                    if after.text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                        token_indices.push(next.i);
                        token_indices.push(after.i);
                        continue;
                    }
                }
            }
            if is_roman_numeral(&next.text) {
                token_indices.push(next.i);
                continue;
            }
            if ORG_DESCRIPTORS.contains(&word.trim_end_matches('.').to_string().as_str()) {
                token_indices.push(next.i);
                continue;
            }
        }
        return;
    }
}

/// Drops trailing `PUNCT` tokens a raw regex match shouldn't have picked up.
fn trim_trailing_punctuation(sentence: &ParsedSentence, token_indices: &mut Vec<usize>) {
    while let Some(&last_idx) = token_indices.last() {
        if token_indices.len() <= 1 {
            break;
        }
        match sentence.tokens.iter().find(|t| t.i == last_idx) {
            Some(t) if t.pos == "PUNCT" => {
                token_indices.pop();
            }
            _ => break,
        }
    }
}

/// `true` for a single-token span that's a bare "the X" fragment, or an
/// uncoordinated "and X" fragment (i.e. not the second half of "A and X").
fn rejected_bare_determiner_or_conjunct(sentence: &ParsedSentence, token_indices: &[usize]) -> bool {
    if token_indices.len() != 1 {
        return false;
    }
    let Some(pos) = sentence.tokens.iter().position(|t| t.i == token_indices[0]) else {
        return false;
    };
    if pos == 0 {
        return false;
    }
    let prev_word = sentence.tokens[pos - 1].text.to_lowercase();
    if prev_word == "the" {
        return true;
    }
    if prev_word == "and" {
        let coordinated = pos >= 2
            && sentence.tokens[pos - 2]
                .text
                .chars()
                .next()
                .map(|c| c.is_uppercase())
                .unwrap_or(false);
        return !coordinated;
    }
    false
}

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    let text = input.sentence_text;
    let mut candidates = Vec::new();

    for mat in CAPITALIZED_RUN.find_iter(text) {
        let surface = mat.as_str();
        if input.lexicon.is_stopword(surface) || input.lexicon.is_common_interjection(surface) {
            continue;
        }
        let start = input.sentence.start + char_offset(text, mat.start());
        let end = input.sentence.start + char_offset(text, mat.end());
        let mut token_indices: Vec<usize> = input
            .sentence
            .tokens
            .iter()
            .filter(|t| t.start >= start && t.end <= end)
            .map(|t| t.i)
            .collect();

        if token_indices.is_empty() {
            // No token stream to repair against (e.g. an untokenized test
            // fixture); fall back to the raw regex match verbatim.
            candidates.push(Candidate {
                surface: surface.to_string(),
                start,
                end,
                token_indices,
                source: MentionSource::Fallback,
                sentence_index: input.sentence_index,
                ner_hint: None,
            });
            continue;
        }

        extend_forward(input.sentence, &mut token_indices);
        trim_trailing_punctuation(input.sentence, &mut token_indices);

        if rejected_bare_determiner_or_conjunct(input.sentence, &token_indices) {
            continue;
        }

        let run: Vec<&Token> = token_indices
            .iter()
            .filter_map(|&i| input.sentence.tokens.iter().find(|t| t.i == i))
            .collect();
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        let surface = run.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
        let ner_hint = run.iter().find(|t| t.has_ner()).map(|t| t.ent.clone());

        candidates.push(Candidate {
            surface,
            start: first.start,
            end: last.end,
            token_indices,
            source: MentionSource::Fallback,
            sentence_index: input.sentence_index,
            ner_hint,
        });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::lexicon::LexiconBundle;
    use crate::model::ParsedSentence;

    fn tok(i: usize, text: &str, pos: &str, start: usize) -> Token {
        let end = start + text.chars().count();
        Token {
            i,
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: pos.to_string(),
            dep: "".to_string(),
            head: i,
            ent: String::new(),
            start,
            end,
        }
    }

    fn input<'a>(
        sentence: &'a ParsedSentence,
        sentence_text: &'a str,
        lexicon: &'a LexiconBundle,
        config: &'a ExtractionConfig,
    ) -> NominatorInput<'a> {
        NominatorInput {
            sentence,
            sentence_index: 0,
            sentence_text,
            lexicon,
            config,
        }
    }

    #[test]
    fn nominates_capitalized_run() {
        let text = "Eleanor Vance walked home.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let candidates = nominate(&input(&sentence, text, &lexicon, &config));
        assert!(candidates.iter().any(|c| c.surface == "Eleanor Vance"));
    }

    #[test]
    fn extends_forward_through_connector() {
        let text = "Edward is Duke of York.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![
                tok(0, "Edward", "PROPN", 0),
                tok(1, "is", "AUX", 7),
                tok(2, "Duke", "PROPN", 10),
                tok(3, "of", "ADP", 15),
                tok(4, "York", "PROPN", 18),
                tok(5, ".", "PUNCT", 22),
            ],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let candidates = nominate(&input(&sentence, text, &lexicon, &config));
        assert!(candidates.iter().any(|c| c.surface == "Duke of York"));
    }

    #[test]
    fn extend_forward_absorbs_a_trailing_roman_numeral() {
        let sentence = ParsedSentence {
            start: 0,
            end: 22,
            tokens: vec![
                tok(0, "Henry", "PROPN", 0),
                tok(1, "VIII", "PROPN", 6),
                tok(2, "ruled", "VERB", 11),
            ],
        };
        let mut token_indices = vec![0];
        extend_forward(&sentence, &mut token_indices);
        assert_eq!(token_indices, vec![0, 1]);
    }

    #[test]
    fn rejects_bare_the_prefixed_singleton() {
        let text = "Ask the Gatekeeper.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![
                tok(0, "Ask", "VERB", 0),
                tok(1, "the", "DET", 4),
                tok(2, "Gatekeeper", "PROPN", 8),
                tok(3, ".", "PUNCT", 18),
            ],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let candidates = nominate(&input(&sentence, text, &lexicon, &config));
        assert!(!candidates.iter().any(|c| c.surface == "Gatekeeper"));
    }

    #[test]
    fn allows_coordinated_and_prefixed_singleton() {
        // CAPITALIZED_RUN breaks its match at the lowercase "and", so this
        // nominates "Frodo" and "Sam" separately; the point of this test is
        // that "Sam" survives rejected_bare_determiner_or_conjunct's
        // coordination check instead of being dropped like a bare "and X".
        let text = "Frodo and Sam departed.";
        let sentence = ParsedSentence {
            start: 0,
            end: text.chars().count(),
            tokens: vec![
                tok(0, "Frodo", "PROPN", 0),
                tok(1, "and", "CCONJ", 6),
                tok(2, "Sam", "PROPN", 10),
                tok(3, "departed", "VERB", 14),
                tok(4, ".", "PUNCT", 22),
            ],
        };
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let candidates = nominate(&input(&sentence, text, &lexicon, &config));
        assert!(candidates.iter().any(|c| c.surface == "Sam"));
    }
}
