//! NER nominator: emits one candidate per maximal run of consecutive tokens
//! sharing the same non-empty NER label, repaired per §4.2's rules before
//! the run is turned into a candidate --
//!
//! - a token gap wider than a single character (e.g. an intervening
//!   markdown artifact) ends a run even if the NER label still agrees;
//! - a coordinating conjunction ("and", "or", "&") never joins two people
//!   into one run, even if an upstream tagger mislabels it;
//! - a title word partway through a run ("Dr Smith Professor Jones" tagged
//!   as one PERSON span) starts a second run;
//! - a leading determiner is stripped from the front of a run;
//! - a PERSON run extends forward through name particles ("van", "de",
//!   "mc", ...) into an untagged surname token; and
//! - a title word immediately before a run is absorbed backward into it.

use crate::model::{Candidate, MentionSource, Token};
use crate::nominate::NominatorInput;

const NAME_PARTICLES: [&str; 9] = ["de", "van", "von", "der", "la", "le", "mc", "mac", "di"];
const TITLE_WORDS: [&str; 9] = ["mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "madam"];
const COORDINATING_CONJUNCTIONS: [&str; 3] = ["and", "or", "&"];

fn adjacent(a: &Token, b: &Token) -> bool {
    b.start.saturating_sub(a.end) <= 1
}

fn is_coordinating_conjunction(token: &Token) -> bool {
    token.pos == "CCONJ" || COORDINATING_CONJUNCTIONS.contains(&token.text.to_lowercase().as_str())
}

fn is_title_word(token: &Token) -> bool {
    TITLE_WORDS.contains(&token.text.trim_end_matches('.').to_lowercase().as_str())
}

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    let tokens = &input.sentence.tokens;
    let mut raw_runs: Vec<(usize, usize)> = Vec::new();
    let mut run_start: Option<usize> = None;

    for (pos, token) in tokens.iter().enumerate() {
        let continues = run_start
            .map(|start| {
                let prev = &tokens[pos - 1];
                !token.ent.is_empty()
                    && prev.ent == token.ent
                    && adjacent(prev, token)
                    && !is_coordinating_conjunction(token)
                    && !(pos > start && is_title_word(token))
            })
            .unwrap_or(false);

        if run_start.is_some() && !continues {
            raw_runs.push((run_start.take().unwrap(), pos));
        }
        if run_start.is_none() && !token.ent.is_empty() && !is_coordinating_conjunction(token) {
            run_start = Some(pos);
        }
    }
    if let Some(start) = run_start {
        raw_runs.push((start, tokens.len()));
    }

    raw_runs
        .into_iter()
        .map(|(start, end)| repair_run(tokens, start, end))
        .map(|(start, end)| make_candidate(tokens, start, end, input.sentence_index))
        .collect()
}

/// Applies the leading-determiner strip, forward particle extension, and
/// backward title absorption to one raw NER-agreement run.
fn repair_run(tokens: &[Token], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && tokens[start].pos == "DET" {
        start += 1;
    }
    if start >= end {
        return (start, end);
    }

    if tokens[start].ent == "PERSON" {
        let mut cursor = end;
        loop {
            let Some(particle) = tokens.get(cursor) else {
                break;
            };
            if !adjacent(&tokens[cursor - 1], particle) {
                break;
            }
            if !NAME_PARTICLES.contains(&particle.text.to_lowercase().as_str()) {
                break;
            }
            let Some(surname) = tokens.get(cursor + 1) else {
                break;
            };
            if surname.pos != "PROPN" || !adjacent(particle, surname) {
                break;
            }
            cursor += 2;
        }
        end = cursor;
    }

    if start > 0 {
        let prev = &tokens[start - 1];
        if is_title_word(prev) && adjacent(prev, &tokens[start]) {
            start -= 1;
        }
    }

    (start, end)
}

fn make_candidate(tokens: &[Token], run_start: usize, run_end: usize, sentence_index: usize) -> Candidate {
    let run = &tokens[run_start..run_end];
    let surface = run.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
    Candidate {
        surface,
        start: run.first().map(|t| t.start).unwrap_or(0),
        end: run.last().map(|t| t.end).unwrap_or(0),
        token_indices: run.iter().map(|t| t.i).collect(),
        source: MentionSource::Ner,
        sentence_index,
        ner_hint: run.iter().find(|t| !t.ent.is_empty()).map(|t| t.ent.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::lexicon::LexiconBundle;
    use crate::model::ParsedSentence;

    fn tok(i: usize, text: &str, ent: &str, start: usize) -> Token {
        let end = start + text.chars().count();
        Token {
            i,
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: "PROPN".to_string(),
            dep: "compound".to_string(),
            head: i,
            ent: ent.to_string(),
            start,
            end,
        }
    }

    fn run(sentence: &ParsedSentence) -> Vec<Candidate> {
        let lexicon = LexiconBundle::load();
        let config = ExtractionConfig::default();
        let input = NominatorInput {
            sentence,
            sentence_index: 0,
            sentence_text: "",
            lexicon: &lexicon,
            config: &config,
        };
        nominate(&input)
    }

    #[test]
    fn merges_consecutive_same_label_tokens() {
        let sentence = ParsedSentence {
            start: 0,
            end: 12,
            tokens: vec![tok(0, "Harry", "PERSON", 0), tok(1, "Potter", "PERSON", 6)],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].surface, "Harry Potter");
        assert_eq!(candidates[0].ner_hint.as_deref(), Some("PERSON"));
    }

    #[test]
    fn splits_on_label_change() {
        let sentence = ParsedSentence {
            start: 0,
            end: 17,
            tokens: vec![tok(0, "Harry", "PERSON", 0), tok(1, "Gondor", "GPE", 9)],
        };
        assert_eq!(run(&sentence).len(), 2);
    }

    #[test]
    fn gap_wider_than_one_character_breaks_the_run() {
        let mut first = tok(0, "Harry", "PERSON", 0);
        first.end = 5;
        let mut second = tok(1, "Potter", "PERSON", 10);
        second.start = 10;
        let sentence = ParsedSentence {
            start: 0,
            end: 20,
            tokens: vec![first, second],
        };
        assert_eq!(run(&sentence).len(), 2);
    }

    #[test]
    fn coordinating_conjunction_never_joins_two_people() {
        let mut and_tok = tok(1, "and", "PERSON", 6);
        and_tok.pos = "CCONJ".to_string();
        let sentence = ParsedSentence {
            start: 0,
            end: 17,
            tokens: vec![tok(0, "James", "PERSON", 0), and_tok, tok(2, "Lily", "PERSON", 10)],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].surface, "James");
        assert_eq!(candidates[1].surface, "Lily");
    }

    #[test]
    fn title_word_mid_run_starts_a_new_person() {
        let mut dr = tok(1, "Dr", "PERSON", 6);
        dr.pos = "PROPN".to_string();
        let sentence = ParsedSentence {
            start: 0,
            end: 25,
            tokens: vec![tok(0, "Smith", "PERSON", 0), dr, tok(2, "Jones", "PERSON", 9)],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].surface, "Smith");
        assert_eq!(candidates[1].surface, "Dr Jones");
    }

    #[test]
    fn leading_determiner_is_stripped() {
        let mut det = tok(0, "The", "ORG", 0);
        det.pos = "DET".to_string();
        let sentence = ParsedSentence {
            start: 0,
            end: 12,
            tokens: vec![det, tok(1, "Order", "ORG", 4)],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].surface, "Order");
    }

    #[test]
    fn person_run_extends_forward_through_name_particle() {
        let mut van = tok(1, "van", "", 7);
        van.pos = "ADP".to_string();
        let sentence = ParsedSentence {
            start: 0,
            end: 22,
            tokens: vec![
                tok(0, "Ludwig", "PERSON", 0),
                van,
                tok(2, "Beethoven", "", 11),
            ],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].surface, "Ludwig van Beethoven");
    }

    #[test]
    fn title_word_before_run_is_absorbed_backward() {
        let mut professor = tok(0, "Professor", "", 0);
        professor.pos = "PROPN".to_string();
        let sentence = ParsedSentence {
            start: 0,
            end: 21,
            tokens: vec![professor, tok(1, "McGonagall", "PERSON", 10)],
        };
        let candidates = run(&sentence);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].surface, "Professor McGonagall");
    }
}
