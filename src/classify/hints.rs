//! Context hint extraction from the dependency graph (§4.3).

use crate::lexicon::LexiconBundle;
use crate::model::{ParsedSentence, Token};

/// Dependency-derived context for a single candidate, used by both the
/// meaning gate and the type oracle.
#[derive(Debug, Clone, Default)]
pub struct ContextHints {
    /// Lemma of the governing verb, if the head (or an ancestor within the
    /// sentence) is a verb.
    pub governing_verb: Option<String>,
    /// Dependency role of the head token (`nsubj`, `dobj`, `pobj`, `appos`, ...).
    pub head_role: String,
    /// Preposition lemma, populated only when `head_role == "pobj"`.
    pub preposition: Option<String>,
    /// Verb lemmas within a five-token window of the candidate.
    pub nearby_verbs: Vec<String>,
    /// Preposition lemmas within a five-token window of the candidate.
    pub nearby_prepositions: Vec<String>,
    /// NER label of the head token, if any.
    pub head_ner: Option<String>,
}

const WINDOW: usize = 5;

/// Extracts [`ContextHints`] for the candidate spanning `token_indices`
/// within `sentence`.
pub fn extract_hints(sentence: &ParsedSentence, token_indices: &[usize]) -> ContextHints {
    let mut hints = ContextHints::default();
    let Some(&first_idx) = token_indices.first() else {
        return hints;
    };
    let Some(first) = sentence.token(first_idx) else {
        return hints;
    };

    if let Some(head) = sentence.head_of(first) {
        hints.head_role = first.dep.clone();
        hints.head_ner = if head.ent.is_empty() {
            None
        } else {
            Some(head.ent.clone())
        };
        if head.pos == "VERB" {
            hints.governing_verb = Some(head.lemma.clone());
        } else if first.dep == "pobj" {
            hints.preposition = Some(head.lemma.to_lowercase());
            // Walk up one more level to find the verb governing the PP.
            if let Some(grandhead) = sentence.head_of(head) {
                if grandhead.pos == "VERB" {
                    hints.governing_verb = Some(grandhead.lemma.clone());
                }
            }
        }
    } else {
        hints.head_role = "ROOT".to_string();
    }

    let pos_in_sentence = sentence
        .tokens
        .iter()
        .position(|t| t.i == first_idx)
        .unwrap_or(0);
    let lo = pos_in_sentence.saturating_sub(WINDOW);
    let hi = (pos_in_sentence + WINDOW + 1).min(sentence.tokens.len());
    for tok in &sentence.tokens[lo..hi] {
        if tok.pos == "VERB" && !hints.nearby_verbs.contains(&tok.lemma) {
            hints.nearby_verbs.push(tok.lemma.clone());
        }
        if tok.pos == "ADP" && !hints.nearby_prepositions.contains(&tok.lemma.to_lowercase()) {
            hints.nearby_prepositions.push(tok.lemma.to_lowercase());
        }
    }

    hints
}

/// `true` if every token in `token_indices` is tagged PROPN.
pub fn all_propn(sentence: &ParsedSentence, token_indices: &[usize]) -> bool {
    !token_indices.is_empty()
        && token_indices.iter().all(|&i| {
            sentence
                .token(i)
                .map(|t| t.pos == "PROPN")
                .unwrap_or(false)
        })
}

/// `true` if the candidate's first token is the first token of the sentence.
pub fn is_sentence_initial(sentence: &ParsedSentence, token_indices: &[usize]) -> bool {
    match (token_indices.first(), sentence.tokens.first()) {
        (Some(&first), Some(sentence_first)) => first == sentence_first.i,
        _ => false,
    }
}

/// `true` if the token immediately preceding `token_indices[0]` within the
/// sentence is lowercase (used by the meaning gate's "lowercase predecessor"
/// trigger).
pub fn has_lowercase_predecessor(sentence: &ParsedSentence, token_indices: &[usize]) -> bool {
    let Some(&first_idx) = token_indices.first() else {
        return false;
    };
    let pos = match sentence.tokens.iter().position(|t| t.i == first_idx) {
        Some(p) => p,
        None => return false,
    };
    if pos == 0 {
        return false;
    }
    let prev = &sentence.tokens[pos - 1];
    prev.text
        .chars()
        .next()
        .map(|c| c.is_lowercase())
        .unwrap_or(false)
}

/// `true` if `token_indices` sits in a textual introduction cue (§4.4):
/// `named X` immediately before the span, or `X, a <role>` / `X, an <role>`
/// immediately after it, where `<role>` is a person role or generic title.
pub fn has_introduction_cue(sentence: &ParsedSentence, token_indices: &[usize], lexicon: &LexiconBundle) -> bool {
    let Some(&first_idx) = token_indices.first() else {
        return false;
    };
    let Some(&last_idx) = token_indices.last() else {
        return false;
    };

    if let Some(pos) = sentence.tokens.iter().position(|t| t.i == first_idx) {
        if pos > 0 {
            let prev = &sentence.tokens[pos - 1];
            if prev.lemma.eq_ignore_ascii_case("name") || prev.text.eq_ignore_ascii_case("named") {
                return true;
            }
        }
    }

    if let Some(pos) = sentence.tokens.iter().position(|t| t.i == last_idx) {
        let rest = &sentence.tokens[pos + 1..];
        if let [comma, det, role, ..] = rest {
            if comma.text == "," && (det.text.eq_ignore_ascii_case("a") || det.text.eq_ignore_ascii_case("an")) {
                let role_word = role.lemma.as_str();
                if lexicon.is_person_role(role_word) || lexicon.is_generic_title(role_word) {
                    return true;
                }
            }
        }
    }

    false
}

/// The token immediately following `token_indices` within the sentence, if any.
pub fn following_token<'a>(sentence: &'a ParsedSentence, token_indices: &[usize]) -> Option<&'a Token> {
    let &last_idx = token_indices.last()?;
    let pos = sentence.tokens.iter().position(|t| t.i == last_idx)?;
    sentence.tokens.get(pos + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Token;

    fn tok(i: usize, text: &str, pos: &str, dep: &str, head: usize, ent: &str, start: usize) -> Token {
        let end = start + text.chars().count();
        Token {
            i,
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: pos.to_string(),
            dep: dep.to_string(),
            head,
            ent: ent.to_string(),
            start,
            end,
        }
    }

    fn sentence() -> ParsedSentence {
        // "Harry visited Hogwarts ."
        ParsedSentence {
            start: 0,
            end: 24,
            tokens: vec![
                tok(0, "Harry", "PROPN", "nsubj", 1, "PERSON", 0),
                tok(1, "visited", "VERB", "ROOT", 1, "", 6),
                tok(2, "Hogwarts", "PROPN", "dobj", 1, "ORG", 14),
                tok(3, ".", "PUNCT", "punct", 1, "", 22),
            ],
        }
    }

    #[test]
    fn extracts_governing_verb_for_dobj() {
        let s = sentence();
        let hints = extract_hints(&s, &[2]);
        assert_eq!(hints.governing_verb.as_deref(), Some("visited"));
        assert_eq!(hints.head_role, "dobj");
    }

    #[test]
    fn sentence_initial_detection() {
        let s = sentence();
        assert!(is_sentence_initial(&s, &[0]));
        assert!(!is_sentence_initial(&s, &[2]));
    }

    #[test]
    fn all_propn_detection() {
        let s = sentence();
        assert!(all_propn(&s, &[0]));
        assert!(!all_propn(&s, &[1]));
    }

    #[test]
    fn introduction_cue_detects_role_appositive() {
        // "Tom , a wizard ."
        let s = ParsedSentence {
            start: 0,
            end: 14,
            tokens: vec![
                tok(0, "Tom", "PROPN", "nsubj", 0, "", 0),
                tok(1, ",", "PUNCT", "punct", 0, "", 3),
                tok(2, "a", "DET", "det", 3, "", 5),
                tok(3, "wizard", "NOUN", "attr", 0, "", 7),
                tok(4, ".", "PUNCT", "punct", 0, "", 13),
            ],
        };
        let lexicon = LexiconBundle::load();
        assert!(has_introduction_cue(&s, &[0], &lexicon));
    }

    #[test]
    fn introduction_cue_detects_named_prefix() {
        // "named Tom"
        let s = ParsedSentence {
            start: 0,
            end: 9,
            tokens: vec![tok(0, "named", "VERB", "acl", 1, "", 0), tok(1, "Tom", "PROPN", "dobj", 0, "", 6)],
        };
        let lexicon = LexiconBundle::load();
        assert!(has_introduction_cue(&s, &[1], &lexicon));
    }
}
