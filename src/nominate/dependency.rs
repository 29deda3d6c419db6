//! Dependency nominator: chains of PROPN tokens headed by a token in a
//! subject/object/appositive/compound role.

use crate::model::{Candidate, MentionSource};
use crate::nominate::NominatorInput;

const HEAD_ROLES: [&str; 5] = ["nsubj", "nsubjpass", "dobj", "pobj", "appos"];

pub fn nominate(input: &NominatorInput) -> Vec<Candidate> {
    let tokens = &input.sentence.tokens;
    let mut candidates = Vec::new();
    let mut seen_heads = std::collections::BTreeSet::new();

    for token in tokens {
        if token.pos != "PROPN" || !HEAD_ROLES.contains(&token.dep.as_str()) {
            continue;
        }
        if !seen_heads.insert(token.i) {
            continue;
        }

        // Absorb any compound children that sit immediately to the left,
        // forming a single multi-word name chain ("Harry" compound-> "Potter").
        let mut chain: Vec<usize> = vec![token.i];
        let mut cursor = token.i;
        while let Some(prev) = tokens
            .iter()
            .find(|t| t.head == cursor && t.dep == "compound" && t.pos == "PROPN" && t.i + 1 == cursor)
        {
            chain.push(prev.i);
            cursor = prev.i;
        }
        chain.sort_unstable();

        let chain_tokens: Vec<&crate::model::Token> = chain
            .iter()
            .filter_map(|&i| tokens.iter().find(|t| t.i == i))
            .collect();
        if chain_tokens.is_empty() {
            continue;
        }

        let surface = chain_tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        candidates.push(Candidate {
            surface,
            start: chain_tokens.first().unwrap().start,
            end: chain_tokens.last().unwrap().end,
            token_indices: chain_tokens.iter().map(|t| t.i).collect(),
            source: MentionSource::Dep,
            sentence_index: input.sentence_index,
            ner_hint: chain_tokens
                .iter()
                .find(|t| t.has_ner())
                .map(|t| t.ent.clone()),
        });
    }

    candidates
}
