//! Stage (4): the mention buffer and NER-compatibility-constrained
//! clustering (§4.4).
//!
//! Durable mentions accumulate in document order and are folded into
//! [`MentionCluster`]s by normalised-surface match, nickname equivalence, or
//! alias-variant overlap -- but never across an NER contradiction (a mention
//! tagged `ORG` can never join a cluster whose dominant evidence is
//! `PERSON`). Per §9's "no cyclic cluster graph" design note, clusters live
//! in a flat, insertion-ordered `Vec` and are never linked to one another;
//! any later merging (§4.7) is applied as an id-based rewrite in a single
//! final pass, never by mutating this vector's structure mid-flight.

use std::collections::BTreeSet;

use crate::classify;
use crate::lexicon::LexiconBundle;
use crate::model::{DurableMention, MentionCluster};

/// Groups NER labels into coarse families so a `GPE` mention can still join
/// a cluster whose evidence so far is `LOC`, while an `ORG` mention cannot
/// join a cluster whose evidence is `PERSON`.
fn ner_family(label: &str) -> &'static str {
    match label {
        "PERSON" => "PERSON",
        "ORG" => "ORG",
        "GPE" | "LOC" => "PLACE",
        _ => "OTHER",
    }
}

/// `true` if `cluster`'s accumulated NER evidence does not contradict
/// `mention`'s hint. Clusters with no evidence yet, or mentions with no
/// hint at all, never conflict.
fn ner_compatible(cluster: &MentionCluster, mention: &DurableMention) -> bool {
    let Some(hint) = &mention.ner_hint else {
        return true;
    };
    if cluster.ner_hints.is_empty() {
        return true;
    }
    let mention_family = ner_family(hint);
    if mention_family == "OTHER" {
        return true;
    }
    cluster
        .ner_hints
        .keys()
        .all(|existing| ner_family(existing) == "OTHER" || ner_family(existing) == mention_family)
}

/// `true` if every word of `shorter` appears, case-insensitively, among the
/// words of `longer` -- catches a bare surname or given name ("Potter",
/// "Harry") matching a full name already in the cluster ("Harry Potter")
/// without treating unrelated single-word mentions as automatically
/// equivalent to every multi-word name sharing one common word.
fn is_partial_name_match(shorter: &str, longer: &str) -> bool {
    let shorter_words: Vec<&str> = shorter.split_whitespace().collect();
    let longer_words: BTreeSet<String> = longer.split_whitespace().map(|w| w.to_lowercase()).collect();
    if shorter_words.is_empty() || shorter_words.len() >= longer_words.len() {
        return false;
    }
    shorter_words
        .iter()
        .all(|w| longer_words.contains(&w.to_lowercase()))
}

fn surface_matches(cluster: &MentionCluster, mention: &DurableMention, normalized: &str, lexicon: &LexiconBundle) -> bool {
    if cluster.alias_variants.contains(&mention.surface) || cluster.alias_variants.contains(normalized) {
        return true;
    }
    cluster.alias_variants.iter().any(|variant| {
        lexicon.are_nickname_equivalent(variant, &mention.surface)
            || is_partial_name_match(&mention.surface, variant)
            || is_partial_name_match(variant, &mention.surface)
    })
}

/// Folds `mentions` (already in document order) into clusters.
pub fn cluster_mentions(mentions: Vec<DurableMention>, lexicon: &LexiconBundle) -> Vec<MentionCluster> {
    let mut clusters: Vec<MentionCluster> = Vec::new();
    let mut next_id = 0usize;

    for mention in mentions {
        let normalized = classify::normalize_name_with(&mention.surface, lexicon);
        let existing = clusters.iter().position(|c| {
            surface_matches(c, &mention, &normalized, lexicon) && ner_compatible(c, &mention)
        });

        match existing {
            Some(idx) => clusters[idx].absorb(mention),
            None => {
                let id = format!("cluster-{next_id}");
                next_id += 1;
                clusters.push(MentionCluster::new(id, mention));
            }
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MentionSource;

    fn mention(surface: &str, start: usize, ner: Option<&str>) -> DurableMention {
        DurableMention {
            surface: surface.to_string(),
            start,
            end: start + surface.chars().count(),
            source: MentionSource::Ner,
            sentence_index: 0,
            ner_hint: ner.map(str::to_string),
            dep_role: "nsubj".to_string(),
            all_propn: true,
            sentence_initial: false,
            document_position: start,
            introduction_cue: false,
        }
    }

    #[test]
    fn merges_repeated_surname_into_one_cluster() {
        let lexicon = LexiconBundle::load();
        let mentions = vec![
            mention("Harry Potter", 0, Some("PERSON")),
            mention("Potter", 50, Some("PERSON")),
            mention("Harry", 100, Some("PERSON")),
        ];
        let clusters = cluster_mentions(mentions, &lexicon);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].mention_count(), 3);
    }

    #[test]
    fn nickname_merges_into_canonical_cluster() {
        let lexicon = LexiconBundle::load();
        let mentions = vec![
            mention("James", 0, Some("PERSON")),
            mention("Jim", 40, Some("PERSON")),
        ];
        let clusters = cluster_mentions(mentions, &lexicon);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn ner_contradiction_keeps_clusters_separate() {
        let lexicon = LexiconBundle::load();
        let mentions = vec![
            mention("Washington", 0, Some("PERSON")),
            mention("Washington", 80, Some("GPE")),
        ];
        let clusters = cluster_mentions(mentions, &lexicon);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn unrelated_names_stay_in_separate_clusters() {
        let lexicon = LexiconBundle::load();
        let mentions = vec![mention("Harry", 0, Some("PERSON")), mention("Gondor", 40, None)];
        let clusters = cluster_mentions(mentions, &lexicon);
        assert_eq!(clusters.len(), 2);
    }
}
