//! Stage (6): type inference, identity minting, and alias-strength
//! classification (§4.6).
//!
//! Identity is deferred all the way to this stage: a [`uuid::Uuid`] is
//! generated only once a cluster has cleared promotion (§9's "mint last"
//! design note), so nothing upstream ever has to reason about entity
//! identity before it's earned. Type inference runs a fixed signal
//! cascade -- headword, NER consensus, grammatical role, capitalization,
//! whitelist, fallback -- and records which signal won in
//! [`crate::model::TypeSignal`] for later review.

use chrono::Utc;
use uuid::Uuid;

use crate::classify;
use crate::lexicon::LexiconBundle;
use crate::model::{AliasStrength, Entity, EntityAttrs, EntitySpan, EntityType, MentionCluster, TypeSignal};
use crate::promote::Promoted;
use crate::stats::ExtractionStats;

fn infer_type(cluster: &MentionCluster, lexicon: &LexiconBundle) -> (EntityType, TypeSignal) {
    if let Some(last_word) = cluster.canonical.split_whitespace().last() {
        if let Some(t) = lexicon.fantasy_headword_type(last_word) {
            return (t, TypeSignal::Headword);
        }
        if lexicon.is_person_role(last_word) {
            return (EntityType::Person, TypeSignal::Headword);
        }
        if lexicon.is_organisational_marker(last_word) || lexicon.has_school_suffix(&cluster.canonical) {
            return (EntityType::Org, TypeSignal::Headword);
        }
        if lexicon.is_geographic_marker(last_word) || lexicon.is_ambiguous_place_cue(last_word) {
            return (EntityType::Place, TypeSignal::Headword);
        }
        if lexicon.is_event_keyword(last_word) {
            return (EntityType::Event, TypeSignal::Headword);
        }
    }
    if lexicon.is_known_place(&cluster.canonical) {
        return (EntityType::Place, TypeSignal::Headword);
    }
    if lexicon.is_known_org(&cluster.canonical) {
        return (EntityType::Org, TypeSignal::Headword);
    }

    if let Some(ner) = cluster.representative_ner() {
        match ner {
            "PERSON" => return (EntityType::Person, TypeSignal::NerConsensus),
            "ORG" => return (EntityType::Org, TypeSignal::NerConsensus),
            "GPE" | "LOC" => return (EntityType::Place, TypeSignal::NerConsensus),
            "DATE" => return (EntityType::Date, TypeSignal::NerConsensus),
            _ => {}
        }
    }

    let person_role_count = cluster
        .mentions
        .iter()
        .filter(|m| matches!(m.dep_role.as_str(), "nsubj" | "nsubjpass" | "appos"))
        .count();
    let all_propn = cluster.mentions.iter().all(|m| m.all_propn);
    if all_propn && person_role_count * 2 >= cluster.mention_count() {
        return (EntityType::Person, TypeSignal::Grammatical);
    }

    if all_propn {
        return (EntityType::Person, TypeSignal::Capitalization);
    }

    (EntityType::Misc, TypeSignal::Fallback)
}

fn confidence_for(signal: TypeSignal, mention_count: usize) -> f64 {
    let base = match signal {
        TypeSignal::Headword => 0.9,
        TypeSignal::NerConsensus => 0.85,
        TypeSignal::Whitelist => 0.8,
        TypeSignal::Grammatical => 0.7,
        TypeSignal::Capitalization => 0.6,
        TypeSignal::Fallback => 0.5,
    };
    let bonus = ((mention_count.saturating_sub(1)) as f64) * 0.02;
    (base + bonus).min(0.99)
}

/// Classifies how confidently `alias` can stand in for `canonical` (§4.6).
pub fn alias_strength(alias: &str, canonical: &str, lexicon: &LexiconBundle) -> AliasStrength {
    if alias == canonical {
        return AliasStrength::Strong;
    }
    let normalized_alias = classify::normalize_name_with(alias, lexicon);
    let normalized_canonical = classify::normalize_name_with(canonical, lexicon);
    if normalized_alias == normalized_canonical {
        return AliasStrength::Strong;
    }
    if lexicon.are_nickname_equivalent(alias, canonical) {
        return AliasStrength::Strong;
    }

    if alias.split_whitespace().count() > 1 {
        return AliasStrength::Strong;
    }

    let canonical_words: Vec<&str> = canonical.split_whitespace().collect();
    if canonical_words.first() == Some(&alias) {
        return AliasStrength::Strong;
    }
    if canonical_words.last() == Some(&alias) {
        return AliasStrength::Ambiguous;
    }

    AliasStrength::Rejected
}

/// Mints an [`Entity`] plus its [`EntitySpan`]s for one promoted cluster.
pub fn mint_entity(
    promoted: &Promoted,
    lexicon: &LexiconBundle,
    stats: &mut ExtractionStats,
) -> (Entity, Vec<EntitySpan>) {
    let cluster = &promoted.cluster;
    let (entity_type, type_signal) = infer_type(cluster, lexicon);
    let confidence = confidence_for(type_signal, cluster.mention_count());

    let mut aliases = Vec::new();
    for variant in &cluster.alias_variants {
        if variant == &cluster.canonical {
            continue;
        }
        match alias_strength(variant, &cluster.canonical, lexicon) {
            AliasStrength::Rejected => continue,
            _ => {
                aliases.push(variant.clone());
                stats.record_alias();
            }
        }
    }
    aliases.sort();

    let source_set = cluster.mentions.iter().map(|m| m.source).collect();

    let entity = Entity {
        id: Uuid::new_v4(),
        entity_type,
        canonical: cluster.canonical.clone(),
        aliases,
        confidence,
        created_at: Utc::now(),
        attrs: EntityAttrs {
            mention_count: cluster.mention_count(),
            ner_evidence: cluster.ner_hints.clone(),
            headword_signal: if type_signal == TypeSignal::Headword {
                Some(entity_type)
            } else {
                None
            },
            source_set,
            type_signal,
        },
    };
    stats.record_entity(entity_type);

    let spans = cluster
        .mentions
        .iter()
        .map(|m| EntitySpan {
            entity_id: entity.id,
            start: m.start,
            end: m.end,
            surface: m.surface.clone(),
        })
        .collect();

    (entity, spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DurableMention, MentionSource};
    use crate::stats::PromotionReason;

    fn mention(surface: &str, start: usize, ner: Option<&str>, dep_role: &str) -> DurableMention {
        DurableMention {
            surface: surface.to_string(),
            start,
            end: start + surface.chars().count(),
            source: MentionSource::Ner,
            sentence_index: 0,
            ner_hint: ner.map(str::to_string),
            dep_role: dep_role.to_string(),
            all_propn: true,
            sentence_initial: false,
            document_position: start,
            introduction_cue: false,
        }
    }

    #[test]
    fn ner_consensus_infers_person_type() {
        let lexicon = LexiconBundle::load();
        let mut stats = ExtractionStats::new();
        let mut cluster = MentionCluster::new("c0", mention("Harry Potter", 0, Some("PERSON"), "nsubj"));
        cluster.absorb(mention("Potter", 50, Some("PERSON"), "dobj"));
        let promoted = Promoted {
            cluster,
            reason: PromotionReason::MentionThreshold,
        };
        let (entity, spans) = mint_entity(&promoted, &lexicon, &mut stats);
        assert_eq!(entity.entity_type, EntityType::Person);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn headword_signal_beats_ner_for_known_org() {
        let lexicon = LexiconBundle::load();
        let mut stats = ExtractionStats::new();
        let cluster = MentionCluster::new(
            "c0",
            mention("Riverdale High School", 0, Some("ORG"), "nsubj"),
        );
        let promoted = Promoted {
            cluster,
            reason: PromotionReason::MentionThreshold,
        };
        let (entity, _) = mint_entity(&promoted, &lexicon, &mut stats);
        assert_eq!(entity.entity_type, EntityType::Org);
        assert_eq!(entity.attrs.type_signal, TypeSignal::Headword);
    }

    #[test]
    fn nickname_alias_classified_strong() {
        let lexicon = LexiconBundle::load();
        assert_eq!(alias_strength("Jim", "James", &lexicon), AliasStrength::Strong);
        assert_eq!(alias_strength("Robert", "Hermione", &lexicon), AliasStrength::Rejected);
    }

    #[test]
    fn first_token_alias_is_strong_last_token_is_ambiguous() {
        let lexicon = LexiconBundle::load();
        assert_eq!(alias_strength("James", "James Potter", &lexicon), AliasStrength::Strong);
        assert_eq!(alias_strength("Potter", "James Potter", &lexicon), AliasStrength::Ambiguous);
    }

    #[test]
    fn multi_word_alias_is_always_strong() {
        let lexicon = LexiconBundle::load();
        assert_eq!(
            alias_strength("Professor McGonagall", "Minerva McGonagall", &lexicon),
            AliasStrength::Strong
        );
    }
}
