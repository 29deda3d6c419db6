//! Stage (7): post-processing (§4.7).
//!
//! Runs after every cluster has been promoted and minted. Three passes that
//! look *across* entities rather than within a single cluster:
//!
//! - acronym merge: `DataFlow Technologies (DFT)` folds the `DFT` entity
//!   into the expansion entity.
//! - handle folding: `@tim_cook` / `tim_cook` folds into a `Tim Cook` entity
//!   if both were minted separately.
//! - nickname folding: `Jim` and `James` fold together even when they ended
//!   up in different NER-incompatible clusters upstream.
//! - event fusion: `Battle` + `Pelennor Fields`, nominated as two spans by
//!   the `EVENT_OF` pattern, fuse into one `Battle of Pelennor Fields` entity.
//!
//! Per §9's "no cluster graph" design note, none of this mutates clusters:
//! it operates purely on minted [`Entity`]/[`EntitySpan`] records and an
//! id-keyed secondary -> primary merge map, applied in a single pass at the
//! end. A final span-conflict pass then resolves any two entities whose
//! spans still overlap, keeping the higher-priority [`EntityType`].

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use crate::lexicon::regexes::{ACRONYM_PAIR, EVENT_OF, UNDERSCORE_HANDLE};
use crate::lexicon::LexiconBundle;
use crate::model::{Entity, EntitySpan, EntityType};
use crate::stats::ExtractionStats;

/// One row of the debug artefact's `entities` array (§6): every entity
/// minted this run, whether it survived every cross-entity pass or was
/// folded/beaten away, with a note on why.
#[derive(Debug, Clone)]
pub struct EntityDecision {
    pub id: Uuid,
    pub name: String,
    pub original_type: EntityType,
    pub final_type: EntityType,
    pub rejected: bool,
    pub spans: Vec<EntitySpan>,
    pub notes: Vec<String>,
    pub issues: Vec<String>,
}

/// Final entities and spans after every cross-entity pass.
pub struct PostprocessOutcome {
    pub entities: Vec<Entity>,
    pub spans: Vec<EntitySpan>,
    pub decisions: Vec<EntityDecision>,
}

/// Runs the full post-processing sequence.
pub fn postprocess(
    entities: Vec<Entity>,
    spans: Vec<EntitySpan>,
    document_text: &str,
    lexicon: &LexiconBundle,
    stats: &mut ExtractionStats,
) -> PostprocessOutcome {
    let mut decisions: BTreeMap<Uuid, EntityDecision> = entities
        .iter()
        .map(|e| {
            (
                e.id,
                EntityDecision {
                    id: e.id,
                    name: e.canonical.clone(),
                    original_type: e.entity_type,
                    final_type: e.entity_type,
                    rejected: false,
                    spans: spans.iter().filter(|s| s.entity_id == e.id).cloned().collect(),
                    notes: Vec::new(),
                    issues: Vec::new(),
                },
            )
        })
        .collect();

    let mut tagged_merges: Vec<((Uuid, Uuid), &'static str)> = Vec::new();
    tagged_merges.extend(acronym_merges(&entities).into_iter().map(|m| (m, "acronym_merge")));
    tagged_merges.extend(handle_merges(&entities).into_iter().map(|m| (m, "handle_merge")));
    tagged_merges.extend(
        nickname_merges(&entities, lexicon)
            .into_iter()
            .map(|m| (m, "nickname_merge")),
    );
    tagged_merges.extend(event_merges(&entities, document_text).into_iter().map(|m| (m, "event_merge")));

    for ((secondary, primary), pass) in &tagged_merges {
        if let Some(decision) = decisions.get_mut(secondary) {
            decision.rejected = true;
            decision.notes.push(format!("merged into {primary} via {pass}"));
        }
    }

    let merges: Vec<(Uuid, Uuid)> = tagged_merges.iter().map(|(m, _)| *m).collect();
    let (entities, spans) = apply_merges(entities, spans, &merges, stats);
    for entity in &entities {
        if let Some(decision) = decisions.get_mut(&entity.id) {
            decision.final_type = entity.entity_type;
        }
    }

    let (entities, spans) = resolve_span_conflicts(entities, spans);
    let surviving_spans: HashMap<Uuid, Vec<EntitySpan>> = spans.iter().fold(HashMap::new(), |mut acc, s| {
        acc.entry(s.entity_id).or_default().push(s.clone());
        acc
    });
    for entity in &entities {
        let Some(decision) = decisions.get_mut(&entity.id) else { continue };
        if decision.rejected {
            continue; // already folded away in the merge pass
        }
        match surviving_spans.get(&entity.id) {
            Some(kept) => decision.spans = kept.clone(),
            None => {
                decision.rejected = true;
                decision.notes.push("lost every span in span-conflict resolution".to_string());
            }
        }
    }

    let decisions = decisions.into_values().collect();

    PostprocessOutcome { entities, spans, decisions }
}

fn initials(canonical: &str) -> String {
    canonical
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// `DFT` <-> `DataFlow Technologies`: the acronym entity's canonical equals
/// the initials of another entity's canonical. The acronym stays canonical;
/// the expansion folds in as its alias.
fn acronym_merges(entities: &[Entity]) -> Vec<(Uuid, Uuid)> {
    let mut merges = Vec::new();
    for acronym in entities {
        if acronym.canonical.len() < 2
            || acronym.canonical.len() > 5
            || !acronym.canonical.chars().all(|c| c.is_ascii_uppercase())
        {
            continue;
        }
        for expansion in entities {
            if expansion.id == acronym.id {
                continue;
            }
            if expansion.canonical.split_whitespace().count() < 2 {
                continue;
            }
            if initials(&expansion.canonical) == acronym.canonical {
                merges.push((expansion.id, acronym.id));
                break;
            }
        }
    }
    merges
}

fn handle_display_form(handle: &str) -> Option<String> {
    let stripped = handle.strip_prefix('@').unwrap_or(handle);
    if !UNDERSCORE_HANDLE.is_match(stripped) {
        return None;
    }
    Some(
        stripped
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// `@tim_cook` / `tim_cook` <-> `Tim Cook`.
fn handle_merges(entities: &[Entity]) -> Vec<(Uuid, Uuid)> {
    let mut merges = Vec::new();
    for handle_entity in entities {
        let Some(display) = handle_display_form(&handle_entity.canonical) else {
            continue;
        };
        for display_entity in entities {
            if display_entity.id == handle_entity.id {
                continue;
            }
            if display_entity.canonical.eq_ignore_ascii_case(&display) {
                merges.push((handle_entity.id, display_entity.id));
                break;
            }
        }
    }
    merges
}

/// `Jim` <-> `James`: nickname-equivalent first names that were minted as
/// separate `PERSON` entities because their source clusters never merged
/// upstream (typically because an NER contradiction kept them apart).
fn nickname_merges(entities: &[Entity], lexicon: &LexiconBundle) -> Vec<(Uuid, Uuid)> {
    let mut merges = Vec::new();
    let mut merged_already = HashSet::new();

    for (i, a) in entities.iter().enumerate() {
        if a.entity_type != EntityType::Person || merged_already.contains(&a.id) {
            continue;
        }
        for b in entities.iter().skip(i + 1) {
            if b.entity_type != EntityType::Person || merged_already.contains(&b.id) {
                continue;
            }
            let a_first = a.canonical.split_whitespace().next().unwrap_or(&a.canonical);
            let b_first = b.canonical.split_whitespace().next().unwrap_or(&b.canonical);
            if a_first.eq_ignore_ascii_case(b_first) {
                continue; // identical first name, not a nickname relationship
            }
            if lexicon.are_nickname_equivalent(a_first, b_first) {
                let (secondary, primary) = if a.attrs.mention_count >= b.attrs.mention_count {
                    (b.id, a.id)
                } else {
                    (a.id, b.id)
                };
                merges.push((secondary, primary));
                merged_already.insert(secondary);
            }
        }
    }
    merges
}

/// `Battle` + `Pelennor Fields` -> `Battle of Pelennor Fields`, detected by
/// re-running `EVENT_OF` over the full document and matching its two
/// captures against separately minted entities.
fn event_merges(entities: &[Entity], document_text: &str) -> Vec<(Uuid, Uuid)> {
    let mut merges = Vec::new();
    for caps in EVENT_OF.captures_iter(document_text) {
        let kw = caps.name("kw").map(|m| m.as_str());
        let obj = caps.name("obj").map(|m| m.as_str());
        let (Some(kw), Some(obj)) = (kw, obj) else { continue };
        let kw_entity = entities.iter().find(|e| e.canonical.eq_ignore_ascii_case(kw));
        let obj_entity = entities.iter().find(|e| e.canonical == obj);
        if let (Some(k), Some(o)) = (kw_entity, obj_entity) {
            if k.id != o.id {
                merges.push((o.id, k.id));
            }
        }
    }
    merges
}

/// Acronym-pair nominations also surface fused spans like
/// `DFT announced DFT results.`; kept here for symmetry with
/// [`event_merges`] even though acronym folding today only needs
/// [`acronym_merges`]'s initials check.
#[allow(dead_code)]
fn acronym_pair_present(document_text: &str) -> bool {
    ACRONYM_PAIR.is_match(document_text)
}

/// Resolves a secondary->primary merge map, chasing chains with union-find,
/// and folds every secondary entity's aliases/evidence into its primary.
fn apply_merges(
    entities: Vec<Entity>,
    mut spans: Vec<EntitySpan>,
    merges: &[(Uuid, Uuid)],
    stats: &mut ExtractionStats,
) -> (Vec<Entity>, Vec<EntitySpan>) {
    if merges.is_empty() {
        return (entities, spans);
    }

    let order: Vec<Uuid> = entities.iter().map(|e| e.id).collect();
    let mut by_id: HashMap<Uuid, Entity> = entities.into_iter().map(|e| (e.id, e)).collect();
    let mut parent: HashMap<Uuid, Uuid> = by_id.keys().map(|&id| (id, id)).collect();

    fn find(parent: &mut HashMap<Uuid, Uuid>, x: Uuid) -> Uuid {
        let p = parent[&x];
        if p == x {
            x
        } else {
            let r = find(parent, p);
            parent.insert(x, r);
            r
        }
    }

    for &(secondary, primary) in merges {
        if !by_id.contains_key(&secondary) || !by_id.contains_key(&primary) {
            continue;
        }
        let rs = find(&mut parent, secondary);
        let rp = find(&mut parent, primary);
        if rs != rp {
            parent.insert(rs, rp);
        }
    }

    for span in &mut spans {
        span.entity_id = find(&mut parent, span.entity_id);
    }

    let mut groups: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    for &id in &order {
        let root = find(&mut parent, id);
        groups.entry(root).or_default().push(id);
    }

    let mut out = Vec::new();
    for id in &order {
        let root = find(&mut parent, *id);
        if root != *id {
            continue;
        }
        let Some(members) = groups.remove(&root) else { continue };
        let mut base = match by_id.remove(&root) {
            Some(e) => e,
            None => continue,
        };
        for member_id in members {
            if member_id == root {
                continue;
            }
            if let Some(secondary) = by_id.remove(&member_id) {
                base.aliases.push(secondary.canonical.clone());
                base.aliases.extend(secondary.aliases);
                base.attrs.mention_count += secondary.attrs.mention_count;
                for (label, count) in secondary.attrs.ner_evidence {
                    *base.attrs.ner_evidence.entry(label).or_insert(0) += count;
                }
                base.attrs.source_set.extend(secondary.attrs.source_set);
                base.confidence = base.confidence.max(secondary.confidence);
                stats.record_merge();
            }
        }
        base.aliases.sort();
        base.aliases.dedup();
        let canonical = base.canonical.clone();
        base.aliases.retain(|a| a != &canonical);
        out.push(base);
    }

    (out, spans)
}

/// The best (lowest) [`MentionSource::conflict_priority`] among an entity's
/// contributing sources, used as the span-conflict tie-break beneath type
/// priority (§4.7, §5: `DEP > WHITELIST > NER > PATTERN > FALLBACK`).
fn best_source_priority(entity: &Entity) -> u8 {
    entity
        .attrs
        .source_set
        .iter()
        .map(|s| s.conflict_priority())
        .min()
        .unwrap_or(u8::MAX)
}

/// Drops the lower-priority entity's span wherever two entities' spans
/// overlap on the same text (§4.7's span-conflict resolution). Ties on
/// [`EntityType::span_conflict_priority`] are broken by source priority, and
/// remaining ties by canonical string, so the surviving span never depends
/// on entity id generation order.
fn resolve_span_conflicts(entities: Vec<Entity>, spans: Vec<EntitySpan>) -> (Vec<Entity>, Vec<EntitySpan>) {
    let type_priority: HashMap<Uuid, u8> = entities
        .iter()
        .map(|e| (e.id, e.entity_type.span_conflict_priority()))
        .collect();
    let source_priority: HashMap<Uuid, u8> = entities.iter().map(|e| (e.id, best_source_priority(e))).collect();
    let canonical: HashMap<Uuid, &str> = entities.iter().map(|e| (e.id, e.canonical.as_str())).collect();

    let rank = |id: Uuid| -> (u8, u8, &str) {
        (
            type_priority.get(&id).copied().unwrap_or(u8::MAX),
            source_priority.get(&id).copied().unwrap_or(u8::MAX),
            canonical.get(&id).copied().unwrap_or(""),
        )
    };

    let mut kept = Vec::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        let beaten = spans.iter().enumerate().any(|(j, other)| {
            if i == j || span.entity_id == other.entity_id {
                return false;
            }
            if !span.span().overlaps(&other.span()) {
                return false;
            }
            rank(other.entity_id) < rank(span.entity_id)
        });
        if !beaten {
            kept.push(span.clone());
        }
    }

    (entities, kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityAttrs, TypeSignal};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn entity(canonical: &str, entity_type: EntityType) -> Entity {
        Entity {
            id: Uuid::new_v4(),
            entity_type,
            canonical: canonical.to_string(),
            aliases: Vec::new(),
            confidence: 0.8,
            created_at: Utc::now(),
            attrs: EntityAttrs {
                mention_count: 1,
                ner_evidence: BTreeMap::new(),
                headword_signal: None,
                source_set: BTreeSet::new(),
                type_signal: TypeSignal::Fallback,
            },
        }
    }

    #[test]
    fn acronym_merges_keep_the_acronym_canonical() {
        let entities = vec![
            entity("DataFlow Technologies", EntityType::Org),
            entity("DFT", EntityType::Org),
        ];
        let merges = acronym_merges(&entities);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0], (entities[0].id, entities[1].id));
    }

    #[test]
    fn handle_merges_into_display_name() {
        let entities = vec![entity("Tim Cook", EntityType::Person), entity("tim_cook", EntityType::Person)];
        let merges = handle_merges(&entities);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].1, entities[0].id);
    }

    #[test]
    fn nickname_merges_distinct_person_entities() {
        let lexicon = LexiconBundle::load();
        let entities = vec![entity("James", EntityType::Person), entity("Jim", EntityType::Person)];
        let merges = nickname_merges(&entities, &lexicon);
        assert_eq!(merges.len(), 1);
    }

    #[test]
    fn apply_merges_folds_secondary_into_primary() {
        let mut stats = ExtractionStats::new();
        let primary = entity("DataFlow Technologies", EntityType::Org);
        let secondary = entity("DFT", EntityType::Org);
        let primary_id = primary.id;
        let secondary_id = secondary.id;
        let spans = vec![EntitySpan {
            entity_id: secondary_id,
            start: 0,
            end: 3,
            surface: "DFT".to_string(),
        }];
        let (entities, spans) = apply_merges(
            vec![primary, secondary],
            spans,
            &[(secondary_id, primary_id)],
            &mut stats,
        );
        assert_eq!(entities.len(), 1);
        assert_eq!(spans[0].entity_id, primary_id);
        assert!(entities[0].aliases.contains(&"DFT".to_string()));
    }

    #[test]
    fn span_conflict_tie_break_prefers_dep_source_over_entity_id() {
        use crate::model::MentionSource;

        let mut dep_backed = entity("Gondor City", EntityType::Misc);
        dep_backed.attrs.source_set.insert(MentionSource::Dep);
        let mut fallback_backed = entity("Gondor", EntityType::Misc);
        fallback_backed.attrs.source_set.insert(MentionSource::Fallback);

        let dep_id = dep_backed.id;
        let fallback_id = fallback_backed.id;
        let spans = vec![
            EntitySpan { entity_id: dep_id, start: 0, end: 11, surface: "Gondor City".to_string() },
            EntitySpan { entity_id: fallback_id, start: 0, end: 6, surface: "Gondor".to_string() },
        ];

        // Run with ids in both orderings to prove the outcome never depends
        // on which Uuid happens to sort lower.
        let (_, kept_a) = resolve_span_conflicts(vec![dep_backed.clone(), fallback_backed.clone()], spans.clone());
        let (_, kept_b) = resolve_span_conflicts(vec![fallback_backed, dep_backed], spans);

        assert_eq!(kept_a.len(), 1);
        assert_eq!(kept_a[0].entity_id, dep_id);
        assert_eq!(kept_b.len(), 1);
        assert_eq!(kept_b[0].entity_id, dep_id);
    }
}
