//! Read-only, versioned lexicon bundles (§6, [AMBIENT-4]).
//!
//! Mirrors the teacher's runtime lexicon loader
//! (`logicaffeine_lexicon::runtime::LexiconIndex`): a JSON asset is embedded
//! at compile time with `include_str!` and parsed once into a
//! [`LexiconBundle`]. Every field here corresponds to one of the lexicon
//! resources named in §6: title prefixes, name particles,
//! stopwords/pronouns/months, the person-role lexicon, the generic-title
//! set, the fantasy headword sets, event keywords, geographic/
//! organisational marker lists, known-places/known-orgs sets, the
//! ambiguous-place cue set, and the nickname-equivalence table.
//!
//! [`LexiconBundle`] is read-only after construction and is safely shared
//! across documents (§5): clone it once per process (or wrap in an `Arc`)
//! and hand out `&LexiconBundle` to each extraction.

pub mod regexes;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::model::EntityType;

const LEXICON_JSON: &str = include_str!("../../assets/lexicon.json");

/// Raw JSON shape of `assets/lexicon.json`.
#[derive(Debug, Deserialize)]
struct RawLexicon {
    version: String,
    title_prefixes: Vec<String>,
    name_particles: Vec<String>,
    stopwords: Vec<String>,
    pronouns: Vec<String>,
    months: Vec<String>,
    person_role_lexicon: Vec<String>,
    generic_titles: Vec<String>,
    common_interjections: Vec<String>,
    fantasy_headwords: HashMap<String, Vec<String>>,
    event_keywords: Vec<String>,
    geographic_markers: Vec<String>,
    organisational_markers: Vec<String>,
    school_suffixes: Vec<String>,
    known_places: Vec<String>,
    known_orgs: Vec<String>,
    ambiguous_place_cues: Vec<String>,
    nickname_table: HashMap<String, Vec<String>>,
}

fn to_lower_set(words: &[String]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// An indexed, read-only lexicon bundle.
#[derive(Debug, Clone)]
pub struct LexiconBundle {
    version: String,
    title_prefixes: BTreeSet<String>,
    name_particles: BTreeSet<String>,
    stopwords: BTreeSet<String>,
    pronouns: BTreeSet<String>,
    months: BTreeSet<String>,
    person_role_lexicon: BTreeSet<String>,
    generic_titles: BTreeSet<String>,
    common_interjections: BTreeSet<String>,
    /// EntityType -> lowercase headwords for that fantasy type.
    fantasy_headwords: BTreeMap<EntityType, BTreeSet<String>>,
    event_keywords: BTreeSet<String>,
    geographic_markers: BTreeSet<String>,
    organisational_markers: BTreeSet<String>,
    school_suffixes: Vec<String>,
    known_places: BTreeSet<String>,
    known_orgs: BTreeSet<String>,
    ambiguous_place_cues: BTreeSet<String>,
    /// lowercase nickname -> canonical first name (as written in the table).
    nickname_to_canonical: HashMap<String, String>,
    /// lowercase canonical first name -> its nicknames.
    canonical_to_nicknames: HashMap<String, Vec<String>>,
}

fn fantasy_type_from_key(key: &str) -> Option<EntityType> {
    match key {
        "SPELL" => Some(EntityType::Spell),
        "ARTIFACT" => Some(EntityType::Artifact),
        "CREATURE" => Some(EntityType::Creature),
        "RACE" => Some(EntityType::Race),
        "DEITY" => Some(EntityType::Deity),
        "ABILITY" => Some(EntityType::Ability),
        "MATERIAL" => Some(EntityType::Material),
        "POTION" => Some(EntityType::Item),
        _ => None,
    }
}

impl LexiconBundle {
    /// Loads and parses the embedded lexicon JSON. Panics on malformed
    /// asset data, the same way the teacher's `LexiconIndex::new()` does --
    /// this is a build-time asset, not caller input, so a panic here means
    /// the crate itself shipped broken.
    pub fn load() -> Self {
        let raw: RawLexicon =
            serde_json::from_str(LEXICON_JSON).expect("failed to parse embedded lexicon.json");

        let mut fantasy_headwords = BTreeMap::new();
        for (key, words) in &raw.fantasy_headwords {
            if let Some(entity_type) = fantasy_type_from_key(key) {
                fantasy_headwords.insert(entity_type, to_lower_set(words));
            }
        }

        let mut nickname_to_canonical = HashMap::new();
        let mut canonical_to_nicknames = HashMap::new();
        for (canonical, nicknames) in &raw.nickname_table {
            canonical_to_nicknames.insert(canonical.to_lowercase(), nicknames.clone());
            for nick in nicknames {
                nickname_to_canonical.insert(nick.to_lowercase(), canonical.clone());
            }
        }

        LexiconBundle {
            version: raw.version,
            title_prefixes: to_lower_set(&raw.title_prefixes),
            name_particles: to_lower_set(&raw.name_particles),
            stopwords: to_lower_set(&raw.stopwords),
            pronouns: to_lower_set(&raw.pronouns),
            months: to_lower_set(&raw.months),
            person_role_lexicon: to_lower_set(&raw.person_role_lexicon),
            generic_titles: to_lower_set(&raw.generic_titles),
            common_interjections: to_lower_set(&raw.common_interjections),
            fantasy_headwords,
            event_keywords: to_lower_set(&raw.event_keywords),
            geographic_markers: to_lower_set(&raw.geographic_markers),
            organisational_markers: to_lower_set(&raw.organisational_markers),
            school_suffixes: raw.school_suffixes.iter().map(|s| s.to_lowercase()).collect(),
            known_places: to_lower_set(&raw.known_places),
            known_orgs: to_lower_set(&raw.known_orgs),
            ambiguous_place_cues: to_lower_set(&raw.ambiguous_place_cues),
            nickname_to_canonical,
            canonical_to_nicknames,
        }
    }

    /// Bundle revision, recorded in the debug report's `extraction_metadata`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_title_prefix(&self, word: &str) -> bool {
        self.title_prefixes.contains(&word.to_lowercase())
    }

    pub fn is_name_particle(&self, word: &str) -> bool {
        self.name_particles.contains(&word.to_lowercase())
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn is_pronoun(&self, word: &str) -> bool {
        self.pronouns.contains(&word.to_lowercase())
    }

    pub fn is_month(&self, word: &str) -> bool {
        self.months.contains(&word.to_lowercase())
    }

    pub fn is_person_role(&self, word: &str) -> bool {
        self.person_role_lexicon.contains(&word.to_lowercase())
    }

    pub fn is_generic_title(&self, word: &str) -> bool {
        self.generic_titles.contains(&word.to_lowercase())
    }

    pub fn is_common_interjection(&self, word: &str) -> bool {
        self.common_interjections.contains(&word.to_lowercase())
    }

    pub fn is_event_keyword(&self, word: &str) -> bool {
        self.event_keywords.contains(&word.to_lowercase())
    }

    pub fn is_geographic_marker(&self, word: &str) -> bool {
        self.geographic_markers.contains(&word.to_lowercase())
    }

    pub fn is_organisational_marker(&self, word: &str) -> bool {
        self.organisational_markers.contains(&word.to_lowercase())
    }

    pub fn has_school_suffix(&self, surface: &str) -> bool {
        let lower = surface.to_lowercase();
        self.school_suffixes.iter().any(|s| lower.ends_with(s.as_str()))
    }

    pub fn is_known_place(&self, surface: &str) -> bool {
        self.known_places.contains(&surface.to_lowercase())
    }

    pub fn is_known_org(&self, surface: &str) -> bool {
        self.known_orgs.contains(&surface.to_lowercase())
    }

    pub fn is_ambiguous_place_cue(&self, word: &str) -> bool {
        self.ambiguous_place_cues.contains(&word.to_lowercase())
    }

    /// Headword lookup for the fantasy type lexicons (RACE, CREATURE,
    /// ARTIFACT, SPELL, DEITY, MATERIAL, ABILITY, and POTION-as-ITEM).
    /// Returns the first matching type in a stable priority order.
    pub fn fantasy_headword_type(&self, word: &str) -> Option<EntityType> {
        let lower = word.to_lowercase();
        const PRIORITY: [EntityType; 8] = [
            EntityType::Spell,
            EntityType::Artifact,
            EntityType::Creature,
            EntityType::Race,
            EntityType::Deity,
            EntityType::Ability,
            EntityType::Material,
            EntityType::Item,
        ];
        for entity_type in PRIORITY {
            if let Some(words) = self.fantasy_headwords.get(&entity_type) {
                if words.contains(&lower) {
                    return Some(entity_type);
                }
            }
        }
        None
    }

    /// Is `first_name` a documented canonical first name with nicknames?
    pub fn nicknames_of(&self, first_name: &str) -> &[String] {
        self.canonical_to_nicknames
            .get(&first_name.to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Resolves a nickname back to its canonical first name, if documented.
    pub fn canonical_for_nickname(&self, nickname: &str) -> Option<&str> {
        self.nickname_to_canonical
            .get(&nickname.to_lowercase())
            .map(|s| s.as_str())
    }

    /// `true` if `a` and `b` are nickname-equivalent first names (in either
    /// direction), used by post-processing nickname folding (§4.7).
    pub fn are_nickname_equivalent(&self, a: &str, b: &str) -> bool {
        let a_lower = a.to_lowercase();
        let b_lower = b.to_lowercase();
        if a_lower == b_lower {
            return true;
        }
        if self
            .nicknames_of(a)
            .iter()
            .any(|n| n.to_lowercase() == b_lower)
        {
            return true;
        }
        if self
            .nicknames_of(b)
            .iter()
            .any(|n| n.to_lowercase() == a_lower)
        {
            return true;
        }
        matches!(
            (self.canonical_for_nickname(&a_lower), self.canonical_for_nickname(&b_lower)),
            (Some(ca), Some(cb)) if ca.to_lowercase() == cb.to_lowercase()
        )
    }
}

impl Default for LexiconBundle {
    fn default() -> Self {
        Self::load()
    }
}
