//! Core data model shared by every pipeline stage.
//!
//! This module defines the types in §3 of the spec: the immutable inputs
//! from the external analyser ([`Token`], [`ParsedSentence`]), the closed
//! [`EntityType`] vocabulary, and the types that flow forward through the
//! pipeline (`Candidate` → `DurableMention` → `MentionCluster` → `Entity` +
//! `EntitySpan`).
//!
//! Tokens and sentences are created once by the caller and never mutated.
//! Candidates and durable mentions exist only for the duration of a single
//! [`crate::extract`] call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::span::Span;

/// A single token produced by the external dependency/NER analyser.
///
/// `head` refers to another token's `i` within the same sentence;
/// `head == i` means the token is the sentence root. Offsets (`start`/`end`)
/// are character offsets into the raw document, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Index of this token within its sentence.
    pub i: usize,
    /// Surface text as it appears in the document.
    pub text: String,
    /// Lemmatised base form.
    pub lemma: String,
    /// Part-of-speech tag (Universal POS-style, e.g. `"PROPN"`, `"NOUN"`, `"CCONJ"`).
    pub pos: String,
    /// Dependency relation label (e.g. `"nsubj"`, `"compound"`, `"pobj"`).
    pub dep: String,
    /// Index of the governing token within this sentence.
    pub head: usize,
    /// Named-entity label, empty string if the token carries no NER tag.
    #[serde(default)]
    pub ent: String,
    /// Character offset of the first character of this token (inclusive).
    pub start: usize,
    /// Character offset past the last character of this token (exclusive).
    pub end: usize,
}

impl Token {
    /// This token's span in the document.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// `true` if this token carries an NER label of any kind.
    pub fn has_ner(&self) -> bool {
        !self.ent.is_empty()
    }

    /// `true` if the token's surface starts with an uppercase letter.
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
    }

    /// `true` if this is the root token of its sentence.
    pub fn is_root(&self) -> bool {
        self.head == self.i
    }
}

/// A sentence boundary plus its tokens, as produced by the external analyser.
///
/// Contract: `start`/`end` cover a subset of the document text, `tokens` are
/// ordered by `start`, and every token's `head` points at another token
/// within this same sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSentence {
    /// Character offset of the first character of the sentence (inclusive).
    pub start: usize,
    /// Character offset past the last character of the sentence (exclusive).
    pub end: usize,
    /// Tokens belonging to this sentence, ordered by `start`.
    pub tokens: Vec<Token>,
}

impl ParsedSentence {
    /// This sentence's span in the document.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Looks up a token by its sentence-local index.
    pub fn token(&self, i: usize) -> Option<&Token> {
        self.tokens.iter().find(|t| t.i == i)
    }

    /// Returns the head token of `token`, or `None` if `token` is the root
    /// or its head index is not present in this sentence.
    pub fn head_of<'a>(&'a self, token: &Token) -> Option<&'a Token> {
        if token.is_root() {
            return None;
        }
        self.token(token.head)
    }
}

/// The parsed document handed to [`crate::extract`]: sentence boundaries and
/// their tokens, as produced by the external dependency/NER analyser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParsedDocument {
    /// Sentences ordered by `start`.
    pub sentences: Vec<ParsedSentence>,
}

/// The closed entity type vocabulary (§3).
///
/// Grouped as documented in the spec: core, fiction, ability, and schema
/// extras. Adding a type is purely a data change (§9); no behavior in the
/// pipeline switches on this enum via anything other than lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    // Core
    Person,
    Place,
    Org,
    Event,
    Concept,
    Object,
    // Fiction
    Race,
    Creature,
    Artifact,
    Technology,
    Magic,
    Language,
    Currency,
    Material,
    Drug,
    Deity,
    // Ability
    Ability,
    Skill,
    Power,
    Technique,
    Spell,
    // Schema extras
    Date,
    Time,
    Work,
    Item,
    Misc,
    Species,
    House,
    Tribe,
    Title,
}

impl EntityType {
    /// All entity types, used by exhaustive validator tables (§9).
    pub const ALL: &'static [EntityType] = &[
        EntityType::Person,
        EntityType::Place,
        EntityType::Org,
        EntityType::Event,
        EntityType::Concept,
        EntityType::Object,
        EntityType::Race,
        EntityType::Creature,
        EntityType::Artifact,
        EntityType::Technology,
        EntityType::Magic,
        EntityType::Language,
        EntityType::Currency,
        EntityType::Material,
        EntityType::Drug,
        EntityType::Deity,
        EntityType::Ability,
        EntityType::Skill,
        EntityType::Power,
        EntityType::Technique,
        EntityType::Spell,
        EntityType::Date,
        EntityType::Time,
        EntityType::Work,
        EntityType::Item,
        EntityType::Misc,
        EntityType::Species,
        EntityType::House,
        EntityType::Tribe,
        EntityType::Title,
    ];

    /// Stable lowercase identifier, used in the debug report and stats keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Place => "PLACE",
            EntityType::Org => "ORG",
            EntityType::Event => "EVENT",
            EntityType::Concept => "CONCEPT",
            EntityType::Object => "OBJECT",
            EntityType::Race => "RACE",
            EntityType::Creature => "CREATURE",
            EntityType::Artifact => "ARTIFACT",
            EntityType::Technology => "TECHNOLOGY",
            EntityType::Magic => "MAGIC",
            EntityType::Language => "LANGUAGE",
            EntityType::Currency => "CURRENCY",
            EntityType::Material => "MATERIAL",
            EntityType::Drug => "DRUG",
            EntityType::Deity => "DEITY",
            EntityType::Ability => "ABILITY",
            EntityType::Skill => "SKILL",
            EntityType::Power => "POWER",
            EntityType::Technique => "TECHNIQUE",
            EntityType::Spell => "SPELL",
            EntityType::Date => "DATE",
            EntityType::Time => "TIME",
            EntityType::Work => "WORK",
            EntityType::Item => "ITEM",
            EntityType::Misc => "MISC",
            EntityType::Species => "SPECIES",
            EntityType::House => "HOUSE",
            EntityType::Tribe => "TRIBE",
            EntityType::Title => "TITLE",
        }
    }

    /// Priority used when two entities collide on an identical span (§4.7):
    /// lower number wins. `PERSON > ORG > HOUSE > PLACE > others`.
    pub fn span_conflict_priority(&self) -> u8 {
        match self {
            EntityType::Person => 0,
            EntityType::Org => 1,
            EntityType::House => 2,
            EntityType::Place => 3,
            _ => 4,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which nominator produced a candidate. Also doubles as the source-priority
/// key for span-conflict resolution (§4.7): `DEP > WHITELIST > NER > PATTERN
/// > FALLBACK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MentionSource {
    Ner,
    Dep,
    Gaz,
    Pattern,
    Whitelist,
    Fallback,
}

impl MentionSource {
    /// Lower number wins a span collision: `DEP > WHITELIST > NER > PATTERN > FALLBACK`.
    pub fn conflict_priority(&self) -> u8 {
        match self {
            MentionSource::Dep => 0,
            MentionSource::Whitelist => 1,
            MentionSource::Ner => 2,
            MentionSource::Gaz => 3,
            MentionSource::Pattern => 3,
            MentionSource::Fallback => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MentionSource::Ner => "NER",
            MentionSource::Dep => "DEP",
            MentionSource::Gaz => "GAZ",
            MentionSource::Pattern => "PATTERN",
            MentionSource::Whitelist => "WHITELIST",
            MentionSource::Fallback => "FALLBACK",
        }
    }
}

/// A nominated span before type assignment or durability has been decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Surface text as nominated (pre meaning-gate normalisation).
    pub surface: String,
    pub start: usize,
    pub end: usize,
    /// Indices (sentence-local `i`) of the tokens comprising this candidate.
    pub token_indices: Vec<usize>,
    pub source: MentionSource,
    pub sentence_index: usize,
    /// NER label carried by the candidate's head token, if any.
    pub ner_hint: Option<String>,
}

impl Candidate {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Per-candidate verdict produced by the meaning gate (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateVerdict {
    /// Cannot be a persistent referent; discarded.
    NonEntity,
    /// Names something in this sentence but not persistently; surfaced to
    /// coreference, never minted.
    ContextOnly,
    /// Everything else: proceeds to the mention buffer.
    DurableCandidate,
}

/// A candidate that passed the meaning gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurableMention {
    pub surface: String,
    pub start: usize,
    pub end: usize,
    pub source: MentionSource,
    pub sentence_index: usize,
    pub ner_hint: Option<String>,
    /// Dependency role of the candidate's head token (`nsubj`, `dobj`, `pobj`, `appos`, ...).
    pub dep_role: String,
    /// `true` if every token in this mention's span is tagged PROPN.
    pub all_propn: bool,
    /// `true` if this is the first token of its sentence.
    pub sentence_initial: bool,
    /// Character offset of the first character; used to order mentions by
    /// document position (`document_position` in §3).
    pub document_position: usize,
    /// `true` if the sentence carries a textual introduction cue immediately
    /// around this mention (`named X`, or `X, a <role>`), independent of
    /// `dep_role`.
    pub introduction_cue: bool,
}

impl DurableMention {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// A group of durable mentions judged to refer to the same entity,
/// mutable only during stages (4)–(5) of the pipeline.
#[derive(Debug, Clone)]
pub struct MentionCluster {
    pub id: String,
    pub canonical: String,
    pub mentions: Vec<DurableMention>,
    pub alias_variants: std::collections::BTreeSet<String>,
    /// Multiset of NER labels seen across this cluster's mentions.
    pub ner_hints: BTreeMap<String, usize>,
}

impl MentionCluster {
    pub fn new(id: impl Into<String>, first: DurableMention) -> Self {
        let mut alias_variants = std::collections::BTreeSet::new();
        alias_variants.insert(first.surface.clone());
        alias_variants.insert(crate::classify::normalize_name(&first.surface));
        let mut ner_hints = BTreeMap::new();
        if let Some(hint) = &first.ner_hint {
            *ner_hints.entry(hint.clone()).or_insert(0) += 1;
        }
        let canonical = first.surface.clone();
        MentionCluster {
            id: id.into(),
            canonical,
            mentions: vec![first],
            alias_variants,
            ner_hints,
        }
    }

    pub fn absorb(&mut self, mention: DurableMention) {
        self.alias_variants.insert(mention.surface.clone());
        self.alias_variants
            .insert(crate::classify::normalize_name(&mention.surface));
        if let Some(hint) = &mention.ner_hint {
            *self.ner_hints.entry(hint.clone()).or_insert(0) += 1;
        }
        self.mentions.push(mention);
    }

    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.mentions.iter().map(|m| m.start).collect()
    }

    /// `has_strong_ner` (§4.4): any NER label in `{PERSON, GPE, ORG, LOC}`
    /// with count ≥ 2, or count ≥ 1 when the cluster has ≤ 2 mentions.
    pub fn has_strong_ner(&self) -> bool {
        const STRONG: [&str; 4] = ["PERSON", "GPE", "ORG", "LOC"];
        self.ner_hints.iter().any(|(label, count)| {
            STRONG.contains(&label.as_str())
                && (*count >= 2 || (*count >= 1 && self.mention_count() <= 2))
        })
    }

    /// `has_introduction_pattern` (§4.4): any mention with dependency role
    /// `appos`, or textual cues `X, a <role>` / `named X`.
    pub fn has_introduction_pattern(&self) -> bool {
        self.mentions.iter().any(|m| m.dep_role == "appos" || m.introduction_cue)
    }

    /// The most frequent NER hint, or `None` if the cluster has no hints.
    pub fn representative_ner(&self) -> Option<&str> {
        self.ner_hints
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(label, _)| label.as_str())
    }
}

/// Strength of an alias relative to its entity's canonical form (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasStrength {
    Strong,
    Ambiguous,
    Rejected,
}

/// Which signal won type inference for a promoted cluster (§4.6), recorded
/// for later review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeSignal {
    Headword,
    NerConsensus,
    Grammatical,
    Capitalization,
    Whitelist,
    Fallback,
}

impl TypeSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeSignal::Headword => "headword",
            TypeSignal::NerConsensus => "ner-consensus",
            TypeSignal::Grammatical => "grammatical",
            TypeSignal::Capitalization => "capitalization",
            TypeSignal::Whitelist => "whitelist",
            TypeSignal::Fallback => "fallback",
        }
    }
}

/// Extra bookkeeping attached to a minted entity (§3), kept for debug review
/// and downstream confidence tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAttrs {
    pub mention_count: usize,
    pub ner_evidence: BTreeMap<String, usize>,
    pub headword_signal: Option<EntityType>,
    pub source_set: std::collections::BTreeSet<MentionSource>,
    pub type_signal: TypeSignal,
}

// MentionSource needs to be orderable inside a BTreeSet; already derives Ord above.

/// A canonical entity minted in stage (6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub canonical: String,
    pub aliases: Vec<String>,
    pub confidence: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub attrs: EntityAttrs,
}

/// A character-offset occurrence of an entity in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpan {
    pub entity_id: Uuid,
    pub start: usize,
    pub end: usize,
    pub surface: String,
}

impl EntitySpan {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
