//! The optional JSON debug artifact (§6), emitted when
//! [`crate::config::Toggles::entity_decisions`] is set.
//!
//! Field names and nesting are binary-exact per §6's contract: `run_id`,
//! `document_id`, `created_at`, `summary.counts`, and one `entities[]` row
//! per entity minted this run -- including entities later folded away by
//! post-processing or beaten in span-conflict resolution, so a reviewer can
//! see why an entity that appeared mid-pipeline isn't in the final output.
//! Never part of the core [`crate::ExtractionOutput`] return value -- callers
//! who want it ask for it explicitly via [`crate::extract_with_debug`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EntitySpan, EntityType};
use crate::pipeline::ExtractionOutput;
use crate::postprocess::EntityDecision;

/// One row of `entities[]`: `{ id, original_type, final_type, rejected,
/// name, spans, notes, issues }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugEntityEntry {
    pub id: Uuid,
    pub original_type: EntityType,
    pub final_type: EntityType,
    pub rejected: bool,
    pub name: String,
    pub spans: Vec<EntitySpan>,
    pub notes: Vec<String>,
    pub issues: Vec<String>,
}

impl From<&EntityDecision> for DebugEntityEntry {
    fn from(decision: &EntityDecision) -> Self {
        DebugEntityEntry {
            id: decision.id,
            original_type: decision.original_type,
            final_type: decision.final_type,
            rejected: decision.rejected,
            name: decision.name.clone(),
            spans: decision.spans.clone(),
            notes: decision.notes.clone(),
            issues: decision.issues.clone(),
        }
    }
}

/// `summary.counts`: how many of this run's entities ended up in each state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSummary {
    pub counts: BTreeMap<String, usize>,
}

impl DebugSummary {
    fn from_entries(entries: &[DebugEntityEntry]) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert("total".to_string(), entries.len());
        counts.insert("kept".to_string(), entries.iter().filter(|e| !e.rejected).count());
        counts.insert("rejected".to_string(), entries.iter().filter(|e| e.rejected).count());
        for entry in entries {
            *counts.entry(format!("type:{}", entry.final_type)).or_insert(0) += 1;
        }
        DebugSummary { counts }
    }
}

/// The full debug report: `{ run_id, document_id, created_at,
/// summary{counts}, entities[...], extraction_metadata }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugReport {
    pub run_id: Uuid,
    pub document_id: String,
    pub created_at: DateTime<Utc>,
    pub summary: DebugSummary,
    pub entities: Vec<DebugEntityEntry>,
    pub extraction_metadata: ExtractionMetadata,
}

/// Metadata identifying one extraction run, independent of its results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub doc_id: String,
    pub lexicon_version: String,
    pub promotion_threshold: usize,
}

impl DebugReport {
    pub fn new(
        document_id: impl Into<String>,
        lexicon_version: impl Into<String>,
        promotion_threshold: usize,
        output: &ExtractionOutput,
        created_at: DateTime<Utc>,
    ) -> Self {
        let document_id = document_id.into();
        let entities: Vec<DebugEntityEntry> = output.decisions.iter().map(DebugEntityEntry::from).collect();
        let summary = DebugSummary::from_entries(&entities);

        DebugReport {
            run_id: Uuid::new_v4(),
            extraction_metadata: ExtractionMetadata {
                doc_id: document_id.clone(),
                lexicon_version: lexicon_version.into(),
                promotion_threshold,
            },
            document_id,
            created_at,
            summary,
            entities,
        }
    }

    /// Serialises the report as pretty JSON, matching §6's debug artifact contract.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
