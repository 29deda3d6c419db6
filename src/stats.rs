//! Extraction-scoped statistics collector (§6, §9 "Global mutable state").
//!
//! A single [`ExtractionStats`] is passed by `&mut` reference through every
//! stage of one [`crate::extract`] call. It is never shared across calls and
//! is dropped with everything else at the end of the call, matching the
//! "single extraction-scoped stats object" design note in §9.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RejectReason;
use crate::model::{EntityType, GateVerdict, MentionSource};

/// Reason a mention cluster was promoted to an entity (§4.5), recorded for
/// the `promotions_by_reason` stat and the debug report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PromotionReason {
    MentionThreshold,
    Whitelist,
    StrongNerSingleton,
    IntroductionPattern,
    HeaderPosition,
}

impl PromotionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionReason::MentionThreshold => "mention_threshold",
            PromotionReason::Whitelist => "whitelist",
            PromotionReason::StrongNerSingleton => "strong_ner_singleton",
            PromotionReason::IntroductionPattern => "introduction_pattern",
            PromotionReason::HeaderPosition => "header_position",
        }
    }
}

/// Counts of nominations, gate verdicts, clusters, promotions, deferrals,
/// entities, aliases, and rejection reasons for one extraction call (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub nominations_by_source: BTreeMap<String, usize>,
    pub gate_verdicts: BTreeMap<String, usize>,
    pub clusters_singleton: usize,
    pub clusters_multi_mention: usize,
    pub promotions_by_reason: BTreeMap<String, usize>,
    pub deferrals_by_reason: BTreeMap<String, usize>,
    pub entities_by_type: BTreeMap<String, usize>,
    pub aliases_attached: usize,
    pub reject_reasons: BTreeMap<String, usize>,
    pub merges_performed: usize,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_nomination(&mut self, source: MentionSource) {
        *self
            .nominations_by_source
            .entry(source.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_gate_verdict(&mut self, verdict: GateVerdict) {
        let key = match verdict {
            GateVerdict::NonEntity => "NON_ENTITY",
            GateVerdict::ContextOnly => "CONTEXT_ONLY",
            GateVerdict::DurableCandidate => "DURABLE_CANDIDATE",
        };
        *self.gate_verdicts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn record_reject(&mut self, reason: RejectReason) {
        *self
            .reject_reasons
            .entry(reason.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_cluster(&mut self, mention_count: usize) {
        if mention_count <= 1 {
            self.clusters_singleton += 1;
        } else {
            self.clusters_multi_mention += 1;
        }
    }

    pub fn record_promotion(&mut self, reason: PromotionReason) {
        *self
            .promotions_by_reason
            .entry(reason.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_deferral(&mut self, reason: RejectReason) {
        *self
            .deferrals_by_reason
            .entry(reason.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_entity(&mut self, entity_type: EntityType) {
        *self
            .entities_by_type
            .entry(entity_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_alias(&mut self) {
        self.aliases_attached += 1;
    }

    pub fn record_merge(&mut self) {
        self.merges_performed += 1;
    }

    /// Total number of nominations across all sources, used to check the
    /// §8 invariant `sum(stats.gateResults.*) == len(nominations)`.
    pub fn total_nominations(&self) -> usize {
        self.nominations_by_source.values().sum()
    }

    pub fn total_gate_verdicts(&self) -> usize {
        self.gate_verdicts.values().sum()
    }
}
