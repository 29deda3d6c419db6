//! Stage (5): the promotion gate (§4.5).
//!
//! Decides which clusters earn a minted identity. A cluster can qualify by
//! meeting the configured mention threshold, by exact whitelist match, by
//! carrying strong NER evidence as a singleton (profile-gated), by an
//! introduction pattern ("Tom, a blacksmith"), or by appearing at the head
//! of the document. Everything else is deferred, tagged with the
//! [`RejectReason`] that best explains why.

use crate::config::ExtractionConfig;
use crate::error::RejectReason;
use crate::model::MentionCluster;
use crate::stats::{ExtractionStats, PromotionReason};

/// A cluster that cleared the promotion gate, tagged with the reason it
/// qualified (§6's `promotions_by_reason`).
pub struct Promoted {
    pub cluster: MentionCluster,
    pub reason: PromotionReason,
}

/// A cluster that did not clear the gate this extraction.
pub struct Deferred {
    pub cluster: MentionCluster,
    pub reason: RejectReason,
}

fn whitelist_hit(cluster: &MentionCluster, config: &ExtractionConfig) -> bool {
    config.whitelist_contains(&cluster.canonical) || cluster.alias_variants.iter().any(|v| config.whitelist_contains(v))
}

/// §4.5 condition 5's window: a mention in the document's first ~100
/// characters, sentence-initial, whose own tokens are all PROPN.
const HEADER_WINDOW_CHARS: usize = 100;

fn at_document_head(cluster: &MentionCluster) -> bool {
    cluster
        .mentions
        .iter()
        .any(|m| m.sentence_initial && m.all_propn && m.document_position < HEADER_WINDOW_CHARS)
}

fn promotion_reason(cluster: &MentionCluster, config: &ExtractionConfig) -> Option<PromotionReason> {
    if whitelist_hit(cluster, config) {
        return Some(PromotionReason::Whitelist);
    }
    if cluster.mention_count() >= config.mention_threshold {
        return Some(PromotionReason::MentionThreshold);
    }
    if config.allow_strong_ner_singleton && cluster.has_strong_ner() {
        return Some(PromotionReason::StrongNerSingleton);
    }
    if config.allow_introduction_pattern && cluster.has_introduction_pattern() {
        return Some(PromotionReason::IntroductionPattern);
    }
    if at_document_head(cluster) {
        return Some(PromotionReason::HeaderPosition);
    }
    None
}

fn deferral_reason(cluster: &MentionCluster) -> RejectReason {
    if cluster.mention_count() <= 1 {
        RejectReason::SingleMention
    } else {
        RejectReason::WeakEvidence
    }
}

/// Splits `clusters` into promoted and deferred groups, recording every
/// decision in `stats`.
pub fn promote_clusters(
    clusters: Vec<MentionCluster>,
    config: &ExtractionConfig,
    stats: &mut ExtractionStats,
) -> (Vec<Promoted>, Vec<Deferred>) {
    let mut promoted = Vec::new();
    let mut deferred = Vec::new();

    for cluster in clusters {
        stats.record_cluster(cluster.mention_count());
        match promotion_reason(&cluster, config) {
            Some(reason) => {
                stats.record_promotion(reason);
                promoted.push(Promoted { cluster, reason });
            }
            None => {
                let reason = deferral_reason(&cluster);
                stats.record_deferral(reason);
                deferred.push(Deferred { cluster, reason });
            }
        }
    }

    (promoted, deferred)
}
