//! Entity extraction and resolution for long-form prose.
//!
//! Turns raw document text plus a precomputed dependency/NER parse into a
//! set of canonical entities -- people, places, organisations, and the
//! fiction-specific vocabulary long-form narrative needs (races, artifacts,
//! spells, deities, and so on) -- each with its aliases, a confidence
//! score, and every character-offset span where it occurs in the document.
//!
//! # Quick start
//!
//! ```no_run
//! use entia_core::{extract, ExtractionConfig, ParsedDocument};
//!
//! let text = "Harry Potter arrived at Hogwarts.";
//! let parsed = ParsedDocument::default(); // produced by your own dependency/NER analyser
//! let config = ExtractionConfig::from_env("doc-1");
//!
//! let output = extract(text, &parsed, &config)?;
//! for entity in &output.entities {
//!     println!("{} ({}) - confidence {:.2}", entity.canonical, entity.entity_type, entity.confidence);
//! }
//! # Ok::<(), entia_core::ExtractionError>(())
//! ```
//!
//! # Pipeline
//!
//! [`extract`] runs seven strictly-ordered stages -- preprocess, nominate,
//! the meaning gate, buffer and cluster, promote, mint, and post-process --
//! documented in their own modules. Nothing later in the pipeline ever
//! mutates an earlier stage's output; each stage hands a fresh value
//! forward.
//!
//! This crate does not itself run NLP models: [`ParsedDocument`] is an
//! external contract the caller fulfils (spaCy, a remote parsing service,
//! whatever produces Universal-POS tokens, dependency labels, and NER tags).

pub mod classify;
pub mod cluster;
pub mod config;
pub mod debug_report;
pub mod error;
pub mod lexicon;
pub mod mint;
pub mod model;
pub mod nominate;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod promote;
pub mod span;
pub mod stats;

pub use config::{ExtractionConfig, PromotionProfile, Toggles};
pub use debug_report::DebugReport;
pub use error::{ExtractionError, RejectReason, Result};
pub use lexicon::LexiconBundle;
pub use model::{
    AliasStrength, Candidate, DurableMention, Entity, EntityAttrs, EntitySpan, EntityType, GateVerdict,
    MentionCluster, MentionSource, ParsedDocument, ParsedSentence, Token, TypeSignal,
};
pub use pipeline::{extract, ExtractionOutput};
pub use span::Span;
pub use stats::{ExtractionStats, PromotionReason};

/// Runs [`extract`] and additionally returns a [`DebugReport`] suitable for
/// serialising to disk, gated behind [`config::Toggles::entity_decisions`]
/// at the call site rather than inside the pipeline itself (§6).
pub fn extract_with_debug(
    text: &str,
    parsed: &ParsedDocument,
    config: &ExtractionConfig,
) -> Result<(ExtractionOutput, DebugReport)> {
    let output = extract(text, parsed, config)?;
    let lexicon_version = LexiconBundle::load().version().to_string();
    let report = DebugReport::new(
        config.doc_id.clone(),
        lexicon_version,
        config.mention_threshold,
        &output,
        chrono::Utc::now(),
    );
    Ok((output, report))
}
