//! Error types for the extraction pipeline.
//!
//! Per the failure semantics in the spec, almost nothing about a single
//! malformed candidate is fatal: the pipeline discards the offending
//! candidate, tallies the reason in [`crate::stats::ExtractionStats`], and
//! continues. The one fatal condition is an unavailable upstream parse.

use thiserror::Error;

/// Errors that can escape [`crate::extract`].
///
/// This is a narrow enum by design: every other failure mode described in
/// the spec's error handling section is recoverable and is recorded as a
/// [`RejectReason`] rather than returned here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The upstream dependency/NER analyser did not produce a usable parse
    /// for this document. This is the only fatal condition in the core.
    #[error("parser unavailable: {0}")]
    ParserUnavailable(String),

    /// The supplied `parsed.sentences` violated the external-analyser
    /// contract (§6): sentence offsets out of range, tokens out of order,
    /// or a `head` pointing outside its own sentence. Treated as fatal
    /// because the core cannot safely derive character spans from a
    /// corrupted token stream.
    #[error("malformed parse input: {0}")]
    MalformedInput(String),
}

/// The specific reason a candidate, mention, or span was dropped.
///
/// Every variant here must be tallied in [`crate::stats::ExtractionStats::reject_reasons`];
/// the invariant `sum(reject_reasons) == gate NON_ENTITY verdicts + validation drops`
/// is checked by the test suite (§7, §8 invariant 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RejectReason {
    /// Candidate surface was empty or pure whitespace.
    Empty,
    /// Candidate was a markdown heading / chapter marker already blanked by preprocessing
    /// but still nominated from stale offsets.
    ChapterHeading,
    /// Repeated-letter interjection ("Aaaah", "Noooo").
    RepeatedLetterInterjection,
    /// Common interjection ("Oh", "Well", "Alas").
    CommonInterjection,
    /// Preposition-led fragment with a lowercase tail ("in the old house").
    PrepositionLedFragment,
    /// Determiner-led lowercase phrase ("the quick brown fox").
    DeterminerLedLowercase,
    /// "Dead End"-style road sign / placard fragment.
    RoadSignFragment,
    /// Lowercase-leading multi-word fragment.
    LowercaseLeadingFragment,
    /// Verb-object fragment ("collect firewood").
    VerbObjectFragment,
    /// Token appears mid-sentence immediately after a lowercase word.
    LowercasePredecessor,
    /// Title-case token immediately followed by a lowercase common noun.
    TitleCaseFollowedByCommonNoun,
    /// Collectible-pattern fragment ("collecting Monster Runner").
    CollectiblePattern,
    /// Raw candidate span is entirely lowercase.
    LowercaseRawSpan,
    /// Imperative / vocative / theme-in-quotes: gated to CONTEXT_ONLY, never minted.
    ContextOnlyImperative,
    /// Adjectival demonym ("French cuisine"): gated to CONTEXT_ONLY.
    ContextOnlyDemonym,
    /// `text[start:end]` failed to normalise to the recorded surface (span validation failure).
    SpanValidationFailure,
    /// Candidate's tokens were all in the stop set.
    AllTokensStopword,
    /// Single-token span immediately preceded by "the"/"and" without coordination.
    BareDeterminerPrefixed,
    /// Cluster never reached the mention threshold and had no other promotion reason.
    SingleMention,
    /// Cluster had insufficient NER/introduction/whitelist/header evidence.
    WeakEvidence,
}

impl RejectReason {
    /// Stable snake_case identifier, used as the JSON/debug-report key.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Empty => "empty",
            RejectReason::ChapterHeading => "chapter-heading",
            RejectReason::RepeatedLetterInterjection => "repeated-letter-interjection",
            RejectReason::CommonInterjection => "common-interjection",
            RejectReason::PrepositionLedFragment => "preposition-led-fragment",
            RejectReason::DeterminerLedLowercase => "determiner-led-lowercase",
            RejectReason::RoadSignFragment => "road-sign-fragment",
            RejectReason::LowercaseLeadingFragment => "lowercase-leading-fragment",
            RejectReason::VerbObjectFragment => "verb-object-fragment",
            RejectReason::LowercasePredecessor => "lowercase-predecessor",
            RejectReason::TitleCaseFollowedByCommonNoun => "titlecase-then-common-noun",
            RejectReason::CollectiblePattern => "collectible-pattern",
            RejectReason::LowercaseRawSpan => "lowercase-raw-span",
            RejectReason::ContextOnlyImperative => "imperative-single",
            RejectReason::ContextOnlyDemonym => "adjectival-demonym",
            RejectReason::SpanValidationFailure => "span-validation-failure",
            RejectReason::AllTokensStopword => "all-tokens-stopword",
            RejectReason::BareDeterminerPrefixed => "bare-determiner-prefixed",
            RejectReason::SingleMention => "single_mention",
            RejectReason::WeakEvidence => "weak_evidence",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result alias for fallible pipeline operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
