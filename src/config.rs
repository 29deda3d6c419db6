//! Extraction configuration and environment toggles (§6, [AMBIENT-3]).

use std::collections::BTreeSet;
use std::env;

/// Promotion-gate configuration preset (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionProfile {
    /// threshold 3, no strong-NER singletons.
    Strict,
    /// threshold 2, singletons allowed. The default.
    Default,
    /// threshold 1, all exceptions on.
    Permissive,
}

impl PromotionProfile {
    pub fn mention_threshold(&self) -> usize {
        match self {
            PromotionProfile::Strict => 3,
            PromotionProfile::Default => 2,
            PromotionProfile::Permissive => 1,
        }
    }

    pub fn allow_strong_ner_singleton(&self) -> bool {
        !matches!(self, PromotionProfile::Strict)
    }

    pub fn allow_introduction_pattern(&self) -> bool {
        true
    }
}

impl Default for PromotionProfile {
    fn default() -> Self {
        PromotionProfile::Default
    }
}

impl From<&str> for PromotionProfile {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "strict" => PromotionProfile::Strict,
            "permissive" => PromotionProfile::Permissive,
            _ => PromotionProfile::Default,
        }
    }
}

/// Diagnostic toggles read once at startup (§6). Never polled mid-pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggles {
    /// `DEBUG` / `TRACE_SPANS` — emit per-stage diagnostics.
    pub trace_spans: bool,
    /// `FILTER_DEBUG` / `ENTITY_DECISIONS` — emit per-entity decision records.
    pub entity_decisions: bool,
}

impl Toggles {
    fn env_flag(name: &str) -> bool {
        env::var(name)
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false)
    }

    /// Reads `DEBUG`, `TRACE_SPANS`, `FILTER_DEBUG`, `ENTITY_DECISIONS` once.
    pub fn from_env() -> Self {
        Toggles {
            trace_spans: Self::env_flag("DEBUG") || Self::env_flag("TRACE_SPANS"),
            entity_decisions: Self::env_flag("FILTER_DEBUG") || Self::env_flag("ENTITY_DECISIONS"),
        }
    }
}

/// Input to one [`crate::extract`] call (§6).
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Minimum mention count for cluster promotion, overridden by `profile` unless
    /// explicitly set via [`ExtractionConfig::with_mention_threshold`].
    pub mention_threshold: usize,
    pub allow_strong_ner_singleton: bool,
    pub allow_introduction_pattern: bool,
    /// Case-insensitive whitelist of domain-specific proper names (promotion
    /// override and whitelist-typed nomination source).
    pub whitelist: BTreeSet<String>,
    pub debug: bool,
    pub doc_id: String,
    pub toggles: Toggles,
}

impl ExtractionConfig {
    /// Builds a config from a [`PromotionProfile`] preset.
    pub fn from_profile(profile: PromotionProfile, doc_id: impl Into<String>) -> Self {
        ExtractionConfig {
            mention_threshold: profile.mention_threshold(),
            allow_strong_ner_singleton: profile.allow_strong_ner_singleton(),
            allow_introduction_pattern: profile.allow_introduction_pattern(),
            whitelist: BTreeSet::new(),
            debug: false,
            doc_id: doc_id.into(),
            toggles: Toggles::default(),
        }
    }

    /// Builds a config from [`PromotionProfile::Default`] plus the §6
    /// environment toggles, read once.
    pub fn from_env(doc_id: impl Into<String>) -> Self {
        let mut cfg = Self::from_profile(PromotionProfile::Default, doc_id);
        cfg.toggles = Toggles::from_env();
        cfg.debug = cfg.toggles.trace_spans;
        cfg
    }

    pub fn with_mention_threshold(mut self, threshold: usize) -> Self {
        self.mention_threshold = threshold.max(1);
        self
    }

    pub fn with_whitelist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive whitelist membership check.
    pub fn whitelist_contains(&self, surface: &str) -> bool {
        let lower = surface.to_lowercase();
        self.whitelist.iter().any(|w| w.to_lowercase() == lower)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::from_profile(PromotionProfile::Default, "doc-0")
    }
}
