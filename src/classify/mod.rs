//! Stage (3): the meaning gate and surface-form normalisation (§4.3).
//!
//! Sits between nomination and the mention buffer: every [`crate::model::Candidate`]
//! is run through [`gate::evaluate`] to decide whether it names something
//! durable, something worth keeping for this sentence only, or nothing.
//! [`normalize_name`] is the canonical surface-normalisation routine shared
//! by cluster construction ([`crate::model::MentionCluster`]) and
//! post-processing's alias folding (§4.7).

pub mod gate;
pub mod hints;
pub mod year;

pub use gate::evaluate;
pub use hints::ContextHints;
pub use year::convert_spelled_year;

use once_cell::sync::Lazy;

use crate::lexicon::LexiconBundle;

static SHARED_LEXICON: Lazy<LexiconBundle> = Lazy::new(LexiconBundle::load);

/// Normalises a mention surface to the form used for cluster keying and
/// alias-variant comparison: strips a leading title prefix, trailing
/// possessive `'s`/`'`, and collapses internal whitespace.
///
/// This is deliberately looser than display formatting: `"Dr. Harkness's"`
/// and `"Harkness"` normalise to the same string so they land in the same
/// alias-variant set, but the cluster's `canonical` field (the first
/// surface seen) is left untouched for display.
///
/// Uses a process-wide cached [`LexiconBundle`] (consistent with §5's
/// read-once, cross-document-shared lexicon contract) so that
/// [`crate::model::MentionCluster::new`]/`absorb`, which call this on every
/// mention, do not reparse the embedded asset each time. Call
/// [`normalize_name_with`] directly when a caller already holds a bundle.
pub fn normalize_name(surface: &str) -> String {
    normalize_name_with(surface, &SHARED_LEXICON)
}

/// Same as [`normalize_name`] but takes an already-loaded bundle, avoiding a
/// redundant parse of the embedded lexicon JSON on every call.
pub fn normalize_name_with(surface: &str, lexicon: &LexiconBundle) -> String {
    let mut words: Vec<&str> = surface.split_whitespace().collect();

    if let Some(first) = words.first() {
        let bare = first.trim_end_matches('.');
        if lexicon.is_title_prefix(bare) {
            words.remove(0);
        }
    }

    let mut joined = words.join(" ");
    for suffix in ["'s", "\u{2019}s", "'", "\u{2019}"] {
        if let Some(stripped) = joined.strip_suffix(suffix) {
            joined = stripped.to_string();
            break;
        }
    }

    joined.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_title_prefix() {
        assert_eq!(normalize_name("Dr. Harkness"), "Harkness");
        assert_eq!(normalize_name("Professor McGonagall"), "McGonagall");
    }

    #[test]
    fn strips_possessive_suffix() {
        assert_eq!(normalize_name("Harry's"), "Harry");
        assert_eq!(normalize_name("Gondor\u{2019}s"), "Gondor");
    }

    #[test]
    fn leaves_plain_name_untouched() {
        assert_eq!(normalize_name("Hermione Granger"), "Hermione Granger");
    }

    #[test]
    fn collapses_title_and_possessive_together() {
        assert_eq!(normalize_name("Lord Voldemort's"), "Voldemort");
    }
}
