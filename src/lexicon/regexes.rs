//! Compiled-once regex patterns (§9: "compiled once at startup and reused").
//!
//! All patterns are case-insensitive unless noted, matching §9's blanket
//! rule. Each `once_cell::sync::Lazy` is compiled exactly once per process
//! and shared across every document extracted in that process, consistent
//! with §5's read-only, cross-document-shared lexicon contract.

use once_cell::sync::Lazy;
use regex::Regex;

/// `ACR (Expansion)` or `Expansion (ACR)` — the acronym is 2-5 uppercase
/// letters, the expansion is 1-6 capitalised words on one line.
pub static ACRONYM_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<acr1>\b[A-Z]{2,5}\b)\s*\(\s*(?P<exp1>[A-Z][\w&',.-]*(?:\s+[A-Z][\w&',.-]*){0,5})\s*\)
        |
        (?P<exp2>[A-Z][\w&',.-]*(?:\s+[A-Z][\w&',.-]*){0,5})\s*\(\s*(?P<acr2>\b[A-Z]{2,5}\b)\s*\)
        ",
    )
    .expect("ACRONYM_PAIR regex must compile")
});

/// Titled name: `Dr.`/`Mrs.`/`Professor`/... followed by a capitalised tail.
pub static TITLED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:mr|mrs|ms|miss|dr|prof|professor|lord|lady|king|queen|prince|princess|sir|dame|captain|major|colonel|general|admiral|father|sister|brother|rabbi|imam|bishop|cardinal|president|senator|governor|chancellor|duke|duchess|count|countess|baron|baroness)\.?\s+(?P<tail>[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*)*)",
    )
    .expect("TITLED_NAME regex must compile")
});

/// `X family` construction.
pub static FAMILY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?P<name>[A-Z][a-zA-Z'-]*)\s+[Ff]amily\b").expect("FAMILY_NAME regex must compile")
});

/// `[Battle|War|Siege|Council|Treaty] of Y`.
pub static EVENT_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<kw>battle|war|siege|council|treaty|conflict|skirmish|campaign)\s+of\s+(?P<obj>[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*)*)",
    )
    .expect("EVENT_OF regex must compile")
});

/// School-name suffixes: `High School`, `University`, `Academy`, `Institute`.
pub static SCHOOL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<name>[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*)*\s+(?:High School|University|Academy|Institute))\b",
    )
    .expect("SCHOOL_NAME regex must compile")
});

/// Social-media handle `@handle`.
pub static SOCIAL_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(?P<handle>[A-Za-z0-9_]{2,30})").expect("SOCIAL_HANDLE regex must compile"));

/// Four-digit year literal in the plausible narrative range 1500-2099.
pub static YEAR_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?P<year>1[5-9]\d{2}|20\d{2})\b").expect("YEAR_LITERAL regex must compile"));

/// A run of English cardinal-number words ("one thousand seven hundred and
/// seventy-five"), the shape [`crate::classify::year::convert_spelled_year`]
/// parses. Matches more loosely than an actual year (a bare "ten" matches
/// too); the nominator filters by the converted value falling in range.
pub static SPELLED_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)(?:[ -](?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand|and))*\b",
    )
    .expect("SPELLED_YEAR regex must compile")
});

/// A run of capitalised words (1-4), the basis of the fallback nominator.
pub static CAPITALIZED_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*){0,3}\b").expect("CAPITALIZED_RUN regex must compile")
});

/// "Dead End"-style two-word road sign / placard fragment.
pub static ROAD_SIGN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(dead end|no entry|one way|do not enter|keep out|stop ahead)$")
        .expect("ROAD_SIGN regex must compile")
});

/// `collect[ing] <Capitalized Phrase>` collectible pattern.
pub static COLLECTIBLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcollect(?:ing|ed)?\s+(?P<item>[A-Z][a-zA-Z]*(?:\s+[A-Z][a-zA-Z]*)*)")
        .expect("COLLECTIBLE_PATTERN regex must compile")
});

/// Repeated-letter interjection: three or more of the same letter in a row
/// somewhere in the word ("Noooo", "Aaaah").
pub static REPEATED_LETTER_INTERJECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z])\1{2,}").expect("REPEATED_LETTER_INTERJECTION regex must compile"));

/// Explicit alias patterns: `X, (also|commonly) known as Y`, `X (aka Y)`, `X called Y`.
pub static EXPLICIT_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<x>[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*)*)\s*(?:,\s*(?P<mode>also|commonly)\s+known\s+as|\(aka|called)\s+(?P<y>[A-Z][a-zA-Z'-]*(?:\s+[A-Z][a-zA-Z'-]*)*)",
    )
    .expect("EXPLICIT_ALIAS regex must compile")
});

/// Underscore-delimited handle display-name conversion target, e.g. `tim_cook`.
pub static UNDERSCORE_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+(?:_[a-zA-Z]+)+$").expect("UNDERSCORE_HANDLE regex must compile"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronym_pair_matches_acronym_then_expansion() {
        let caps = ACRONYM_PAIR
            .captures("DataFlow Technologies (DFT) announced DFT results.")
            .unwrap();
        let acr = caps.name("acr2").map(|m| m.as_str());
        let exp = caps.name("exp2").map(|m| m.as_str());
        assert_eq!(acr, Some("DFT"));
        assert_eq!(exp, Some("DataFlow Technologies"));
    }

    #[test]
    fn titled_name_extracts_surname() {
        let caps = TITLED_NAME.captures("Professor McGonagall greeted everyone.").unwrap();
        assert_eq!(caps.name("tail").unwrap().as_str(), "McGonagall");
    }

    #[test]
    fn event_of_matches_battle_pattern() {
        let caps = EVENT_OF
            .captures("The Battle of Pelennor Fields was fought in Gondor.")
            .unwrap();
        assert_eq!(caps.name("kw").unwrap().as_str(), "Battle");
        assert_eq!(caps.name("obj").unwrap().as_str(), "Pelennor Fields");
    }

    #[test]
    fn social_handle_extracts_name() {
        let caps = SOCIAL_HANDLE.captures("@tim_cook attended.").unwrap();
        assert_eq!(caps.name("handle").unwrap().as_str(), "tim_cook");
    }

    #[test]
    fn underscore_handle_detects_display_conversion_candidates() {
        assert!(UNDERSCORE_HANDLE.is_match("tim_cook"));
        assert!(!UNDERSCORE_HANDLE.is_match("TechCrunch"));
    }

    #[test]
    fn year_literal_in_range() {
        assert!(YEAR_LITERAL.is_match("in 1775 the war began"));
        assert!(!YEAR_LITERAL.is_match("in 1400 the war began"));
    }

    #[test]
    fn spelled_year_matches_full_cardinal_phrase() {
        let text = "in one thousand seven hundred and seventy-five the war began";
        let m = SPELLED_YEAR.find(text).unwrap();
        assert_eq!(m.as_str(), "one thousand seven hundred and seventy-five");
    }
}
