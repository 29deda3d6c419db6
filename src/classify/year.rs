//! Spelled-out English cardinal number conversion (§4.2), used to turn a
//! [`crate::lexicon::regexes::SPELLED_YEAR`] match into the numeric year a
//! `DATE` entity's canonical form needs.

const ONES: [(&str, u32); 19] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: [(&str, u32); 8] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

fn word_value(word: &str) -> Option<u32> {
    ONES.iter().chain(TENS.iter()).find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Parses a spelled-out English cardinal phrase ("one thousand seven
/// hundred and seventy-five") into its numeric value, honouring
/// hyphenated compounds ("seventy-five") and a bare "and". Returns `None`
/// for a phrase containing no recognised number word.
pub fn convert_spelled_year(phrase: &str) -> Option<i32> {
    let mut total: u32 = 0;
    let mut current: u32 = 0;
    let mut saw_word = false;

    for raw_word in phrase.split_whitespace() {
        for part in raw_word.split('-') {
            let word = part.to_lowercase();
            let word = word.trim_matches(|c: char| !c.is_alphabetic());
            if word.is_empty() || word == "and" {
                continue;
            }
            if word == "hundred" {
                current = current.max(1) * 100;
                saw_word = true;
                continue;
            }
            if word == "thousand" {
                total += current.max(1) * 1000;
                current = 0;
                saw_word = true;
                continue;
            }
            let Some(value) = word_value(word) else {
                return None;
            };
            current += value;
            saw_word = true;
        }
    }

    if !saw_word {
        return None;
    }
    Some((total + current) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_full_cardinal_year_phrase() {
        assert_eq!(
            convert_spelled_year("one thousand seven hundred and seventy-five"),
            Some(1775)
        );
    }

    #[test]
    fn converts_bare_hundred() {
        assert_eq!(convert_spelled_year("nineteen hundred"), Some(1900));
    }

    #[test]
    fn rejects_phrase_with_no_number_words() {
        assert_eq!(convert_spelled_year("the war began"), None);
    }
}
