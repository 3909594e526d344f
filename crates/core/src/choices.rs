use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ChoiceSet, Utterance};

const PHRASE: &str = r"(\w+(?:\s+\w+)?)";

static BASIC_OR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b{PHRASE}\s+or\s+{PHRASE}\b")).expect("valid binary choice regex")
});

/// Extended templates, scanned after the basic pattern in this order.
static EXTENDED: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"\bwould\s+you\s+(?:like|prefer)\s+(?:to\s+)?{PHRASE}\s+or\s+{PHRASE}\b"),
        format!(r"\bdo\s+you\s+want\s+(?:to\s+)?{PHRASE}\s+or\s+{PHRASE}\b"),
        format!(r"\b{PHRASE},\s*{PHRASE},?\s+or\s+{PHRASE}\b"),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid extended choice regex"))
    .collect()
});

/// Words that open a captured phrase without naming the option ("want tea").
const LEAD_INS: &[&str] = &[
    "a", "an", "the", "some", "i", "you", "we", "want", "like", "prefer", "have", "get", "need",
    "to", "or", "and",
];

/// Words that close a captured phrase without naming the option ("coffee please").
const TRAILERS: &[&str] = &["please", "now", "today", "instead", "then", "too", "or", "and"];

/// Pulls the options out of "X or Y" style questions.
///
/// Basic matches come first, then each extended template in order; the set
/// drops repeats, so overlapping templates only add what is new.
pub fn extract_choices(text: &str) -> ChoiceSet {
    extract_from(&Utterance::new(text))
}

pub fn extract_from(utterance: &Utterance) -> ChoiceSet {
    let folded = utterance.folded();
    let mut choices = ChoiceSet::new();

    for captures in BASIC_OR.captures_iter(folded) {
        push_groups(&mut choices, &captures);
    }

    for pattern in EXTENDED.iter() {
        for captures in pattern.captures_iter(folded) {
            push_groups(&mut choices, &captures);
        }
    }

    choices
}

fn push_groups(choices: &mut ChoiceSet, captures: &regex::Captures<'_>) {
    for group in captures.iter().skip(1).flatten() {
        choices.push(&clean_phrase(group.as_str()));
    }
}

fn clean_phrase(phrase: &str) -> String {
    let words = phrase.split_whitespace().collect::<Vec<_>>();
    match words.as_slice() {
        [first, second] if LEAD_INS.contains(first) => (*second).to_string(),
        [first, second] if TRAILERS.contains(second) => (*first).to_string(),
        _ => words.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(text: &str) -> Vec<String> {
        extract_choices(text).as_slice().to_vec()
    }

    #[test]
    fn binary_question_yields_both_options() {
        assert_eq!(extracted("Do you want apple or banana"), vec!["apple", "banana"]);
    }

    #[test]
    fn ternary_list_keeps_order() {
        assert_eq!(extracted("juice, water, or milk"), vec!["juice", "water", "milk"]);
    }

    #[test]
    fn basic_matches_precede_extended_ones() {
        // basic pattern sees "water or milk" before the list template sees all three
        assert_eq!(extracted("juice, water or milk"), vec!["water", "milk", "juice"]);
    }

    #[test]
    fn two_word_options_survive() {
        assert_eq!(extracted("hot chocolate or ice cream?"), vec!["hot chocolate", "ice cream"]);
    }

    #[test]
    fn courtesy_words_are_dropped() {
        assert_eq!(extracted("would you like tea or coffee please"), vec!["tea", "coffee"]);
    }

    #[test]
    fn infinitive_marker_is_dropped() {
        assert_eq!(extracted("Do you want to play or read"), vec!["play", "read"]);
        assert_eq!(
            extracted("Where do you want to eat, pizza or tacos?"),
            vec!["pizza", "tacos", "eat"]
        );
    }

    #[test]
    fn chained_or_does_not_leak_into_options() {
        assert_eq!(extracted("tea or coffee or milk"), vec!["tea", "coffee"]);
    }

    #[test]
    fn no_or_means_no_choices() {
        assert!(extract_choices("pick one").is_empty());
        assert!(extract_choices("").is_empty());
        assert!(extract_choices("orange for dinner").is_empty());
    }

    #[test]
    fn repeated_scans_do_not_leak_state() {
        let first = extracted("red or blue");
        let second = extracted("red or blue");
        assert_eq!(first, second);
    }
}
