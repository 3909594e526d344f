use once_cell::sync::Lazy;
use regex::Regex;

use crate::choices::extract_from;
use crate::models::{Intent, Utterance};

static YES_NO_LEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:do|does|did|are|is|was|were|will|would|could|should|can|may|have|has)\s+you\b",
    )
    .expect("valid yes/no regex")
});

static FEELING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bhow\s+(?:are\s+you\b|do\s+you\b(?:\s+\w+)*?\s+feel(?:ing)?\b)")
        .expect("valid feeling regex")
});

const CHOICE_WORDS: &[&str] = &[
    "choose",
    "pick",
    "prefer",
    "option",
    "rather",
    "decide",
    "which one",
    "either",
];

const FOOD_WORDS: &[&str] = &[
    "eat",
    "hungry",
    "food",
    "meal",
    "breakfast",
    "lunch",
    "dinner",
    "snack",
];

/// One step of the classification cascade.
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    pub intent: Intent,
    pub matches: fn(&Utterance) -> bool,
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("intent", &self.intent)
            .finish_non_exhaustive()
    }
}

/// Evaluated top to bottom; the first rule that matches decides the intent.
/// Several predicates can hold at once ("do you want tea or coffee" is also a
/// yes/no lead), so the order here is part of the contract.
pub const CLASSIFICATION_RULES: [ClassificationRule; 8] = [
    ClassificationRule {
        intent: Intent::Choice,
        matches: is_choice,
    },
    ClassificationRule {
        intent: Intent::YesNo,
        matches: is_yes_no,
    },
    ClassificationRule {
        intent: Intent::Feeling,
        matches: is_feeling,
    },
    ClassificationRule {
        intent: Intent::WantLike,
        matches: is_want_like,
    },
    ClassificationRule {
        intent: Intent::Where,
        matches: is_where,
    },
    ClassificationRule {
        intent: Intent::When,
        matches: is_when,
    },
    ClassificationRule {
        intent: Intent::Food,
        matches: is_food,
    },
    ClassificationRule {
        intent: Intent::Help,
        matches: is_help,
    },
];

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn classify_intent(text: &str) -> Intent {
    classify_utterance(&Utterance::new(text))
}

pub fn classify_utterance(utterance: &Utterance) -> Intent {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(utterance))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Default)
}

fn is_choice(utterance: &Utterance) -> bool {
    contains_any(utterance.folded(), CHOICE_WORDS) || !extract_from(utterance).is_empty()
}

fn is_yes_no(utterance: &Utterance) -> bool {
    YES_NO_LEAD.is_match(utterance.folded())
}

fn is_feeling(utterance: &Utterance) -> bool {
    FEELING.is_match(utterance.folded())
}

fn is_want_like(utterance: &Utterance) -> bool {
    let text = utterance.folded();
    text.contains("what") && (text.contains("want") || text.contains("like"))
}

fn is_where(utterance: &Utterance) -> bool {
    utterance.folded().starts_with("where")
}

fn is_when(utterance: &Utterance) -> bool {
    utterance.folded().starts_with("when")
}

fn is_food(utterance: &Utterance) -> bool {
    contains_any(utterance.folded(), FOOD_WORDS)
}

fn is_help(utterance: &Utterance) -> bool {
    utterance.folded().contains("help")
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_beats_yes_no() {
        assert_eq!(classify_intent("do you want tea or coffee"), Intent::Choice);
    }

    #[test]
    fn indicator_word_alone_is_a_choice() {
        assert_eq!(classify_intent("Pick one"), Intent::Choice);
        assert_eq!(classify_intent("Which one do you like?"), Intent::Choice);
    }

    #[test]
    fn auxiliary_plus_you_is_yes_no() {
        assert_eq!(classify_intent("Are you tired?"), Intent::YesNo);
        assert_eq!(classify_intent("can you hear me"), Intent::YesNo);
        assert_eq!(classify_intent("is it raining"), Intent::Default);
    }

    #[test]
    fn feeling_questions() {
        assert_eq!(classify_intent("How are you today?"), Intent::Feeling);
        assert_eq!(classify_intent("how do you feel about school"), Intent::Feeling);
        assert_eq!(classify_intent("how do you really feel"), Intent::Feeling);
    }

    #[test]
    fn what_plus_want_or_like() {
        assert_eq!(classify_intent("What do you want?"), Intent::WantLike);
        assert_eq!(classify_intent("what would you like"), Intent::WantLike);
    }

    #[test]
    fn where_and_when_lead_words() {
        assert_eq!(classify_intent("Where is your coat?"), Intent::Where);
        assert_eq!(classify_intent("When should we leave?"), Intent::When);
        assert_eq!(classify_intent("tell me where"), Intent::Default);
    }

    #[test]
    fn food_vocabulary() {
        assert_eq!(classify_intent("Are we having lunch soon"), Intent::Food);
        assert_eq!(classify_intent("I'm hungry"), Intent::Food);
    }

    #[test]
    fn food_words_match_inside_other_words() {
        // "great" carries "eat"
        assert_eq!(classify_intent("what a great day"), Intent::Food);
    }

    #[test]
    fn help_anywhere() {
        assert_eq!(classify_intent("Let me help with that"), Intent::Help);
    }

    #[test]
    fn yes_no_beats_food() {
        assert_eq!(classify_intent("Are you hungry?"), Intent::YesNo);
    }

    #[test]
    fn empty_and_noise_default() {
        assert_eq!(classify_intent(""), Intent::Default);
        assert_eq!(classify_intent("   \t  "), Intent::Default);
        assert_eq!(classify_intent("?!?!...;;"), Intent::Default);
    }

    #[test]
    fn rules_cover_every_intent_but_default_once() {
        let seen = CLASSIFICATION_RULES
            .iter()
            .map(|rule| rule.intent)
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(seen.len(), CLASSIFICATION_RULES.len());
        assert!(!seen.contains(&Intent::Default));
    }
}
