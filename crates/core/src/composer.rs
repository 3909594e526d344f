use crate::choices::extract_from;
use crate::intent::classify_utterance;
use crate::models::{ChoiceSet, Intent, Suggestion, SuggestionList, Utterance, MAX_SUGGESTIONS};
use crate::symbols::SymbolTable;
use crate::templates::TemplateSet;

/// A composed list and how many of its entries were generic fillers added to
/// reach three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub suggestions: SuggestionList,
    pub filled_from_fallback: usize,
}

pub fn compose_suggestions(
    intent: Intent,
    choices: &ChoiceSet,
    symbols: &SymbolTable,
    templates: &TemplateSet,
) -> SuggestionList {
    compose_detailed(intent, choices, symbols, templates).suggestions
}

pub fn compose_detailed(
    intent: Intent,
    choices: &ChoiceSet,
    symbols: &SymbolTable,
    templates: &TemplateSet,
) -> Composition {
    let mut candidates = match intent {
        Intent::Choice => choice_candidates(choices, symbols, templates),
        _ => templates
            .fixed(intent)
            .iter()
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect(),
    };

    let filled_from_fallback = fill_shortfall(&mut candidates, &templates.fallback);
    Composition {
        suggestions: SuggestionList::from_candidates(candidates),
        filled_from_fallback,
    }
}

/// Classify, extract when the intent is a choice, compose.
pub fn generate_suggestions(
    text: &str,
    symbols: &SymbolTable,
    templates: &TemplateSet,
) -> SuggestionList {
    let utterance = Utterance::new(text);
    let intent = classify_utterance(&utterance);
    let choices = match intent {
        Intent::Choice => extract_from(&utterance),
        _ => ChoiceSet::new(),
    };
    compose_suggestions(intent, &choices, symbols, templates)
}

fn choice_candidates(
    choices: &ChoiceSet,
    symbols: &SymbolTable,
    templates: &TemplateSet,
) -> Vec<Suggestion> {
    let choice = &templates.choice;
    let mut candidates = choices
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|option| {
            Suggestion::new(
                symbols.resolve(option),
                format!("{}{}", choice.want_prefix, option),
            )
        })
        .collect::<Vec<_>>();

    if let [first, second] = choices.as_slice() {
        candidates.push(Suggestion::new(
            choice.both_symbol.as_str(),
            format!("Both {first} and {second}"),
        ));
    }

    for pad in &choice.padding {
        if candidates.len() >= MAX_SUGGESTIONS {
            break;
        }
        candidates.push(pad.clone());
    }

    candidates
}

fn fill_shortfall(candidates: &mut Vec<Suggestion>, fallback: &[Suggestion]) -> usize {
    let mut filled = 0;
    for filler in fallback {
        if candidates.len() >= MAX_SUGGESTIONS {
            break;
        }
        if candidates.iter().all(|held| held.text != filler.text) {
            candidates.push(filler.clone());
            filled += 1;
        }
    }
    filled
}
