use parley_core::{
    classify_intent, compose_suggestions, extract_choices, ChoiceSet, Intent, SymbolTable,
    TemplateSet, PLACEHOLDER_SYMBOL,
};
use parley_engine::SuggestionEngine;

const SAMPLES: &[(&str, Intent)] = &[
    ("would you rather read or draw", Intent::Choice),
    ("are you tired", Intent::YesNo),
    ("how are you feeling today", Intent::Feeling),
    ("what would you like", Intent::WantLike),
    ("where is your backpack", Intent::Where),
    ("when is recess", Intent::When),
    ("lunch is ready", Intent::Food),
    ("let me help with that", Intent::Help),
    ("nice to see you", Intent::Default),
];

fn punctuation_noise(len: usize) -> String {
    const MARKS: &[char] = &['!', '?', '.', ',', ';', ':', '-', '(', ')', '*', '#', '~', '"'];
    (0..len).map(|i| MARKS[(i * 7 + 3) % MARKS.len()]).collect()
}

#[test]
fn repeated_calls_are_identical() {
    let engine = SuggestionEngine::builtin();
    for (text, _) in SAMPLES {
        let first = engine.generate(text);
        for _ in 0..5 {
            assert_eq!(engine.generate(text), first, "drifted on {text:?}");
        }
    }
}

#[test]
fn every_input_yields_one_to_three() {
    let engine = SuggestionEngine::builtin();
    let long = "tea or coffee ".repeat(200);
    let noise = punctuation_noise(64);
    let inputs = [
        "",
        "   ",
        "\u{200b}",
        "🙂🙂🙂",
        "or",
        ",,, or ,,,",
        long.as_str(),
        noise.as_str(),
    ];

    for text in inputs.iter().copied().chain(SAMPLES.iter().map(|(text, _)| *text)) {
        let list = engine.generate(text);
        assert!(
            (1..=3).contains(&list.len()),
            "{text:?} produced {} suggestions",
            list.len()
        );
    }
}

#[test]
fn choice_outranks_yes_no() {
    assert_eq!(classify_intent("do you want tea or coffee"), Intent::Choice);
}

#[test]
fn samples_classify_as_labelled() {
    for (text, intent) in SAMPLES {
        assert_eq!(classify_intent(text), *intent, "{text:?}");
    }
}

#[test]
fn binary_choices_in_scan_order() {
    let choices = extract_choices("Do you want apple or banana");
    assert_eq!(choices.as_slice(), &["apple", "banana"]);
}

#[test]
fn ternary_choices_keep_list_order() {
    let choices = extract_choices("juice, water, or milk");
    assert_eq!(choices.as_slice(), &["juice", "water", "milk"]);
}

#[test]
fn pick_one_pads_to_three() {
    let engine = SuggestionEngine::builtin();
    let outcome = engine.suggest("pick one");

    assert_eq!(outcome.intent, Intent::Choice);
    assert!(outcome.choices.is_empty());
    assert_eq!(outcome.suggestions.len(), 3);
    assert_eq!(
        outcome.suggestions.texts()[..2],
        ["Either one is fine", "Neither, thank you"]
    );
}

#[test]
fn two_choices_offer_both() {
    let list = SuggestionEngine::builtin().generate("I want apple or banana");
    let both = list.get(2).expect("third candidate");
    assert_eq!(both.symbol, "🤝");
    assert_eq!(both.text, "Both apple and banana");
}

#[test]
fn category_symbol_beats_placeholder() {
    let symbols = SymbolTable::builtin();
    assert_eq!(symbols.resolve("lasagna"), "🍽️");
    assert_ne!(symbols.resolve("lasagna"), PLACEHOLDER_SYMBOL);
    assert_eq!(symbols.resolve("qwzx"), PLACEHOLDER_SYMBOL);
}

#[test]
fn classify_then_compose_matches_generate() {
    let engine = SuggestionEngine::builtin();
    let symbols = SymbolTable::builtin();
    let templates = TemplateSet::default();

    for intent in Intent::ALL {
        let (text, _) = SAMPLES
            .iter()
            .find(|(_, labelled)| *labelled == intent)
            .expect("a sample per intent");

        let classified = classify_intent(text);
        let choices = match classified {
            Intent::Choice => extract_choices(text),
            _ => ChoiceSet::new(),
        };
        let composed = compose_suggestions(classified, &choices, &symbols, &templates);
        assert_eq!(composed, engine.generate(text), "{text:?}");
    }
}

#[test]
fn punctuation_flood_falls_back_to_fillers() {
    let engine = SuggestionEngine::builtin();
    let noise = punctuation_noise(500);
    assert_eq!(noise.chars().count(), 500);

    let outcome = engine.suggest(&noise);
    assert_eq!(outcome.intent, Intent::Default);
    assert_eq!(
        outcome.suggestions.texts(),
        vec!["Okay", "I understand", "Tell me more"]
    );
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(SuggestionEngine::builtin());
    let expected = engine.generate("do you want tea or coffee");

    let handles = (0..4)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.generate("do you want tea or coffee"))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(engine.metrics().snapshot().requests_total, 5);
}
