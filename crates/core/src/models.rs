use serde::{Deserialize, Serialize};

use crate::intent::normalize_text;

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Choice,
    YesNo,
    Feeling,
    WantLike,
    Where,
    When,
    Food,
    Help,
    Default,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Self::Choice,
        Self::YesNo,
        Self::Feeling,
        Self::WantLike,
        Self::Where,
        Self::When,
        Self::Food,
        Self::Help,
        Self::Default,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "choice" => Some(Self::Choice),
            "yes_no" | "yesno" => Some(Self::YesNo),
            "feeling" => Some(Self::Feeling),
            "want_like" | "wantlike" => Some(Self::WantLike),
            "where" => Some(Self::Where),
            "when" => Some(Self::When),
            "food" => Some(Self::Food),
            "help" => Some(Self::Help),
            "default" => Some(Self::Default),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Choice => "choice",
            Self::YesNo => "yes_no",
            Self::Feeling => "feeling",
            Self::WantLike => "want_like",
            Self::Where => "where",
            Self::When => "when",
            Self::Food => "food",
            Self::Help => "help",
            Self::Default => "default",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Input text as typed, plus the folded form every matcher works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    raw: String,
    folded: String,
}

impl Utterance {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            folded: normalize_text(raw).to_lowercase(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSet(Vec<String>);

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a trimmed, lower-cased choice unless an equal one is already held.
    pub fn push(&mut self, choice: &str) -> bool {
        let normalized = choice.trim().to_lowercase();
        if normalized.is_empty() || self.0.iter().any(|held| held.eq_ignore_ascii_case(&normalized))
        {
            return false;
        }
        self.0.push(normalized);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChoiceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for choice in iter {
            set.push(choice.as_ref());
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol: String,
    pub text: String,
}

impl Suggestion {
    pub fn new(symbol: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            text: text.into(),
        }
    }
}

/// Ordered candidates shown to the user; never longer than [`MAX_SUGGESTIONS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionList(Vec<Suggestion>);

impl SuggestionList {
    pub fn from_candidates(mut candidates: Vec<Suggestion>) -> Self {
        candidates.truncate(MAX_SUGGESTIONS);
        Self(candidates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Suggestion] {
        &self.0
    }

    pub fn texts(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Suggestion> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SuggestionList {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
