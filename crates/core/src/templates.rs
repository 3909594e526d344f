use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{Intent, Suggestion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTemplates {
    pub want_prefix: String,
    pub both_symbol: String,
    /// Appended in order after the extracted options until three are shown.
    pub padding: Vec<Suggestion>,
}

/// Fixed candidate tables, one per intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    pub choice: ChoiceTemplates,
    pub yes_no: Vec<Suggestion>,
    pub feeling: Vec<Suggestion>,
    pub want_like: Vec<Suggestion>,
    #[serde(rename = "where")]
    pub where_: Vec<Suggestion>,
    pub when: Vec<Suggestion>,
    pub food: Vec<Suggestion>,
    pub help: Vec<Suggestion>,
    /// Conversational fillers for unclassified input; also fills any shortfall.
    pub fallback: Vec<Suggestion>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            choice: ChoiceTemplates {
                want_prefix: "I want ".to_string(),
                both_symbol: "🤝".to_string(),
                padding: table(&[("👌", "Either one is fine"), ("🙅", "Neither, thank you")]),
            },
            yes_no: table(&[("👍", "Yes"), ("👎", "No"), ("🤷", "I'm not sure")]),
            feeling: table(&[
                ("😊", "I feel good"),
                ("😐", "I feel okay"),
                ("😢", "I don't feel well"),
            ]),
            want_like: table(&[
                ("🍎", "I want something to eat"),
                ("🥤", "I want something to drink"),
                ("🧸", "I want to play"),
            ]),
            where_: table(&[("🏠", "At home"), ("📍", "Right here"), ("🤷", "I don't know")]),
            when: table(&[("⏰", "Right now"), ("⏳", "Later"), ("📅", "Tomorrow")]),
            food: table(&[
                ("🍕", "I want pizza"),
                ("🥗", "Something healthy, please"),
                ("🙅", "I'm not hungry"),
            ]),
            help: table(&[
                ("🙋", "Yes, please help me"),
                ("✋", "No thanks, I can do it"),
                ("👉", "Can you help me with this?"),
            ]),
            fallback: table(&[("👍", "Okay"), ("💡", "I understand"), ("👂", "Tell me more")]),
        }
    }
}

impl TemplateSet {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let templates: Self = serde_json::from_str(raw)?;
        templates.validate()?;
        Ok(templates)
    }

    /// The fixed table for an intent. Choice candidates are built from the
    /// extracted options instead, so its entry here is the padding list.
    pub fn fixed(&self, intent: Intent) -> &[Suggestion] {
        match intent {
            Intent::Choice => &self.choice.padding,
            Intent::YesNo => &self.yes_no,
            Intent::Feeling => &self.feeling,
            Intent::WantLike => &self.want_like,
            Intent::Where => &self.where_,
            Intent::When => &self.when,
            Intent::Food => &self.food,
            Intent::Help => &self.help,
            Intent::Default => &self.fallback,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback.is_empty() {
            return Err(ConfigError::EmptyTemplate {
                table: "fallback".to_string(),
            });
        }
        if self.choice.both_symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol {
                token: "choice.both_symbol".to_string(),
            });
        }

        for intent in Intent::ALL {
            for candidate in self.fixed(intent) {
                if candidate.text.trim().is_empty() {
                    return Err(ConfigError::EmptyTemplate {
                        table: intent.as_str().to_string(),
                    });
                }
                if candidate.symbol.trim().is_empty() {
                    return Err(ConfigError::EmptySymbol {
                        token: candidate.text.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn table(rows: &[(&str, &str)]) -> Vec<Suggestion> {
    rows.iter()
        .map(|(symbol, text)| Suggestion::new(*symbol, *text))
        .collect()
}
