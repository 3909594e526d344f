pub mod choices;
pub mod composer;
pub mod error;
pub mod intent;
pub mod limits;
pub mod models;
pub mod symbols;
pub mod templates;

pub use choices::extract_choices;
pub use composer::{compose_detailed, compose_suggestions, generate_suggestions, Composition};
pub use error::ConfigError;
pub use intent::{classify_intent, classify_utterance, normalize_text, CLASSIFICATION_RULES};
pub use limits::{BoundedInput, InputPolicy, DEFAULT_MAX_INPUT_CHARS};
pub use models::*;
pub use symbols::{SymbolTable, SymbolTableConfig, PLACEHOLDER_SYMBOL};
pub use templates::{ChoiceTemplates, TemplateSet};
