use std::env;
use std::path::PathBuf;

use parley_core::DEFAULT_MAX_INPUT_CHARS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_input_chars: usize,
    pub lexicon_dir: Option<PathBuf>,
    pub templates_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            lexicon_dir: None,
            templates_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            max_input_chars: env::var("PARLEY_MAX_INPUT_CHARS")
                .ok()
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(DEFAULT_MAX_INPUT_CHARS),
            lexicon_dir: non_empty_path("PARLEY_LEXICON_DIR"),
            templates_path: non_empty_path("PARLEY_TEMPLATES_PATH"),
        }
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max.max(1);
        self
    }

    pub fn with_lexicon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lexicon_dir = Some(dir.into());
        self
    }

    pub fn with_templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(path.into());
        self
    }
}

fn non_empty_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
