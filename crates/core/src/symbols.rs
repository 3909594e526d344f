use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const PLACEHOLDER_SYMBOL: &str = "🤔";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub token: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub pattern: String,
    pub symbol: String,
}

/// Serialized shape of a symbol table, also the shape of a lexicon pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTableConfig {
    #[serde(default)]
    pub entries: Vec<SymbolEntry>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub default_symbol: Option<String>,
}

#[derive(Debug, Clone)]
struct SymbolCategory {
    name: String,
    pattern: Regex,
    symbol: String,
}

/// Token → glyph lookups with ordered fallbacks.
///
/// Entries keep registration order: the substring pass returns the first
/// entry that overlaps the token, so earlier entries win ties.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: HashMap<String, usize>,
    categories: Vec<SymbolCategory>,
    default_symbol: String,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SymbolTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            categories: Vec::new(),
            default_symbol: PLACEHOLDER_SYMBOL.to_string(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (token, symbol) in BUILTIN_ENTRIES {
            table.entries.push(SymbolEntry {
                token: (*token).to_string(),
                symbol: (*symbol).to_string(),
            });
            table
                .index
                .entry((*token).to_string())
                .or_insert(table.entries.len() - 1);
        }
        for (name, pattern, symbol) in BUILTIN_CATEGORIES {
            table.categories.push(SymbolCategory {
                name: (*name).to_string(),
                pattern: Regex::new(pattern).expect("valid builtin category regex"),
                symbol: (*symbol).to_string(),
            });
        }
        table
    }

    pub fn from_config(config: SymbolTableConfig) -> Result<Self, ConfigError> {
        let mut table = Self::empty();
        table.merge(config)?;
        Ok(table)
    }

    /// Layers a config on top: known tokens are re-pointed in place, new ones
    /// append, categories append after the existing ones.
    pub fn merge(&mut self, config: SymbolTableConfig) -> Result<(), ConfigError> {
        for entry in config.entries {
            self.insert(&entry.token, &entry.symbol)?;
        }
        for category in config.categories {
            self.push_category(&category.name, &category.pattern, &category.symbol)?;
        }
        if let Some(symbol) = config.default_symbol {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(ConfigError::EmptySymbol {
                    token: "<default>".to_string(),
                });
            }
            self.default_symbol = symbol.to_string();
        }
        Ok(())
    }

    pub fn insert(&mut self, token: &str, symbol: &str) -> Result<(), ConfigError> {
        let token = token.trim().to_lowercase();
        let symbol = symbol.trim();
        if token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        if symbol.is_empty() {
            return Err(ConfigError::EmptySymbol { token });
        }

        match self.index.get(&token) {
            Some(&position) => self.entries[position].symbol = symbol.to_string(),
            None => {
                self.entries.push(SymbolEntry {
                    token: token.clone(),
                    symbol: symbol.to_string(),
                });
                self.index.insert(token, self.entries.len() - 1);
            }
        }
        Ok(())
    }

    pub fn push_category(
        &mut self,
        name: &str,
        pattern: &str,
        symbol: &str,
    ) -> Result<(), ConfigError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ConfigError::EmptySymbol {
                token: format!("category:{name}"),
            });
        }
        let compiled = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;
        self.categories.push(SymbolCategory {
            name: name.to_string(),
            pattern: compiled,
            symbol: symbol.to_string(),
        });
        Ok(())
    }

    pub fn resolve(&self, token: &str) -> &str {
        let token = token.trim().to_lowercase();

        if let Some(symbol) = self.lookup(&token) {
            return symbol;
        }

        if let Some(symbol) = singular_forms(&token)
            .into_iter()
            .find_map(|singular| self.lookup(&singular))
        {
            return symbol;
        }

        if !token.is_empty() {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|entry| token.contains(&entry.token) || entry.token.contains(&token))
            {
                return &entry.symbol;
            }
        }

        self.categories
            .iter()
            .find(|category| category.pattern.is_match(&token))
            .map(|category| category.symbol.as_str())
            .unwrap_or(self.default_symbol.as_str())
    }

    /// Which fallback bucket a token lands in, if any.
    pub fn category_of(&self, token: &str) -> Option<&str> {
        let token = token.trim().to_lowercase();
        self.categories
            .iter()
            .find(|category| category.pattern.is_match(&token))
            .map(|category| category.name.as_str())
    }

    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn to_config(&self) -> SymbolTableConfig {
        SymbolTableConfig {
            entries: self.entries.clone(),
            categories: self
                .categories
                .iter()
                .map(|category| CategoryConfig {
                    name: category.name.clone(),
                    pattern: category.pattern.as_str().to_string(),
                    symbol: category.symbol.clone(),
                })
                .collect(),
            default_symbol: Some(self.default_symbol.clone()),
        }
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        self.index
            .get(token)
            .map(|&position| self.entries[position].symbol.as_str())
    }
}

fn singular_forms(token: &str) -> Vec<String> {
    if !token.ends_with('s') || token.len() < 2 {
        return Vec::new();
    }

    let mut forms = vec![token[..token.len() - 1].to_string()];
    if let Some(stem) = token.strip_suffix("es") {
        forms.push(stem.to_string());
    }
    if let Some(stem) = token.strip_suffix("ies") {
        forms.push(format!("{stem}y"));
    }
    forms
}

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // food
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("orange", "🍊"),
    ("grape", "🍇"),
    ("strawberry", "🍓"),
    ("watermelon", "🍉"),
    ("pizza", "🍕"),
    ("burger", "🍔"),
    ("sandwich", "🥪"),
    ("fries", "🍟"),
    ("hot dog", "🌭"),
    ("taco", "🌮"),
    ("pasta", "🍝"),
    ("rice", "🍚"),
    ("bread", "🍞"),
    ("cheese", "🧀"),
    ("egg", "🥚"),
    ("chicken", "🍗"),
    ("cookie", "🍪"),
    ("cake", "🍰"),
    ("ice cream", "🍦"),
    ("candy", "🍬"),
    ("chocolate", "🍫"),
    ("popcorn", "🍿"),
    ("carrot", "🥕"),
    ("salad", "🥗"),
    ("soup", "🍲"),
    ("cereal", "🥣"),
    // drinks
    ("water", "💧"),
    ("milk", "🥛"),
    ("juice", "🧃"),
    ("tea", "🍵"),
    ("coffee", "☕"),
    ("soda", "🥤"),
    // activities
    ("play", "🧸"),
    ("game", "🎲"),
    ("ball", "⚽"),
    ("book", "📚"),
    ("music", "🎵"),
    ("tv", "📺"),
    ("movie", "🎬"),
    ("walk", "🚶"),
    ("swim", "🏊"),
    ("draw", "🎨"),
    ("bath", "🛁"),
    ("sleep", "😴"),
    // places
    ("home", "🏠"),
    ("school", "🏫"),
    ("park", "🏞️"),
    ("outside", "🌳"),
    ("bathroom", "🚻"),
    ("bed", "🛏️"),
    ("car", "🚗"),
    ("store", "🏪"),
    // people
    ("mom", "👩"),
    ("dad", "👨"),
    ("friend", "🧑‍🤝‍🧑"),
    ("teacher", "🧑‍🏫"),
    ("doctor", "🧑‍⚕️"),
    // feelings
    ("happy", "😊"),
    ("sad", "😢"),
    ("tired", "🥱"),
    ("hurt", "🤕"),
    // colors
    ("red", "🔴"),
    ("blue", "🔵"),
    ("green", "🟢"),
    ("yellow", "🟡"),
];

const BUILTIN_CATEGORIES: &[(&str, &str, &str)] = &[
    (
        "food",
        r"eat|food|meal|snack|breakfast|lunch|dinner|hungry|fruit|vegetable|noodle|spaghetti|lasagna|curry|stew|pie|sauce|burrito|muffin|pancake|waffle|yogurt|meat|fish",
        "🍽️",
    ),
    (
        "drink",
        r"drink|thirst|sip|smoothie|lemonade|cola|shake|cocoa|beverage",
        "🥤",
    ),
    (
        "place",
        r"house|room|kitchen|garden|yard|beach|library|hospital|church|shop|mall|playground|inside|upstairs|downstairs|place|there|here",
        "📍",
    ),
    (
        "time",
        r"now|later|today|tomorrow|tonight|morning|afternoon|evening|night|minute|hour|week|soon|time",
        "⏰",
    ),
    (
        "person",
        r"mother|father|mommy|daddy|grandma|grandpa|brother|sister|baby|nurse|aunt|uncle|cousin|people|person|boy|girl|man|woman",
        "👤",
    ),
    (
        "object",
        r"thing|stuff|toy|box|bag|phone|tablet|blanket|cup|shoe|coat|hat|object",
        "📦",
    ),
];
