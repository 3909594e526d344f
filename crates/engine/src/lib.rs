mod config;
mod speech;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use parley_core::{
    classify_utterance, compose_detailed, compose_suggestions, extract_choices, ChoiceSet,
    InputPolicy, Intent, SuggestionList, SymbolTable, TemplateSet, Utterance,
};
use parley_lexicon::{load_templates, Lexicon};
use parley_observability::EngineMetrics;
use serde::Serialize;
use tracing::{debug, info, instrument};

pub use config::EngineConfig;
pub use parley_lexicon::LexiconStats;
pub use speech::{speak_selection, SpeechSink};

/// Everything one `suggest` call decided, for hosts that show more than the
/// list itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionOutcome {
    pub intent: Intent,
    pub choices: ChoiceSet,
    pub suggestions: SuggestionList,
    pub truncated: bool,
}

/// Stateless facade over classification, choice extraction and composition.
///
/// Configuration is read-only after construction, so one engine can be
/// shared across threads behind an `Arc` or cloned cheaply.
#[derive(Clone)]
pub struct SuggestionEngine {
    symbols: Arc<SymbolTable>,
    templates: Arc<TemplateSet>,
    policy: InputPolicy,
    lexicon_stats: Arc<LexiconStats>,
    metrics: Arc<EngineMetrics>,
}

impl SuggestionEngine {
    pub fn new(
        symbols: SymbolTable,
        templates: TemplateSet,
        policy: InputPolicy,
        metrics: Arc<EngineMetrics>,
    ) -> Result<Self> {
        templates
            .validate()
            .context("suggestion templates failed validation")?;
        let lexicon_stats = LexiconStats {
            packs_loaded: 0,
            entries: symbols.len(),
            categories: symbols.category_count(),
            sources: Vec::new(),
        };

        Ok(Self {
            symbols: Arc::new(symbols),
            templates: Arc::new(templates),
            policy,
            lexicon_stats: Arc::new(lexicon_stats),
            metrics,
        })
    }

    pub fn builtin() -> Self {
        Self {
            symbols: Arc::new(SymbolTable::builtin()),
            templates: Arc::new(TemplateSet::default()),
            policy: InputPolicy::default(),
            lexicon_stats: Arc::new(Lexicon::builtin().stats),
            metrics: EngineMetrics::shared(),
        }
    }

    pub fn from_config(config: &EngineConfig, metrics: Arc<EngineMetrics>) -> Result<Self> {
        let lexicon = match &config.lexicon_dir {
            Some(dir) => Lexicon::from_dir(dir)
                .with_context(|| format!("failed loading lexicon from {}", dir.display()))?,
            None => Lexicon::builtin(),
        };
        let templates = match &config.templates_path {
            Some(path) => load_templates(path)?,
            None => TemplateSet::default(),
        };

        info!(
            packs = lexicon.stats.packs_loaded,
            entries = lexicon.stats.entries,
            categories = lexicon.stats.categories,
            max_input_chars = config.max_input_chars,
            "suggestion engine configured"
        );

        let mut engine = Self::new(
            lexicon.symbols,
            templates,
            InputPolicy::new(config.max_input_chars),
            metrics,
        )?;
        engine.lexicon_stats = Arc::new(lexicon.stats);
        Ok(engine)
    }

    /// The ordered candidates for one utterance; always one to three entries.
    pub fn generate(&self, utterance: &str) -> SuggestionList {
        self.suggest(utterance).suggestions
    }

    #[instrument(skip(self, utterance), fields(bytes = utterance.len()))]
    pub fn suggest(&self, utterance: &str) -> SuggestionOutcome {
        let started = Instant::now();
        self.metrics.inc_request();

        let bounded = self.policy.apply(utterance);
        if bounded.truncated {
            self.metrics.inc_truncated_input();
            debug!(
                original = bounded.original_graphemes,
                kept = self.policy.max_graphemes(),
                "utterance truncated before matching"
            );
        }

        let utterance = Utterance::new(&bounded.text);
        let intent = classify_utterance(&utterance);
        let choices = match intent {
            Intent::Choice => {
                self.metrics.inc_choice_extraction();
                parley_core::choices::extract_from(&utterance)
            }
            _ => ChoiceSet::new(),
        };

        let composition = compose_detailed(intent, &choices, &self.symbols, &self.templates);
        if composition.filled_from_fallback > 0 {
            self.metrics.inc_shortfall_fill();
        }
        self.metrics.record_intent(intent);
        self.metrics.observe_latency(started.elapsed());

        debug!(
            intent = ?intent,
            choices = choices.len(),
            suggestions = composition.suggestions.len(),
            filled = composition.filled_from_fallback,
            truncated = bounded.truncated,
            "suggestions composed"
        );

        SuggestionOutcome {
            intent,
            choices,
            suggestions: SuggestionList::from_candidates(composition.suggestions.into_vec()),
            truncated: bounded.truncated,
        }
    }

    pub fn classify(&self, utterance: &str) -> Intent {
        let bounded = self.policy.apply(utterance);
        classify_utterance(&Utterance::new(&bounded.text))
    }

    pub fn extract_choices(&self, utterance: &str) -> ChoiceSet {
        extract_choices(&self.policy.apply(utterance).text)
    }

    pub fn compose(&self, intent: Intent, choices: &ChoiceSet) -> SuggestionList {
        compose_suggestions(intent, choices, &self.symbols, &self.templates)
    }

    pub fn resolve_symbol(&self, token: &str) -> &str {
        self.symbols.resolve(token)
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn lexicon_stats(&self) -> &LexiconStats {
        &self.lexicon_stats
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }
}
