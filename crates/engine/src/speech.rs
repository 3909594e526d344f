use anyhow::Result;
use parley_core::{Suggestion, SuggestionList};
use tracing::info;

/// Where a picked suggestion goes to be spoken.
pub trait SpeechSink {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Forwards the suggestion at `index` to the sink. Out-of-range picks are
/// ignored and return `None`.
pub fn speak_selection<S>(
    sink: &mut S,
    suggestions: &SuggestionList,
    index: usize,
) -> Result<Option<Suggestion>>
where
    S: SpeechSink + ?Sized,
{
    let Some(picked) = suggestions.get(index) else {
        return Ok(None);
    };

    sink.speak(&picked.text)?;
    info!(index, symbol = %picked.symbol, "suggestion spoken");
    Ok(Some(picked.clone()))
}
