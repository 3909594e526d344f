use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_MAX_INPUT_CHARS: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedInput<'a> {
    pub text: Cow<'a, str>,
    pub truncated: bool,
    pub original_graphemes: usize,
}

/// Caps how much text reaches the matchers. Regex cost grows with input, so
/// oversize input is cut at a grapheme boundary rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPolicy {
    max_graphemes: usize,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_CHARS)
    }
}

impl InputPolicy {
    pub fn new(max_graphemes: usize) -> Self {
        Self {
            max_graphemes: max_graphemes.max(1),
        }
    }

    pub fn max_graphemes(&self) -> usize {
        self.max_graphemes
    }

    pub fn exceeds(&self, text: &str) -> bool {
        // byte length bounds grapheme count, so short input skips segmentation
        text.len() > self.max_graphemes && text.graphemes(true).count() > self.max_graphemes
    }

    pub fn apply<'a>(&self, text: &'a str) -> BoundedInput<'a> {
        let original_graphemes = text.graphemes(true).count();
        if original_graphemes <= self.max_graphemes {
            return BoundedInput {
                text: Cow::Borrowed(text),
                truncated: false,
                original_graphemes,
            };
        }

        let kept_bytes = text
            .grapheme_indices(true)
            .nth(self.max_graphemes)
            .map(|(offset, _)| offset)
            .unwrap_or(text.len());

        BoundedInput {
            text: Cow::Borrowed(&text[..kept_bytes]),
            truncated: true,
            original_graphemes,
        }
    }
}
