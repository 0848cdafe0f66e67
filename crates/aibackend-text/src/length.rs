use aibackend_core::error::ConfigError;
use aibackend_core::traits::LengthCalculatorFactory;
use aibackend_core::LengthCalculator;

/// Counts Unicode scalar values.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharacterLengthCalculator;

impl LengthCalculator for CharacterLengthCalculator {
    fn splitter_length(&self, text: &str) -> usize { text.chars().count() }
}

/// Estimates tokens without a tokenizer: roughly 0.75 words per token, and
/// never fewer than one token per four characters so unspaced runs (URLs,
/// CJK text) are not undercounted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateTokenLengthCalculator;

impl LengthCalculator for ApproximateTokenLengthCalculator {
    fn splitter_length(&self, text: &str) -> usize {
        let by_words = text.split_whitespace().count() * 4 / 3;
        let by_chars = text.chars().count() / 4;
        by_words.max(by_chars)
    }
}

pub fn characters() -> Box<dyn LengthCalculator> { Box::new(CharacterLengthCalculator) }

pub fn approximate_tokens() -> Box<dyn LengthCalculator> { Box::new(ApproximateTokenLengthCalculator) }

pub fn named(name: &str) -> Result<LengthCalculatorFactory, ConfigError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "characters" | "chars" => Ok(characters),
        "tokens" | "approximate_tokens" => Ok(approximate_tokens),
        _ => Err(ConfigError::UnknownLengthCalculator { name: name.to_string() }),
    }
}
