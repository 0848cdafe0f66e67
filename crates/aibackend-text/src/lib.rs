//! Text splitting for backends: a recursive character splitter and the
//! length calculators it measures chunks with.

pub mod length;
pub mod splitter;

use aibackend_core::error::ConfigError;
use aibackend_core::TextComponents;

pub use length::{ApproximateTokenLengthCalculator, CharacterLengthCalculator};
pub use splitter::RecursiveCharacterSplitter;

/// Recursive splitter measuring in approximate tokens.
pub fn default_components() -> TextComponents {
    TextComponents {
        text_splitter: RecursiveCharacterSplitter::boxed,
        length_calculator: length::approximate_tokens,
    }
}

/// Components using the named length calculator, or the defaults for `None`.
pub fn components_for(length_calculator: Option<&str>) -> Result<TextComponents, ConfigError> {
    let mut components = default_components();
    if let Some(name) = length_calculator {
        components.length_calculator = length::named(name)?;
    }
    Ok(components)
}
