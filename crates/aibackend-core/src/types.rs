//! Values produced by backends.

use serde::{Deserialize, Serialize};

use crate::error::BackendResult;

pub type Embedding = Vec<f32>;

/// Lazily evaluated embedding output: one item per input, in input order.
pub type Embeddings<'a> = Box<dyn Iterator<Item = BackendResult<Embedding>> + 'a>;

/// Response from a chat backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    pub choices: Vec<String>,
}

impl AiResponse {
    pub fn single(text: impl Into<String>) -> Self { Self { choices: vec![text.into()] } }

    /// The first choice, or an empty string when the provider returned none.
    pub fn text(&self) -> &str {
        self.choices.first().map_or("", String::as_str)
    }
}

impl std::fmt::Display for AiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
