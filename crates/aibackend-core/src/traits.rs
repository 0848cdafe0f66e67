//! Seams between config resolution, text splitting and provider backends.

use std::fmt::Debug;

use crate::config::BaseConfig;
use crate::error::BackendResult;
use crate::types::{AiResponse, Embeddings};

/// Measures text in the units a splitter counts chunk sizes in.
pub trait LengthCalculator: Send + Sync {
    fn splitter_length(&self, text: &str) -> usize;
}

pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Arguments every text splitter is constructed with.
pub struct SplitterOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub length_calculator: Box<dyn LengthCalculator>,
}

impl Debug for SplitterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitterOptions")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .finish_non_exhaustive()
    }
}

pub type TextSplitterFactory = fn(SplitterOptions) -> Box<dyn TextSplitter>;
pub type LengthCalculatorFactory = fn() -> Box<dyn LengthCalculator>;

/// The splitter and length calculator a config hands to its backend.
#[derive(Debug, Clone, Copy)]
pub struct TextComponents {
    pub text_splitter: TextSplitterFactory,
    pub length_calculator: LengthCalculatorFactory,
}

pub trait BackendConfig: Debug + Send + Sync {
    fn base(&self) -> &BaseConfig;
}

pub trait EmbeddingBackendConfig: BackendConfig {
    fn embedding_output_dimensions(&self) -> usize;
}

/// Shared behaviour of every backend: it owns one resolved config and can
/// build a text splitter sized for its model.
pub trait Backend: Send + Sync {
    type Config: BackendConfig;

    fn from_config(config: Self::Config) -> Self
    where
        Self: Sized;

    fn config(&self) -> &Self::Config;

    /// Splitter with chunk size = token limit and overlap = chunk overlap,
    /// measuring text with [`Backend::splitter_length_calculator`].
    fn text_splitter(&self) -> Box<dyn TextSplitter> {
        let base = self.config().base();
        (base.text_splitter())(SplitterOptions {
            chunk_size: base.token_limit(),
            chunk_overlap: base.chunk_overlap_characters(),
            length_calculator: self.splitter_length_calculator(),
        })
    }

    fn splitter_length_calculator(&self) -> Box<dyn LengthCalculator> {
        (self.config().base().length_calculator())()
    }
}

pub trait ChatBackend: Backend {
    fn chat(&self, user_messages: &[String]) -> BackendResult<AiResponse>;
}

pub trait EmbeddingBackend: Backend<Config: EmbeddingBackendConfig> {
    /// Embed each input. Vectors are produced as the iterator is advanced.
    fn embed<'a>(&'a self, inputs: Vec<String>) -> Embeddings<'a>;

    fn embedding_output_dimensions(&self) -> usize {
        self.config().embedding_output_dimensions()
    }
}
