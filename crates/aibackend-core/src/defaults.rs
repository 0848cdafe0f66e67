//! Per-model default values used when a setting is not given explicitly.
//!
//! Resolution never reads a global table: the lookups are passed in, so tests
//! and callers decide exactly which models are known.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CHUNK_OVERLAP_CHARACTERS: usize = 200;

pub trait TokenLimitLookup {
    fn default_token_limit(&self, model_id: &str) -> Option<usize>;
}

pub trait ChunkOverlapDefault {
    fn default_chunk_overlap(&self) -> usize;
}

pub trait EmbeddingDimensionsLookup {
    fn default_embedding_output_dimensions(&self, model_id: &str) -> Option<usize>;
}

const BUILTIN_TOKEN_LIMITS: &[(&str, usize)] = &[
    ("gpt-3.5-turbo", 4_096),
    ("gpt-3.5-turbo-16k", 16_384),
    ("gpt-4", 8_192),
    ("gpt-4-32k", 32_768),
    ("gpt-4-turbo", 128_000),
    ("gpt-4o", 128_000),
    ("gpt-4o-mini", 128_000),
    ("claude-3-haiku", 200_000),
    ("claude-3-sonnet", 200_000),
    ("claude-3-opus", 200_000),
    ("llama3", 8_192),
    ("mistral", 32_768),
    ("text-embedding-ada-002", 8_191),
    ("text-embedding-3-small", 8_191),
    ("text-embedding-3-large", 8_191),
    ("bge-m3", 8_192),
    ("all-MiniLM-L6-v2", 256),
    ("nomic-embed-text", 8_192),
];

const BUILTIN_EMBEDDING_DIMENSIONS: &[(&str, usize)] = &[
    ("text-embedding-ada-002", 1_536),
    ("text-embedding-3-small", 1_536),
    ("text-embedding-3-large", 3_072),
    ("bge-m3", 1_024),
    ("all-MiniLM-L6-v2", 384),
    ("nomic-embed-text", 768),
];

/// In-memory default tables implementing every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefaults {
    token_limits: HashMap<String, usize>,
    embedding_output_dimensions: HashMap<String, usize>,
    chunk_overlap_characters: usize,
}

impl Default for ModelDefaults {
    fn default() -> Self { Self::empty() }
}

impl ModelDefaults {
    /// No known models; only the chunk overlap default is set.
    pub fn empty() -> Self {
        Self {
            token_limits: HashMap::new(),
            embedding_output_dimensions: HashMap::new(),
            chunk_overlap_characters: DEFAULT_CHUNK_OVERLAP_CHARACTERS,
        }
    }

    /// Defaults for commonly deployed chat and embedding models.
    pub fn builtin() -> Self {
        let mut defaults = Self::empty();
        for &(model, limit) in BUILTIN_TOKEN_LIMITS {
            defaults.token_limits.insert(model.to_string(), limit);
        }
        for &(model, dims) in BUILTIN_EMBEDDING_DIMENSIONS {
            defaults.embedding_output_dimensions.insert(model.to_string(), dims);
        }
        defaults
    }

    #[must_use]
    pub fn with_token_limit(mut self, model_id: impl Into<String>, limit: usize) -> Self {
        self.token_limits.insert(model_id.into(), limit);
        self
    }

    #[must_use]
    pub fn with_embedding_output_dimensions(mut self, model_id: impl Into<String>, dims: usize) -> Self {
        self.embedding_output_dimensions.insert(model_id.into(), dims);
        self
    }

    #[must_use]
    pub fn with_chunk_overlap(mut self, characters: usize) -> Self {
        self.chunk_overlap_characters = characters;
        self
    }

    /// Layer entries from a settings file on top of these tables.
    #[must_use]
    pub fn merged_with(mut self, overrides: &ModelDefaultsOverrides) -> Self {
        self.token_limits
            .extend(overrides.token_limits.iter().map(|(k, v)| (k.clone(), *v)));
        self.embedding_output_dimensions.extend(
            overrides
                .embedding_output_dimensions
                .iter()
                .map(|(k, v)| (k.clone(), *v)),
        );
        if let Some(overlap) = overrides.chunk_overlap_characters {
            self.chunk_overlap_characters = overlap;
        }
        self
    }
}

impl TokenLimitLookup for ModelDefaults {
    fn default_token_limit(&self, model_id: &str) -> Option<usize> {
        self.token_limits.get(model_id).copied()
    }
}

impl ChunkOverlapDefault for ModelDefaults {
    fn default_chunk_overlap(&self) -> usize { self.chunk_overlap_characters }
}

impl EmbeddingDimensionsLookup for ModelDefaults {
    fn default_embedding_output_dimensions(&self, model_id: &str) -> Option<usize> {
        self.embedding_output_dimensions.get(model_id).copied()
    }
}

/// The `[model_defaults]` section of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaultsOverrides {
    pub token_limits: HashMap<String, usize>,
    pub embedding_output_dimensions: HashMap<String, usize>,
    pub chunk_overlap_characters: Option<usize>,
}
