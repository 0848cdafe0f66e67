//! Resolution of a settings mapping into an immutable backend config.
//!
//! Each numeric field follows the same rule: an explicit override wins and is
//! coerced to an integer, otherwise the default for the model is looked up.
//! Resolution either produces a complete config or fails; nothing partial is
//! ever returned.

use serde_json::Value;
use tracing::debug;

use crate::defaults::{ChunkOverlapDefault, EmbeddingDimensionsLookup, TokenLimitLookup};
use crate::error::{ConfigError, Result};
use crate::settings::{
    coerce_int, ConfigSettings, CHUNK_OVERLAP_CHARACTERS, EMBEDDING_OUTPUT_DIMENSIONS, TOKEN_LIMIT,
};
use crate::traits::{
    BackendConfig, EmbeddingBackendConfig, LengthCalculatorFactory, TextComponents,
    TextSplitterFactory,
};

#[derive(Debug, Clone)]
pub struct BaseConfig {
    model_id: String,
    token_limit: usize,
    chunk_overlap_characters: usize,
    components: TextComponents,
}

impl BaseConfig {
    pub fn new(
        model_id: impl Into<String>,
        token_limit: usize,
        chunk_overlap_characters: usize,
        components: TextComponents,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            token_limit,
            chunk_overlap_characters,
            components,
        }
    }

    pub fn from_settings<D>(
        settings: &ConfigSettings,
        defaults: &D,
        components: TextComponents,
    ) -> Result<Self>
    where
        D: TokenLimitLookup + ChunkOverlapDefault + ?Sized,
    {
        let model_id = settings.model_id()?;
        let token_limit = Self::resolve_token_limit(model_id, settings.get(TOKEN_LIMIT), defaults)?;
        let chunk_overlap_characters =
            Self::resolve_chunk_overlap(settings.get(CHUNK_OVERLAP_CHARACTERS), defaults)?;
        debug!(model_id, token_limit, chunk_overlap_characters, "resolved base config");
        Ok(Self::new(model_id, token_limit, chunk_overlap_characters, components))
    }

    pub fn resolve_token_limit<L>(model_id: &str, custom: Option<&Value>, lookup: &L) -> Result<usize>
    where
        L: TokenLimitLookup + ?Sized,
    {
        if let Some(value) = custom {
            return coerce_int(TOKEN_LIMIT, value);
        }
        lookup
            .default_token_limit(model_id)
            .ok_or_else(|| ConfigError::no_default(TOKEN_LIMIT, model_id))
    }

    /// The overlap default is model independent.
    pub fn resolve_chunk_overlap<C>(custom: Option<&Value>, default: &C) -> Result<usize>
    where
        C: ChunkOverlapDefault + ?Sized,
    {
        match custom {
            Some(value) => coerce_int(CHUNK_OVERLAP_CHARACTERS, value),
            None => Ok(default.default_chunk_overlap()),
        }
    }

    pub fn model_id(&self) -> &str { &self.model_id }

    pub fn token_limit(&self) -> usize { self.token_limit }

    pub fn chunk_overlap_characters(&self) -> usize { self.chunk_overlap_characters }

    pub fn text_splitter(&self) -> TextSplitterFactory { self.components.text_splitter }

    pub fn length_calculator(&self) -> LengthCalculatorFactory { self.components.length_calculator }
}

impl BackendConfig for BaseConfig {
    fn base(&self) -> &BaseConfig { self }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    base: BaseConfig,
}

impl ChatConfig {
    pub fn new(base: BaseConfig) -> Self { Self { base } }

    pub fn from_settings<D>(
        settings: &ConfigSettings,
        defaults: &D,
        components: TextComponents,
    ) -> Result<Self>
    where
        D: TokenLimitLookup + ChunkOverlapDefault + ?Sized,
    {
        BaseConfig::from_settings(settings, defaults, components).map(Self::new)
    }
}

impl BackendConfig for ChatConfig {
    fn base(&self) -> &BaseConfig { &self.base }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    base: BaseConfig,
    embedding_output_dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(base: BaseConfig, embedding_output_dimensions: usize) -> Self {
        Self { base, embedding_output_dimensions }
    }

    /// Dimensions are resolved first, then the shared fields.
    pub fn from_settings<D>(
        settings: &ConfigSettings,
        defaults: &D,
        components: TextComponents,
    ) -> Result<Self>
    where
        D: TokenLimitLookup + ChunkOverlapDefault + EmbeddingDimensionsLookup + ?Sized,
    {
        let model_id = settings.model_id()?;
        let dims = Self::resolve_embedding_output_dimensions(
            model_id,
            settings.get(EMBEDDING_OUTPUT_DIMENSIONS),
            defaults,
        )?;
        debug!(model_id, embedding_output_dimensions = dims, "resolved embedding dimensions");
        let base = BaseConfig::from_settings(settings, defaults, components)?;
        Ok(Self::new(base, dims))
    }

    pub fn resolve_embedding_output_dimensions<L>(
        model_id: &str,
        custom: Option<&Value>,
        lookup: &L,
    ) -> Result<usize>
    where
        L: EmbeddingDimensionsLookup + ?Sized,
    {
        if let Some(value) = custom {
            return coerce_int(EMBEDDING_OUTPUT_DIMENSIONS, value);
        }
        lookup
            .default_embedding_output_dimensions(model_id)
            .ok_or_else(|| ConfigError::no_default(EMBEDDING_OUTPUT_DIMENSIONS, model_id))
    }

    pub fn embedding_output_dimensions(&self) -> usize { self.embedding_output_dimensions }
}

impl BackendConfig for EmbeddingConfig {
    fn base(&self) -> &BaseConfig { &self.base }
}

impl EmbeddingBackendConfig for EmbeddingConfig {
    fn embedding_output_dimensions(&self) -> usize { self.embedding_output_dimensions }
}
