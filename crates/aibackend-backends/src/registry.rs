//! Build backends from their settings sections.
//!
//! A section names the implementation in `class` and carries the settings
//! mapping in `config`:
//!
//! ```toml
//! [embedding]
//! class = "hash"
//!
//! [embedding.config]
//! MODEL_ID = "text-embedding-3-small"
//! LENGTH_CALCULATOR = "characters"
//! ```

use tracing::info;

use aibackend_core::error::ConfigError;
use aibackend_core::settings::LENGTH_CALCULATOR;
use aibackend_core::{
    Backend, BackendConfig, BackendSettings, ChatBackend, ChatConfig, EmbeddingBackend,
    EmbeddingConfig, ModelDefaults, Settings, TextComponents,
};
use aibackend_text::components_for;

use crate::echo::EchoChatBackend;
use crate::hash::HashEmbeddingBackend;

pub const ECHO: &str = "echo";
pub const HASH: &str = "hash";

pub type DynChatBackend = Box<dyn ChatBackend<Config = ChatConfig>>;
pub type DynEmbeddingBackend = Box<dyn EmbeddingBackend<Config = EmbeddingConfig>>;

/// Text components selected by the section's `LENGTH_CALCULATOR`, if any.
pub fn components_from(settings: &BackendSettings) -> Result<TextComponents, ConfigError> {
    components_for(settings.config.optional_str(LENGTH_CALCULATOR)?)
}

pub fn build_chat_backend(
    settings: &BackendSettings,
    defaults: &ModelDefaults,
) -> Result<DynChatBackend, ConfigError> {
    build_chat_backend_with(settings, defaults, components_from(settings)?)
}

pub fn build_chat_backend_with(
    settings: &BackendSettings,
    defaults: &ModelDefaults,
    components: TextComponents,
) -> Result<DynChatBackend, ConfigError> {
    let class = settings.class.trim().to_ascii_lowercase();
    if class != ECHO {
        return Err(unknown("chat", &settings.class));
    }
    let config = ChatConfig::from_settings(&settings.config, defaults, components)?;
    info!(class = %class, model_id = config.base().model_id(), "built chat backend");
    Ok(Box::new(EchoChatBackend::from_config(config)))
}

pub fn build_embedding_backend(
    settings: &BackendSettings,
    defaults: &ModelDefaults,
) -> Result<DynEmbeddingBackend, ConfigError> {
    build_embedding_backend_with(settings, defaults, components_from(settings)?)
}

pub fn build_embedding_backend_with(
    settings: &BackendSettings,
    defaults: &ModelDefaults,
    components: TextComponents,
) -> Result<DynEmbeddingBackend, ConfigError> {
    let class = settings.class.trim().to_ascii_lowercase();
    if class != HASH {
        return Err(unknown("embedding", &settings.class));
    }
    let config = EmbeddingConfig::from_settings(&settings.config, defaults, components)?;
    info!(
        class = %class,
        model_id = config.base().model_id(),
        dimensions = config.embedding_output_dimensions(),
        "built embedding backend"
    );
    Ok(Box::new(HashEmbeddingBackend::from_config(config)))
}

fn unknown(role: &str, class: &str) -> ConfigError {
    ConfigError::UnknownBackend { role: role.to_string(), class: class.to_string() }
}

/// Every backend configured in one settings document.
pub struct Backends {
    pub chat: Option<DynChatBackend>,
    pub embedding: Option<DynEmbeddingBackend>,
}

impl Backends {
    /// Build all configured backends using the built-in model defaults
    /// extended by the document's `[model_defaults]` section. Fails on the
    /// first misconfigured backend.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let defaults = ModelDefaults::builtin().merged_with(&settings.model_defaults);
        let chat = settings
            .chat
            .as_ref()
            .map(|s| build_chat_backend(s, &defaults))
            .transpose()?;
        let embedding = settings
            .embedding
            .as_ref()
            .map(|s| build_embedding_backend(s, &defaults))
            .transpose()?;
        Ok(Self { chat, embedding })
    }
}
