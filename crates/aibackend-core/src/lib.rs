//! Configuration resolution and base traits for chat and embedding backends.
//!
//! A backend is built from a settings mapping (`MODEL_ID` plus optional
//! overrides). Missing values are filled from injected model-default tables
//! and the result is an immutable config that the backend holds for its
//! whole lifetime.
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod settings;
pub mod traits;
pub mod types;

pub use config::{BaseConfig, ChatConfig, EmbeddingConfig};
pub use defaults::ModelDefaults;
pub use error::{BackendError, ConfigError};
pub use loader::{BackendSettings, Settings, SettingsLoader};
pub use settings::ConfigSettings;
pub use traits::{
    Backend, BackendConfig, ChatBackend, EmbeddingBackend, EmbeddingBackendConfig,
    LengthCalculator, SplitterOptions, TextComponents, TextSplitter,
};
pub use types::{AiResponse, Embedding, Embeddings};
