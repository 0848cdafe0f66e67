//! Backends that run in-process, and the registry that builds a backend from
//! its settings section.

pub mod echo;
pub mod hash;
pub mod registry;

pub use echo::EchoChatBackend;
pub use hash::HashEmbeddingBackend;
pub use registry::{
    build_chat_backend, build_embedding_backend, Backends, DynChatBackend, DynEmbeddingBackend,
};
