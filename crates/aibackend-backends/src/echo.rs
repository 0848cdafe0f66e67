use aibackend_core::error::{BackendError, BackendResult};
use aibackend_core::{AiResponse, Backend, ChatBackend, ChatConfig};

/// Answers with the user messages joined by newlines. Useful for wiring
/// checks and tests where no provider is reachable.
#[derive(Debug, Clone)]
pub struct EchoChatBackend {
    config: ChatConfig,
}

impl Backend for EchoChatBackend {
    type Config = ChatConfig;

    fn from_config(config: ChatConfig) -> Self { Self { config } }

    fn config(&self) -> &ChatConfig { &self.config }
}

impl ChatBackend for EchoChatBackend {
    fn chat(&self, user_messages: &[String]) -> BackendResult<AiResponse> {
        if user_messages.is_empty() {
            return Err(BackendError::InvalidInput("at least one user message is required".to_string()));
        }
        Ok(AiResponse::single(user_messages.join("\n")))
    }
}
