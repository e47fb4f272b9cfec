mod auth;
mod provider;
mod serde_api;
mod tests;
mod transport;
mod types;

pub use auth::resolve_openai_auth;
pub use provider::OpenAiProvider;
pub use transport::{
    DEFAULT_OPENAI_BASE_URL, OpenAiHttpTransport, OpenAiTransport, error_from_response,
    error_from_send, error_from_status,
};
pub use types::{
    OpenAiAuth, OpenAiChoice, OpenAiFinishReason, OpenAiFunction, OpenAiFunctionCall,
    OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiRole, OpenAiUsage,
};
