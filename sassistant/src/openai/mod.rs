//! OpenAI Assistants v2 backend.

mod backend;
mod wire;

pub use backend::OpenAiAssistantsBackend;
