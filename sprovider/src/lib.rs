//! Completion provider contracts, shared model types, and retry policy.

pub mod adapters;
mod credentials;
mod error;
mod model;
mod provider;
mod resilience;

pub mod prelude;

pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Candidate, CompletionRequest, CompletionRequestBuilder, CompletionResponse,
    FunctionCallIntent, Message, Role, TokenUsage, ToolDefinition,
};
pub use provider::{CompletionProvider, ProviderFuture};
pub use resilience::{
    NoopOperationHooks, OperationHooks, RetryClassify, RetryError, RetryPolicy,
    execute_with_retry,
};
pub use scommon::{BoxFuture, GenerationOptions, MetadataMap};
