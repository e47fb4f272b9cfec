//! Common `sprovider` imports for downstream crates.

pub use crate::{
    Candidate, CompletionProvider, CompletionRequest, CompletionRequestBuilder,
    CompletionResponse, FunctionCallIntent, Message, NoopOperationHooks, OperationHooks,
    ProviderError, ProviderErrorKind, ProviderFuture, RetryClassify, RetryError, RetryPolicy,
    Role, TokenUsage, ToolDefinition, execute_with_retry,
};
pub use scommon::{BoxFuture, GenerationOptions, MetadataMap, Sleeper};
