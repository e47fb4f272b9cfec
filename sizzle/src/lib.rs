//! Unified facade over the sizzle workspace crates.
//!
//! This crate is meant to be the single dependency for most applications. It re-exports
//! the chat and assistant orchestrators, wires the OpenAI adapters from a [`ClientConfig`],
//! and attaches tracing hooks by default.
//!
//! ```rust,no_run
//! use sizzle::{ClientConfig, FunctionCallPolicy, build_completion_provider, chat_service_builder, sz_messages};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let provider = build_completion_provider(&config)?;
//! let chat = chat_service_builder(provider, "gpt-4o-mini", &config)
//!     .persona("You are concise.")
//!     .build()?;
//!
//! let history = sz_messages![user => "Name three rivers in Norway."];
//! let result = chat.chat(&history, 1, &FunctionCallPolicy::none()).await?;
//! println!("{}", result.candidates[0].content);
//! # Ok(())
//! # }
//! ```

mod config;
mod macros;

pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use sassistant;
pub use schat;
pub use scommon;
pub use serde_json;
pub use sobserve;
pub use sprovider;
pub use stooling;

pub use config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, MAX_ATTEMPTS_ENV, TIMEOUT_ENV};
pub use sassistant::{
    APPROVED_MODELS, AssistantBackend, AssistantConfig, AssistantError, AssistantErrorKind,
    AssistantProfile, AssistantReply, AssistantService, AssistantServiceBuilder, AssistantTool,
    AssistantTurnResult, CapturedCall, FileTool, FileUpload, NoopRunHooks, PollPolicy, RunHooks,
    RunStatus, ToolChoice, ToolInvocation, UserTurn,
};
pub use schat::{
    CandidateResult, ChatError, ChatErrorKind, ChatService, ChatServiceBuilder, ChatTurnResult,
    FunctionCallPolicy, FunctionCallPolicyBuilder,
};
pub use scommon::{
    BoxFuture, DelaySleeper, GenerationOptions, MetadataMap, RecordingSleeper, RunId, Sleeper,
    ThreadId,
};
pub use sobserve::{
    MetricsObservabilityHooks, SafeOperationHooks, SafeRunHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use sprovider::{
    Candidate, CompletionProvider, CompletionRequest, CompletionResponse, Message,
    NoopOperationHooks, OperationHooks, ProviderError, ProviderErrorKind, ProviderFuture,
    RetryClassify, RetryPolicy, Role, SecretString, SecureCredentialManager, TokenUsage,
    ToolDefinition, execute_with_retry,
};
pub use stooling::{
    ArgumentMode, FunctionRegistry, InvocationMode, NoopToolRuntimeHooks, ToolArgs, ToolError,
    ToolErrorKind, ToolRuntimeHooks, parse_json_object, required_string,
};

pub use providers::{
    build_assistant_backend, build_completion_provider, build_completion_provider_from_api_key,
};
pub use runtime::{
    ObservabilityBundle, assistant_config, assistant_service_builder,
    assistant_service_builder_with, chat_service_builder, chat_service_builder_with,
    create_assistant,
};
pub use util::{
    assistant_message, capture_policy, function_message, function_tool, parse_tool_choice,
    system_message, user_message, user_turn,
};
