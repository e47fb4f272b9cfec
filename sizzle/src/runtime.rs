//! Runtime wiring helpers that attach retry settings and observability hooks.

use std::sync::Arc;

use sobserve::{SafeOperationHooks, SafeRunHooks, SafeToolHooks, TracingObservabilityHooks};

use crate::{
    AssistantBackend, AssistantConfig, AssistantError, AssistantService, AssistantServiceBuilder,
    ChatServiceBuilder, ClientConfig, CompletionProvider, FunctionRegistry, OperationHooks,
    RunHooks, ToolRuntimeHooks,
};

/// Shared tracing hooks, each wrapped so a panicking subscriber never aborts a turn.
#[derive(Clone)]
pub struct ObservabilityBundle {
    pub operation: Arc<dyn OperationHooks>,
    pub tool: Arc<dyn ToolRuntimeHooks>,
    pub run: Arc<dyn RunHooks>,
}

impl Default for ObservabilityBundle {
    fn default() -> Self {
        Self {
            operation: Arc::new(SafeOperationHooks::new(TracingObservabilityHooks)),
            tool: Arc::new(SafeToolHooks::new(TracingObservabilityHooks)),
            run: Arc::new(SafeRunHooks::new(TracingObservabilityHooks)),
        }
    }
}

pub fn chat_service_builder(
    provider: Arc<dyn CompletionProvider>,
    model: impl Into<String>,
    config: &ClientConfig,
) -> ChatServiceBuilder {
    chat_service_builder_with(provider, model, config, ObservabilityBundle::default())
}

pub fn chat_service_builder_with(
    provider: Arc<dyn CompletionProvider>,
    model: impl Into<String>,
    config: &ClientConfig,
    hooks: ObservabilityBundle,
) -> ChatServiceBuilder {
    ChatServiceBuilder::new(provider, model)
        .retry_policy(config.retry.clone())
        .operation_hooks(hooks.operation)
        .tool_hooks(hooks.tool)
}

/// Applies the client's retry and polling settings to an assistant configuration.
pub fn assistant_config(config: &ClientConfig, model: impl Into<String>) -> AssistantConfig {
    AssistantConfig::new(model)
        .with_retry_policy(config.retry.clone())
        .with_poll_interval(config.poll_interval)
}

pub fn assistant_service_builder(
    backend: Arc<dyn AssistantBackend>,
    config: AssistantConfig,
) -> AssistantServiceBuilder {
    assistant_service_builder_with(backend, config, ObservabilityBundle::default())
}

pub fn assistant_service_builder_with(
    backend: Arc<dyn AssistantBackend>,
    config: AssistantConfig,
    hooks: ObservabilityBundle,
) -> AssistantServiceBuilder {
    AssistantService::builder(backend, config)
        .operation_hooks(hooks.operation)
        .tool_hooks(hooks.tool)
        .run_hooks(hooks.run)
}

/// Validates `config`, creates the remote assistant, and returns an observed service.
pub async fn create_assistant(
    backend: Arc<dyn AssistantBackend>,
    config: AssistantConfig,
    registry: Option<FunctionRegistry>,
) -> Result<AssistantService, AssistantError> {
    let mut builder = assistant_service_builder(backend, config);
    if let Some(registry) = registry {
        builder = builder.registry(registry);
    }
    builder.create().await
}
