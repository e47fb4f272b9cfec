//! Dispatcher trait and default registry-backed implementation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use serde_json::Value;

use crate::{
    ArgumentMode, DispatchOutcome, FunctionCall, FunctionRegistry, InvocationContext,
    NoopToolRuntimeHooks, ToolArgs, ToolError, ToolFuture, ToolRuntimeHooks,
    parse_model_arguments,
};

pub trait Dispatcher: Send + Sync {
    fn dispatch<'a>(
        &'a self,
        call: FunctionCall,
        mode: &'a ArgumentMode,
        context: &'a InvocationContext,
    ) -> ToolFuture<'a, Result<DispatchOutcome, ToolError>>;
}

/// Arguments to invoke with, and the arguments to report as used.
pub fn resolve_arguments(call: &FunctionCall, mode: &ArgumentMode) -> Option<ToolArgs> {
    match mode {
        ArgumentMode::ModelSupplied => parse_model_arguments(&call.arguments),
        ArgumentMode::CallerSupplied(args) => Some(args.clone()),
        ArgumentMode::NoArgs => None,
    }
}

#[derive(Clone)]
pub struct FunctionDispatcher {
    registry: Arc<FunctionRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl FunctionDispatcher {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<FunctionRegistry> {
        Arc::clone(&self.registry)
    }

    async fn run(
        &self,
        call: &FunctionCall,
        mode: &ArgumentMode,
        context: &InvocationContext,
    ) -> Result<DispatchOutcome, ToolError> {
        let name = call
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ToolError::missing_name("function call did not name a function"))?;

        let invocable = self.registry.get(name).ok_or_else(|| {
            ToolError::not_found(format!("function '{name}' is not registered"))
                .with_tool_name(name)
        })?;

        let args = resolve_arguments(call, mode);
        let invoke_args = args.clone().unwrap_or_default();
        let result = AssertUnwindSafe(async { invocable.invoke(invoke_args, context).await })
            .catch_unwind()
            .await
            .map_err(|_| ToolError::execution(format!("function '{name}' panicked")))?
            .map_err(|error| {
                if error.tool_name.is_some() {
                    error
                } else {
                    error.with_tool_name(name)
                }
            })?;

        let output = match result {
            Value::String(text) => text,
            other => {
                return Err(ToolError::non_text_result(format!(
                    "function '{name}' returned {} instead of text",
                    value_kind(&other)
                ))
                .with_tool_name(name));
            }
        };

        Ok(DispatchOutcome {
            name: name.to_string(),
            args,
            output,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl std::fmt::Debug for FunctionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Dispatcher for FunctionDispatcher {
    fn dispatch<'a>(
        &'a self,
        call: FunctionCall,
        mode: &'a ArgumentMode,
        context: &'a InvocationContext,
    ) -> ToolFuture<'a, Result<DispatchOutcome, ToolError>> {
        Box::pin(async move {
            self.hooks.on_dispatch_start(&call, context);
            let started = Instant::now();

            let result = self.run(&call, mode, context).await.map_err(|error| {
                match (&call.id, &error.tool_call_id) {
                    (Some(id), None) => error.with_tool_call_id(id.clone()),
                    _ => error,
                }
            });

            match &result {
                Ok(outcome) => {
                    self.hooks
                        .on_dispatch_success(&call, context, outcome, started.elapsed())
                }
                Err(error) => {
                    self.hooks
                        .on_dispatch_failure(&call, context, error, started.elapsed())
                }
            }

            result
        })
    }
}
