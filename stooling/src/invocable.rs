//! The single callable contract behind every registered function.
//!
//! ```rust
//! use serde_json::Value;
//! use stooling::{CaptureArgs, FunctionInvocable, Invocable};
//!
//! let recipe = FunctionInvocable::from_sync(|args, _ctx| {
//!     let dish = args.get("dish").and_then(Value::as_str).unwrap_or("rice");
//!     Ok(Value::String(format!("boil the {dish}")))
//! });
//! let capture = CaptureArgs;
//!
//! fn accepts(_invocable: &dyn Invocable) {}
//! accepts(&recipe);
//! accepts(&capture);
//! ```

use std::future::Future;
use std::sync::Arc;

use scommon::BoxFuture;
use serde_json::Value;

use crate::{InvocationContext, ToolArgs, ToolError, args_to_json};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// A locally registered function the backend may ask to run.
///
/// Results are JSON values so that non-text returns can be detected and rejected
/// by the dispatcher; only `Value::String` is accepted as output.
pub trait Invocable: Send + Sync {
    fn invoke<'a>(
        &'a self,
        args: ToolArgs,
        context: &'a InvocationContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>>;
}

type InvocableHandler = dyn Fn(ToolArgs, InvocationContext) -> ToolFuture<'static, Result<Value, ToolError>>
    + Send
    + Sync;

/// Closure-backed invocable.
#[derive(Clone)]
pub struct FunctionInvocable {
    handler: Arc<InvocableHandler>,
}

impl FunctionInvocable {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ToolArgs, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let handler: Arc<InvocableHandler> = Arc::new(
            move |args: ToolArgs,
                  context: InvocationContext|
                  -> ToolFuture<'static, Result<Value, ToolError>> {
                Box::pin(handler(args, context))
            },
        );

        Self { handler }
    }

    pub fn from_sync<F>(handler: F) -> Self
    where
        F: Fn(ToolArgs, InvocationContext) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Self::new(move |args, context| {
            let handler = Arc::clone(&handler);
            async move { handler(args, context) }
        })
    }

    /// Wraps a function that always produces text.
    pub fn text<F>(handler: F) -> Self
    where
        F: Fn(ToolArgs) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self::from_sync(move |args, _context| handler(args).map(Value::String))
    }
}

impl std::fmt::Debug for FunctionInvocable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionInvocable")
    }
}

impl Invocable for FunctionInvocable {
    fn invoke<'a>(
        &'a self,
        args: ToolArgs,
        context: &'a InvocationContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        (self.handler)(args, context.clone())
    }
}

/// Stub that echoes its arguments back as JSON text without doing any work.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaptureArgs;

impl Invocable for CaptureArgs {
    fn invoke<'a>(
        &'a self,
        args: ToolArgs,
        _context: &'a InvocationContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move { Ok(Value::String(args_to_json(&args))) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse_json_object;

    #[tokio::test]
    async fn capture_args_echoes_arguments_verbatim() {
        let args = parse_json_object("{\"intent\":\"order\",\"qty\":2}").expect("args parse");
        let output = CaptureArgs
            .invoke(args.clone(), &InvocationContext::new())
            .await
            .expect("capture never fails");

        let text = output.as_str().expect("capture output is text");
        assert_eq!(parse_json_object(text).expect("echo parses"), args);
    }

    #[tokio::test]
    async fn function_invocable_passes_context_and_args() {
        let invocable = FunctionInvocable::new(|args, context: InvocationContext| async move {
            let thread = context
                .thread_id
                .map(|id| id.to_string())
                .unwrap_or_default();
            Ok(json!(format!("{thread}:{}", args.len())))
        });

        let context = InvocationContext::new().with_thread_id("thread_1");
        let output = invocable
            .invoke(parse_json_object("{\"a\":1}").expect("args parse"), &context)
            .await
            .expect("invoke should succeed");
        assert_eq!(output, json!("thread_1:1"));
    }

    #[tokio::test]
    async fn text_helper_wraps_strings() {
        let invocable = FunctionInvocable::text(|_args| Ok("done".to_string()));
        let output = invocable
            .invoke(ToolArgs::new(), &InvocationContext::new())
            .await
            .expect("invoke should succeed");
        assert_eq!(output, Value::String("done".to_string()));
    }
}
