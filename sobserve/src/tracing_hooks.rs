//! Tracing-based observability hooks for retries, function dispatch, and assistant runs.
//!
//! ```rust
//! use sobserve::TracingObservabilityHooks;
//! use sassistant::RunHooks;
//!
//! fn accepts_run_hooks(_hooks: &dyn RunHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_run_hooks(&hooks);
//! ```

use std::time::Duration;

use sassistant::{AssistantError, RunHooks, RunStatus};
use scommon::{RunId, ThreadId};
use sprovider::{OperationHooks, RetryClassify};
use stooling::{DispatchOutcome, FunctionCall, InvocationContext, ToolError, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

fn call_name(call: &FunctionCall) -> &str {
    call.name.as_deref().unwrap_or("<missing>")
}

fn context_thread(context: &InvocationContext) -> Option<&str> {
    context.thread_id.as_ref().map(ThreadId::as_str)
}

impl OperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, attempt: u32) {
        tracing::info!(phase = "retry", event = "attempt_start", operation, attempt);
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &dyn RetryClassify,
    ) {
        tracing::warn!(
            phase = "retry",
            event = "retry_scheduled",
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = error.kind_name(),
            error = %error
        );
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        tracing::info!(phase = "retry", event = "success", operation, attempts);
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &dyn RetryClassify) {
        tracing::error!(
            phase = "retry",
            event = "failure",
            operation,
            attempts,
            error_kind = error.kind_name(),
            retryable = error.is_retryable(),
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_dispatch_start(&self, call: &FunctionCall, context: &InvocationContext) {
        tracing::info!(
            phase = "tool",
            event = "dispatch_start",
            tool_name = call_name(call),
            tool_call_id = call.id.as_deref(),
            thread_id = context_thread(context)
        );
    }

    fn on_dispatch_success(
        &self,
        call: &FunctionCall,
        context: &InvocationContext,
        outcome: &DispatchOutcome,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "dispatch_success",
            tool_name = outcome.name.as_str(),
            tool_call_id = call.id.as_deref(),
            thread_id = context_thread(context),
            used_args = outcome.args.is_some(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_dispatch_failure(
        &self,
        call: &FunctionCall,
        context: &InvocationContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "dispatch_failure",
            tool_name = call_name(call),
            tool_call_id = call.id.as_deref(),
            thread_id = context_thread(context),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }
}

impl RunHooks for TracingObservabilityHooks {
    fn on_run_started(&self, thread_id: &ThreadId, run_id: &RunId) {
        tracing::info!(
            phase = "run",
            event = "run_started",
            thread_id = %thread_id,
            run_id = %run_id
        );
    }

    fn on_run_polled(&self, thread_id: &ThreadId, run_id: &RunId, status: RunStatus, poll: u32) {
        tracing::debug!(
            phase = "run",
            event = "run_polled",
            thread_id = %thread_id,
            run_id = %run_id,
            status = status.as_str(),
            poll
        );
    }

    fn on_tool_outputs_submitted(&self, thread_id: &ThreadId, run_id: &RunId, count: usize) {
        tracing::info!(
            phase = "run",
            event = "tool_outputs_submitted",
            thread_id = %thread_id,
            run_id = %run_id,
            count
        );
    }

    fn on_run_finished(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
        status: RunStatus,
        elapsed: Duration,
    ) {
        if status.is_fatal() {
            tracing::warn!(
                phase = "run",
                event = "run_finished",
                thread_id = %thread_id,
                run_id = %run_id,
                status = status.as_str(),
                elapsed_ms = elapsed.as_millis() as u64
            );
        } else {
            tracing::info!(
                phase = "run",
                event = "run_finished",
                thread_id = %thread_id,
                run_id = %run_id,
                status = status.as_str(),
                elapsed_ms = elapsed.as_millis() as u64
            );
        }
    }

    fn on_run_abandoned(&self, thread_id: &ThreadId, run_id: &RunId, cancelled: bool) {
        tracing::warn!(
            phase = "run",
            event = "run_abandoned",
            thread_id = %thread_id,
            run_id = %run_id,
            cancelled
        );
    }

    fn on_turn_failure(&self, thread_id: &ThreadId, error: &AssistantError) {
        tracing::error!(
            phase = "run",
            event = "turn_failure",
            thread_id = %thread_id,
            error_kind = error.kind.as_str(),
            status = error.run_status.map(RunStatus::as_str),
            error = %error
        );
    }

    fn on_file_ready(&self, file_id: &str, elapsed: Duration) {
        tracing::info!(
            phase = "upload",
            event = "file_ready",
            file_id,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }
}
