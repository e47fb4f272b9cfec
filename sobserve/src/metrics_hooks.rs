//! Metrics-based observability hooks for retries, function dispatch, and assistant runs.
//!
//! ```rust
//! use sobserve::MetricsObservabilityHooks;
//! use sprovider::OperationHooks;
//!
//! fn accepts_operation_hooks(_hooks: &dyn OperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_operation_hooks(&hooks);
//! ```

use std::time::Duration;

use sassistant::{AssistantError, RunHooks, RunStatus};
use scommon::{RunId, ThreadId};
use sprovider::{OperationHooks, RetryClassify};
use stooling::{DispatchOutcome, FunctionCall, InvocationContext, ToolError, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn tool_label(call: &FunctionCall) -> String {
    call.name.clone().unwrap_or_else(|| "<missing>".to_string())
}

impl OperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, _attempt: u32) {
        metrics::counter!(
            "sizzle_retry_attempt_start_total",
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &dyn RetryClassify,
    ) {
        metrics::counter!(
            "sizzle_retry_scheduled_total",
            "operation" => operation.to_string(),
            "error_kind" => error.kind_name()
        )
        .increment(1);
        metrics::histogram!(
            "sizzle_retry_delay_seconds",
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        metrics::counter!(
            "sizzle_retry_success_total",
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "sizzle_retry_attempts_per_success",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &dyn RetryClassify) {
        metrics::counter!(
            "sizzle_retry_failure_total",
            "operation" => operation.to_string(),
            "error_kind" => error.kind_name()
        )
        .increment(1);
        metrics::histogram!(
            "sizzle_retry_attempts_per_failure",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_dispatch_start(&self, call: &FunctionCall, _context: &InvocationContext) {
        metrics::counter!(
            "sizzle_tool_dispatch_start_total",
            "tool_name" => tool_label(call)
        )
        .increment(1);
    }

    fn on_dispatch_success(
        &self,
        _call: &FunctionCall,
        _context: &InvocationContext,
        outcome: &DispatchOutcome,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "sizzle_tool_dispatch_success_total",
            "tool_name" => outcome.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "sizzle_tool_dispatch_duration_seconds",
            "tool_name" => outcome.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(
        &self,
        call: &FunctionCall,
        _context: &InvocationContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "sizzle_tool_dispatch_failure_total",
            "tool_name" => tool_label(call),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "sizzle_tool_dispatch_duration_seconds",
            "tool_name" => tool_label(call),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl RunHooks for MetricsObservabilityHooks {
    fn on_run_started(&self, _thread_id: &ThreadId, _run_id: &RunId) {
        metrics::counter!("sizzle_run_started_total").increment(1);
    }

    fn on_run_polled(&self, _thread_id: &ThreadId, _run_id: &RunId, status: RunStatus, _poll: u32) {
        metrics::counter!("sizzle_run_polls_total", "status" => status.as_str()).increment(1);
    }

    fn on_tool_outputs_submitted(&self, _thread_id: &ThreadId, _run_id: &RunId, count: usize) {
        metrics::counter!("sizzle_run_tool_submissions_total").increment(1);
        metrics::histogram!("sizzle_run_tool_outputs_per_submission").record(count as f64);
    }

    fn on_run_finished(
        &self,
        _thread_id: &ThreadId,
        _run_id: &RunId,
        status: RunStatus,
        elapsed: Duration,
    ) {
        metrics::counter!("sizzle_run_finished_total", "status" => status.as_str()).increment(1);
        metrics::histogram!("sizzle_run_duration_seconds", "status" => status.as_str())
            .record(elapsed.as_secs_f64());
    }

    fn on_run_abandoned(&self, _thread_id: &ThreadId, _run_id: &RunId, cancelled: bool) {
        metrics::counter!(
            "sizzle_run_abandoned_total",
            "cancelled" => if cancelled { "true" } else { "false" }
        )
        .increment(1);
    }

    fn on_turn_failure(&self, _thread_id: &ThreadId, error: &AssistantError) {
        metrics::counter!("sizzle_run_turn_failure_total", "error_kind" => error.kind.as_str())
            .increment(1);
    }

    fn on_file_ready(&self, _file_id: &str, elapsed: Duration) {
        metrics::histogram!("sizzle_upload_processing_seconds").record(elapsed.as_secs_f64());
    }
}
