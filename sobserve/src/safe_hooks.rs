use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use sassistant::{AssistantError, RunHooks, RunStatus};
use scommon::{RunId, ThreadId};
use sprovider::{OperationHooks, RetryClassify};
use stooling::{DispatchOutcome, FunctionCall, InvocationContext, ToolError, ToolRuntimeHooks};

pub struct SafeOperationHooks<H> {
    inner: H,
}

impl<H> SafeOperationHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> OperationHooks for SafeOperationHooks<H>
where
    H: OperationHooks,
{
    fn on_attempt_start(&self, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &dyn RetryClassify,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(operation, attempts)
        }));
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &dyn RetryClassify) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_dispatch_start(&self, call: &FunctionCall, context: &InvocationContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_start(call, context)
        }));
    }

    fn on_dispatch_success(
        &self,
        call: &FunctionCall,
        context: &InvocationContext,
        outcome: &DispatchOutcome,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_success(call, context, outcome, elapsed)
        }));
    }

    fn on_dispatch_failure(
        &self,
        call: &FunctionCall,
        context: &InvocationContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_failure(call, context, error, elapsed)
        }));
    }
}

pub struct SafeRunHooks<H> {
    inner: H,
}

impl<H> SafeRunHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RunHooks for SafeRunHooks<H>
where
    H: RunHooks,
{
    fn on_run_started(&self, thread_id: &ThreadId, run_id: &RunId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_started(thread_id, run_id)
        }));
    }

    fn on_run_polled(&self, thread_id: &ThreadId, run_id: &RunId, status: RunStatus, poll: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_polled(thread_id, run_id, status, poll)
        }));
    }

    fn on_tool_outputs_submitted(&self, thread_id: &ThreadId, run_id: &RunId, count: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_tool_outputs_submitted(thread_id, run_id, count)
        }));
    }

    fn on_run_finished(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
        status: RunStatus,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_run_finished(thread_id, run_id, status, elapsed)
        }));
    }

    fn on_run_abandoned(&self, thread_id: &ThreadId, run_id: &RunId, cancelled: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_abandoned(thread_id, run_id, cancelled)
        }));
    }

    fn on_turn_failure(&self, thread_id: &ThreadId, error: &AssistantError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_failure(thread_id, error)
        }));
    }

    fn on_file_ready(&self, file_id: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_file_ready(file_id, elapsed)
        }));
    }
}
