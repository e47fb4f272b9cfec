//! Run lifecycle hook contracts.
//!
//! ```rust
//! use sassistant::{NoopRunHooks, RunHooks};
//!
//! fn accepts_hooks(_hooks: &dyn RunHooks) {}
//!
//! let hooks = NoopRunHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use scommon::{RunId, ThreadId};

use crate::{AssistantError, RunStatus};

pub trait RunHooks: Send + Sync {
    fn on_run_started(&self, _thread_id: &ThreadId, _run_id: &RunId) {}

    fn on_run_polled(&self, _thread_id: &ThreadId, _run_id: &RunId, _status: RunStatus, _poll: u32) {
    }

    fn on_tool_outputs_submitted(&self, _thread_id: &ThreadId, _run_id: &RunId, _count: usize) {}

    fn on_run_finished(
        &self,
        _thread_id: &ThreadId,
        _run_id: &RunId,
        _status: RunStatus,
        _elapsed: Duration,
    ) {
    }

    /// A capture-mode turn left its run waiting on tool outputs.
    fn on_run_abandoned(&self, _thread_id: &ThreadId, _run_id: &RunId, _cancelled: bool) {}

    fn on_turn_failure(&self, _thread_id: &ThreadId, _error: &AssistantError) {}

    fn on_file_ready(&self, _file_id: &str, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRunHooks;

impl RunHooks for NoopRunHooks {}
