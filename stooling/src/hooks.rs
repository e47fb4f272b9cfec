//! Runtime hooks for function dispatch lifecycle events.
//!
//! ```rust
//! use stooling::{NoopToolRuntimeHooks, ToolRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = NoopToolRuntimeHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use crate::{DispatchOutcome, FunctionCall, InvocationContext, ToolError};

pub trait ToolRuntimeHooks: Send + Sync {
    fn on_dispatch_start(&self, _call: &FunctionCall, _context: &InvocationContext) {}

    fn on_dispatch_success(
        &self,
        _call: &FunctionCall,
        _context: &InvocationContext,
        _outcome: &DispatchOutcome,
        _elapsed: Duration,
    ) {
    }

    fn on_dispatch_failure(
        &self,
        _call: &FunctionCall,
        _context: &InvocationContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
