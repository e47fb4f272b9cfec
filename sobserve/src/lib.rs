//! Observability hooks for retried operations, function dispatch, and assistant runs.
//!
//! ```rust
//! use sobserve::{MetricsObservabilityHooks, SafeOperationHooks, TracingObservabilityHooks};
//!
//! let _retry_hooks = SafeOperationHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeOperationHooks, SafeRunHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeOperationHooks, SafeRunHooks, SafeToolHooks,
        TracingObservabilityHooks,
    };
}
