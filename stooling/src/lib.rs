//! Function registry and dispatch for model-requested function calls.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use stooling::{ArgumentMode, FunctionDispatcher, FunctionRegistry};
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register_text_fn("get_recipe", |_args| Ok("boil water".to_string()));
//!
//! let dispatcher = FunctionDispatcher::new(Arc::new(registry));
//! assert!(dispatcher.registry().contains("get_recipe"));
//! assert_eq!(ArgumentMode::default(), ArgumentMode::NoArgs);
//! ```

mod args;
mod dispatch;
mod error;
mod hooks;
mod invocable;
mod registry;
mod types;

pub mod prelude {
    pub use crate::{
        ArgumentMode, CaptureArgs, DispatchOutcome, Dispatcher, FunctionCall,
        FunctionDispatcher, FunctionInvocable, FunctionRegistry, Invocable, InvocationContext,
        InvocationMode, ToolArgs, ToolError, ToolErrorKind, ToolFuture,
    };
}

pub use args::{
    ToolArgs, args_to_json, parse_json_object, parse_model_arguments, required_string,
};
pub use dispatch::{Dispatcher, FunctionDispatcher, resolve_arguments};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use invocable::{CaptureArgs, FunctionInvocable, Invocable, ToolFuture};
pub use registry::FunctionRegistry;
pub use types::{ArgumentMode, DispatchOutcome, FunctionCall, InvocationContext, InvocationMode};
