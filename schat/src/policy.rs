//! Per-turn function-calling policy.
//!
//! ```rust
//! use schat::{ChatErrorKind, FunctionCallPolicy};
//! use stooling::{ArgumentMode, InvocationMode};
//!
//! let policy = FunctionCallPolicy::builder()
//!     .forced_function("route_request")
//!     .return_args_only(true)
//!     .build()
//!     .expect("capture policy is valid");
//! assert_eq!(policy.invocation_mode(), InvocationMode::CaptureArgsOnly);
//! assert_eq!(policy.argument_mode(), &ArgumentMode::ModelSupplied);
//!
//! let err = FunctionCallPolicy::builder()
//!     .return_args_only(true)
//!     .build()
//!     .expect_err("capture needs a forced function");
//! assert_eq!(err.kind, ChatErrorKind::Configuration);
//! ```

use stooling::{ArgumentMode, InvocationMode, ToolArgs};

use crate::ChatError;

/// Resolved argument source, invocation mode, and forced function for one turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionCallPolicy {
    forced_function: Option<String>,
    argument_mode: ArgumentMode,
    invocation_mode: InvocationMode,
    directives: bool,
}

impl FunctionCallPolicy {
    pub fn builder() -> FunctionCallPolicyBuilder {
        FunctionCallPolicyBuilder::default()
    }

    /// Plain turn: no forced function, model-requested functions run without arguments.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn forced_function(&self) -> Option<&str> {
        self.forced_function.as_deref()
    }

    pub fn argument_mode(&self) -> &ArgumentMode {
        &self.argument_mode
    }

    pub fn invocation_mode(&self) -> InvocationMode {
        self.invocation_mode
    }

    /// Whether the policy asks for anything only a function-enabled service can honor.
    pub fn has_directives(&self) -> bool {
        self.directives
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionCallPolicyBuilder {
    forced_function: Option<String>,
    use_model_args: bool,
    return_args_only: bool,
    args: Option<ToolArgs>,
}

impl FunctionCallPolicyBuilder {
    pub fn forced_function(mut self, name: impl Into<String>) -> Self {
        self.forced_function = Some(name.into());
        self
    }

    pub fn use_model_args(mut self, enabled: bool) -> Self {
        self.use_model_args = enabled;
        self
    }

    pub fn return_args_only(mut self, enabled: bool) -> Self {
        self.return_args_only = enabled;
        self
    }

    /// Caller-supplied arguments; ignored when model arguments are requested.
    pub fn args(mut self, args: ToolArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn build(self) -> Result<FunctionCallPolicy, ChatError> {
        if let Some(name) = &self.forced_function
            && name.trim().is_empty()
        {
            return Err(ChatError::configuration(
                "forced function name must not be empty",
            ));
        }

        if self.return_args_only && self.forced_function.is_none() {
            return Err(ChatError::configuration(
                "return_args_only requires a forced function",
            ));
        }

        if self.use_model_args && self.return_args_only {
            return Err(ChatError::configuration(
                "use_model_args and return_args_only are mutually exclusive",
            ));
        }

        let directives = self.forced_function.is_some()
            || self.use_model_args
            || self.return_args_only
            || self.args.is_some();

        let (argument_mode, invocation_mode) = if self.return_args_only {
            (ArgumentMode::ModelSupplied, InvocationMode::CaptureArgsOnly)
        } else if self.use_model_args {
            (ArgumentMode::ModelSupplied, InvocationMode::Normal)
        } else if let Some(args) = self.args {
            (ArgumentMode::CallerSupplied(args), InvocationMode::Normal)
        } else {
            (ArgumentMode::NoArgs, InvocationMode::Normal)
        };

        Ok(FunctionCallPolicy {
            forced_function: self.forced_function,
            argument_mode,
            invocation_mode,
            directives,
        })
    }
}
