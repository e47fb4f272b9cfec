//! Single-turn chat orchestration over completion providers.
//!
//! ```rust
//! use schat::{CandidateResult, ChatTurnResult};
//!
//! let result = ChatTurnResult {
//!     candidates: vec![CandidateResult::text("Try bibimbap.")],
//!     total_tokens: 17,
//! };
//! assert_eq!(result.first_content(), Some("Try bibimbap."));
//! assert!(!result.candidates[0].used_function());
//! ```

mod error;
mod policy;
mod service;
mod types;

pub mod prelude {
    pub use crate::{
        CandidateResult, ChatError, ChatErrorKind, ChatService, ChatServiceBuilder,
        ChatTurnResult, FunctionCallPolicy, FunctionCallPolicyBuilder,
    };
    pub use sprovider::{Message, Role, ToolDefinition};
    pub use stooling::{FunctionRegistry, ToolArgs, ToolError, ToolErrorKind};
}

pub use error::{ChatError, ChatErrorKind};
pub use policy::{FunctionCallPolicy, FunctionCallPolicyBuilder};
pub use service::{ChatService, ChatServiceBuilder};
pub use types::{CandidateResult, ChatTurnResult};
pub use sprovider::{Message, Role, ToolDefinition};
pub use stooling::{FunctionRegistry, ToolArgs, ToolError, ToolErrorKind};
