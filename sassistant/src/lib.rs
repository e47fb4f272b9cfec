//! Assistant run orchestration: threads, polled runs, tool-output submission, and uploads.
//!
//! ```rust
//! use sassistant::{AssistantConfig, AssistantTool, UserTurn};
//!
//! let config = AssistantConfig::new("gpt-4o-mini")
//!     .with_instructions("You are a patient cooking tutor.")
//!     .with_tool(AssistantTool::FileSearch);
//! assert!(config.accepts_files());
//!
//! let turn = UserTurn::new("What can I make with these?").with_tool_info();
//! assert!(turn.return_tool_info);
//! ```

mod backend;
mod config;
mod error;
mod hooks;
mod poll;
mod service;
mod types;

#[cfg(feature = "backend-openai")]
pub mod openai;

pub mod prelude {
    pub use crate::{
        AssistantBackend, AssistantConfig, AssistantError, AssistantErrorKind, AssistantReply,
        AssistantService, AssistantServiceBuilder, AssistantTool, AssistantTurnResult,
        CapturedCall, FileUpload, RunHooks, RunStatus, ToolChoice, ToolInvocation, UserTurn,
    };
    pub use scommon::{RunId, ThreadId};
}

pub use backend::{AssistantBackend, BackendFuture};
pub use config::{APPROVED_MODELS, AssistantConfig, DEFAULT_MAX_TOOL_ROUNDS};
pub use error::{AssistantError, AssistantErrorKind};
pub use hooks::{NoopRunHooks, RunHooks};
pub use poll::{PollOutcome, PollPolicy, poll_run_until, wait_for_file};
pub use service::{AssistantService, AssistantServiceBuilder};
pub use types::{
    AssistantProfile, AssistantReply, AssistantTool, AssistantTurnResult, Attachment,
    CapturedCall, FileObject, FileStatus, FileTool, FileUpload, MessageRole, NewMessage,
    RequiredToolCall, Run, RunRequest, RunStatus, ThreadMessage, ToolChoice, ToolInvocation,
    ToolOutput, UserTurn,
};
pub use scommon::{RunId, ThreadId};
