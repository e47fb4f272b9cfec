//! Thread, run, and turn result types for assistant orchestration.
//!
//! ```rust
//! use sassistant::RunStatus;
//!
//! assert_eq!(RunStatus::parse("requires_action"), RunStatus::RequiresAction);
//! assert_eq!(RunStatus::parse("something_new"), RunStatus::Unknown);
//! assert!(RunStatus::Expired.is_fatal());
//! assert!(!RunStatus::RequiresAction.is_terminal());
//! ```

use scommon::{GenerationOptions, RunId, ThreadId};
use serde_json::{Map, Value};
use sprovider::{TokenUsage, ToolDefinition};
use stooling::ToolArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    Unknown,
}

impl RunStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "requires_action" => Self::RequiresAction,
            "cancelling" => Self::Cancelling,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            "completed" => Self::Completed,
            "incomplete" => Self::Incomplete,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Failed
                | Self::Cancelled
                | Self::Expired
                | Self::Incomplete
                | Self::Unknown
        )
    }

    /// Statuses that end the turn with an error once observed.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::Cancelling
                | Self::Cancelled
                | Self::Failed
                | Self::Expired
                | Self::Incomplete
                | Self::Unknown
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool call a run is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredToolCall {
    pub id: String,
    pub name: Option<String>,
    pub arguments: String,
}

impl RequiredToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: RunId,
    pub thread_id: ThreadId,
    pub status: RunStatus,
    pub required_tool_calls: Vec<RequiredToolCall>,
    pub usage: Option<TokenUsage>,
    pub last_error: Option<String>,
}

impl Run {
    pub fn new(id: impl Into<RunId>, thread_id: impl Into<ThreadId>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            thread_id: thread_id.into(),
            status,
            required_tool_calls: Vec::new(),
            usage: None,
            last_error: None,
        }
    }

    pub fn with_tool_calls(mut self, calls: Vec<RequiredToolCall>) -> Self {
        self.required_tool_calls = calls;
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message stored on a backend thread, reduced to its first text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
}

impl ThreadMessage {
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }

    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            text: text.into(),
        }
    }
}

/// Built-in tool a file attachment is made available to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTool {
    CodeInterpreter,
    FileSearch,
}

impl FileTool {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeInterpreter => "code_interpreter",
            Self::FileSearch => "file_search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<FileTool>,
}

/// User message appended to a thread at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantTool {
    CodeInterpreter,
    FileSearch,
    Function(ToolDefinition),
}

impl AssistantTool {
    pub fn function(definition: ToolDefinition) -> Self {
        Self::Function(definition)
    }

    pub fn as_function(&self) -> Option<&ToolDefinition> {
        match self {
            Self::Function(definition) => Some(definition),
            _ => None,
        }
    }

    /// File tool served by this assistant tool, if it consumes uploads.
    pub fn file_tool(&self) -> Option<FileTool> {
        match self {
            Self::CodeInterpreter => Some(FileTool::CodeInterpreter),
            Self::FileSearch => Some(FileTool::FileSearch),
            Self::Function(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    Function(String),
}

/// Remote assistant definition sent when the assistant is created.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantProfile {
    pub model: String,
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub tools: Vec<AssistantTool>,
    pub options: GenerationOptions,
    pub extra: Map<String, Value>,
}

impl AssistantProfile {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            name: None,
            instructions: None,
            tools: Vec::new(),
            options: GenerationOptions::default(),
            extra: Map::new(),
        }
    }

    pub fn function_tools(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .filter_map(AssistantTool::as_function)
            .cloned()
            .collect()
    }

    pub fn file_tools(&self) -> Vec<FileTool> {
        self.tools.iter().filter_map(AssistantTool::file_tool).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub assistant_id: String,
    pub tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Uploaded,
    Processed,
    Error,
}

impl FileStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "processed" => Self::Processed,
            "error" => Self::Error,
            _ => Self::Uploaded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObject {
    pub id: String,
    pub status: FileStatus,
    pub status_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Input for one assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTurn {
    pub content: String,
    pub files: Vec<FileUpload>,
    pub return_tool_info: bool,
}

impl UserTurn {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            files: Vec::new(),
            return_tool_info: false,
        }
    }

    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_tool_info(mut self) -> Self {
        self.return_tool_info = true;
        self
    }
}

/// Function call captured instead of executed.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub func_name: String,
    pub args: Option<ToolArgs>,
}

/// A function the run invoked, with the raw arguments the model sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Messages(Vec<String>),
    CapturedCalls(Vec<CapturedCall>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantTurnResult {
    pub thread_id: ThreadId,
    pub reply: AssistantReply,
    pub tools: Option<Vec<ToolInvocation>>,
    /// Usage reported by the final run of the turn.
    pub total_tokens: Option<u32>,
}

impl AssistantTurnResult {
    pub fn messages(&self) -> &[String] {
        match &self.reply {
            AssistantReply::Messages(messages) => messages,
            AssistantReply::CapturedCalls(_) => &[],
        }
    }

    pub fn captured_calls(&self) -> &[CapturedCall] {
        match &self.reply {
            AssistantReply::CapturedCalls(calls) => calls,
            AssistantReply::Messages(_) => &[],
        }
    }
}
