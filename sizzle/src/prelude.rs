//! Common imports for most sizzle applications.

pub use crate::{
    assistant_config, assistant_message, assistant_service_builder, build_assistant_backend,
    build_completion_provider, capture_policy, chat_service_builder, create_assistant,
    function_message, function_tool, system_message, user_message, user_turn,
};
pub use crate::{sz_function, sz_messages, sz_msg};
pub use crate::{
    AssistantConfig, AssistantError, AssistantReply, AssistantService, AssistantTool,
    AssistantTurnResult, ChatError, ChatService, ChatTurnResult, ClientConfig, FileUpload,
    FunctionCallPolicy, FunctionRegistry, Message, ProviderError, RetryPolicy, Role, ThreadId,
    ToolArgs, ToolChoice, ToolDefinition, ToolError, UserTurn,
};
