//! Assistants v2 payload serde models and conversions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sprovider::{ProviderError, TokenUsage};

use crate::{
    AssistantProfile, AssistantTool, Attachment, FileObject, FileStatus, MessageRole, NewMessage,
    RequiredToolCall, Run, RunRequest, RunStatus, ThreadMessage, ToolChoice, ToolOutput,
};

#[derive(Debug, Serialize)]
pub(crate) struct ApiCreateAssistant {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&AssistantProfile> for ApiCreateAssistant {
    fn from(profile: &AssistantProfile) -> Self {
        Self {
            model: profile.model.clone(),
            name: profile.name.clone(),
            instructions: profile.instructions.clone(),
            tools: profile.tools.iter().map(tool_to_value).collect(),
            temperature: profile.options.temperature,
            top_p: profile.options.top_p,
            extra: profile.extra.clone(),
        }
    }
}

fn tool_to_value(tool: &AssistantTool) -> Value {
    match tool {
        AssistantTool::CodeInterpreter => json!({"type": "code_interpreter"}),
        AssistantTool::FileSearch => json!({"type": "file_search"}),
        AssistantTool::Function(definition) => json!({
            "type": "function",
            "function": {
                "name": definition.name,
                "description": definition.description,
                "parameters": definition.parameters,
            }
        }),
    }
}

pub(crate) fn tool_choice_to_value(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Function(name) => json!({"type": "function", "function": {"name": name}}),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiCreateMessage {
    pub role: &'static str,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<ApiAttachment>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiAttachment {
    pub file_id: String,
    pub tools: Vec<Value>,
}

impl From<Attachment> for ApiAttachment {
    fn from(value: Attachment) -> Self {
        Self {
            file_id: value.file_id,
            tools: value
                .tools
                .into_iter()
                .map(|tool| json!({"type": tool.as_str()}))
                .collect(),
        }
    }
}

impl From<NewMessage> for ApiCreateMessage {
    fn from(value: NewMessage) -> Self {
        Self {
            role: "user",
            content: value.content,
            attachments: value.attachments.into_iter().map(ApiAttachment::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiCreateRun {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

impl From<RunRequest> for ApiCreateRun {
    fn from(value: RunRequest) -> Self {
        Self {
            assistant_id: value.assistant_id,
            tool_choice: value.tool_choice.as_ref().map(tool_choice_to_value),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiSubmitToolOutputs {
    pub tool_outputs: Vec<ApiToolOutput>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

impl From<Vec<ToolOutput>> for ApiSubmitToolOutputs {
    fn from(value: Vec<ToolOutput>) -> Self {
        Self {
            tool_outputs: value
                .into_iter()
                .map(|output| ApiToolOutput {
                    tool_call_id: output.tool_call_id,
                    output: output.output,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiObjectId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRun {
    pub id: String,
    pub thread_id: String,
    pub status: String,
    pub required_action: Option<ApiRequiredAction>,
    pub usage: Option<ApiUsage>,
    pub last_error: Option<ApiRunError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRequiredAction {
    pub submit_tool_outputs: Option<ApiSubmitToolOutputsAction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSubmitToolOutputsAction {
    #[serde(default)]
    pub tool_calls: Vec<ApiToolCall>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiToolCall {
    pub id: String,
    pub function: ApiToolCallFunction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiToolCallFunction {
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ApiRun> for Run {
    fn from(value: ApiRun) -> Self {
        let required_tool_calls = value
            .required_action
            .and_then(|action| action.submit_tool_outputs)
            .map(|action| {
                action
                    .tool_calls
                    .into_iter()
                    .map(|call| RequiredToolCall {
                        id: call.id,
                        name: call.function.name.filter(|name| !name.is_empty()),
                        arguments: call.function.arguments,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last_error = value.last_error.map(|error| match (error.code, error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => "unspecified run error".to_string(),
        });

        Self {
            id: value.id.into(),
            thread_id: value.thread_id.into(),
            status: RunStatus::parse(&value.status),
            required_tool_calls,
            usage: value.usage.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            last_error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<ApiMessageContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessageContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<ApiMessageText>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessageText {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessageList {
    #[serde(default)]
    pub data: Vec<ApiMessage>,
}

impl TryFrom<ApiMessage> for ThreadMessage {
    type Error = ProviderError;

    fn try_from(value: ApiMessage) -> Result<Self, Self::Error> {
        let role = match value.role.as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            other => {
                return Err(ProviderError::transport(format!(
                    "unexpected thread message role '{other}'"
                )));
            }
        };

        let text = value
            .content
            .into_iter()
            .find(|content| content.kind == "text")
            .and_then(|content| content.text)
            .map(|text| text.value)
            .unwrap_or_default();

        Ok(Self {
            id: value.id,
            role,
            text,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiFile {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_details: Option<String>,
}

impl From<ApiFile> for FileObject {
    fn from(value: ApiFile) -> Self {
        Self {
            id: value.id,
            status: value
                .status
                .as_deref()
                .map(FileStatus::parse)
                .unwrap_or(FileStatus::Uploaded),
            status_details: value.status_details,
        }
    }
}
