//! OpenAI HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProviderError;

use super::types::{
    OpenAiChoice, OpenAiFinishReason, OpenAiFunction, OpenAiFunctionCall, OpenAiMessage,
    OpenAiRequest, OpenAiResponse, OpenAiRole, OpenAiUsage,
};

pub(crate) fn build_api_request(request: OpenAiRequest) -> Result<OpenAiApiRequest, ProviderError> {
    let messages = request
        .messages
        .into_iter()
        .map(OpenAiApiMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if messages.is_empty() {
        return Err(ProviderError::invalid_request(
            "OpenAI request requires at least one message",
        ));
    }

    let functions = if request.functions.is_empty() {
        None
    } else {
        Some(
            request
                .functions
                .into_iter()
                .map(OpenAiApiFunction::from)
                .collect::<Vec<_>>(),
        )
    };

    // A directive without declared functions is rejected by the backend.
    let function_call = match (&functions, request.function_call) {
        (Some(_), Some(name)) => Some(OpenAiApiFunctionCallDirective { name }),
        _ => None,
    };

    Ok(OpenAiApiRequest {
        model: request.model,
        messages,
        n: request.n,
        functions,
        function_call,
        temperature: request.temperature,
        top_p: request.top_p,
        max_tokens: request.max_tokens,
        extra: request.extra,
    })
}

pub(crate) fn parse_finish_reason(value: Option<&str>) -> OpenAiFinishReason {
    match value {
        Some("stop") => OpenAiFinishReason::Stop,
        Some("length") => OpenAiFinishReason::Length,
        Some("function_call") => OpenAiFinishReason::FunctionCall,
        Some("content_filter") => OpenAiFinishReason::ContentFilter,
        _ => OpenAiFinishReason::Other,
    }
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<OpenAiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiErrorEnvelope {
    pub error: OpenAiApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiError {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiRequest {
    pub model: String,
    pub messages: Vec<OpenAiApiMessage>,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<OpenAiApiFunction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<OpenAiApiFunctionCallDirective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiFunctionCallDirective {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TryFrom<OpenAiMessage> for OpenAiApiMessage {
    type Error = ProviderError;

    fn try_from(value: OpenAiMessage) -> Result<Self, Self::Error> {
        if value.role == OpenAiRole::Function && value.name.is_none() {
            return Err(ProviderError::invalid_request(
                "OpenAI function messages must carry the function name",
            ));
        }

        if value.content.trim().is_empty()
            && matches!(value.role, OpenAiRole::System | OpenAiRole::User)
        {
            return Err(ProviderError::invalid_request(
                "OpenAI message content must not be empty",
            ));
        }

        Ok(Self {
            role: value.role.as_str().to_string(),
            content: value.content,
            name: value.name,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<OpenAiFunction> for OpenAiApiFunction {
    fn from(value: OpenAiFunction) -> Self {
        Self {
            name: value.name,
            description: value.description,
            parameters: value.parameters,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiResponse {
    pub model: String,
    pub choices: Vec<OpenAiApiChoice>,
    pub usage: Option<OpenAiApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiChoice {
    #[serde(default)]
    pub index: u32,
    pub message: OpenAiApiAssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiAssistantMessage {
    pub content: Option<String>,
    pub function_call: Option<OpenAiApiFunctionCall>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiFunctionCall {
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl TryFrom<OpenAiApiResponse> for OpenAiResponse {
    type Error = ProviderError;

    fn try_from(value: OpenAiApiResponse) -> Result<Self, Self::Error> {
        if value.choices.is_empty() {
            return Err(ProviderError::transport(
                "OpenAI response did not include choices",
            ));
        }

        let mut choices = value.choices;
        choices.sort_by_key(|choice| choice.index);

        let choices = choices
            .into_iter()
            .map(|choice| OpenAiChoice {
                content: choice.message.content,
                function_call: choice.message.function_call.map(|call| OpenAiFunctionCall {
                    name: call.name,
                    arguments: call.arguments,
                }),
                finish_reason: parse_finish_reason(choice.finish_reason.as_deref()),
            })
            .collect::<Vec<_>>();

        let usage = value
            .usage
            .map(|usage| OpenAiUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            })
            .unwrap_or_default();

        Ok(Self {
            model: value.model,
            choices,
            usage,
        })
    }
}
