use crate::errors::{ChatGptError, Result};
use rmcp::model::JsonObject;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INVALID_ARGUMENTS: &str = "Invalid arguments for ChatGPT tool";
pub const PROMPT_REQUIRED: &str = "Prompt is required for ask operation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[schemars(inline)]
pub enum Operation {
    Ask,
    #[serde(rename = "get_conversations", alias = "list_conversations")]
    ListConversations,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Ask => "ask",
            Operation::ListConversations => "get_conversations",
        }
    }
}

/// Arguments of the `chatgpt` tool as advertised to clients. Incoming calls
/// are checked field by field in [`ToolRequest::from_arguments`].
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ChatGptArgs {
    #[schemars(description = "Operation to perform: 'ask' or 'get_conversations'")]
    pub operation: Operation,
    #[schemars(description = "The prompt to send to ChatGPT (required for ask operation)")]
    pub prompt: Option<String>,
    #[schemars(description = "Optional conversation ID to continue a specific conversation")]
    pub conversation_id: Option<String>,
}

/// A validated call of the `chatgpt` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Ask {
        prompt: String,
        conversation_id: Option<String>,
    },
    ListConversations,
}

impl ToolRequest {
    /// Builds a request from raw tool-call arguments, rejecting anything
    /// that does not fit one of the two operations.
    pub fn from_arguments(arguments: Option<&JsonObject>) -> Result<Self> {
        let arguments = match arguments {
            Some(arguments) if !arguments.is_empty() => arguments,
            _ => return Err(ChatGptError::MissingArguments),
        };

        let operation = match arguments.get("operation") {
            Some(Value::String(name)) => serde_json::from_value::<Operation>(Value::String(
                name.clone(),
            ))
            .map_err(|_| ChatGptError::UnknownOperation(name.clone()))?,
            _ => return Err(ChatGptError::invalid_arguments(INVALID_ARGUMENTS)),
        };

        let prompt = match arguments.get("prompt") {
            None | Some(Value::Null) => None,
            Some(Value::String(prompt)) => Some(prompt.clone()),
            Some(_) => return Err(ChatGptError::invalid_arguments(INVALID_ARGUMENTS)),
        };

        let conversation_id = match arguments.get("conversation_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => return Err(ChatGptError::InvalidConversationIdType),
        };

        match operation {
            Operation::Ask => match prompt {
                Some(prompt) if !prompt.is_empty() => Ok(ToolRequest::Ask {
                    prompt,
                    conversation_id,
                }),
                _ => Err(ChatGptError::invalid_arguments(PROMPT_REQUIRED)),
            },
            Operation::ListConversations => Ok(ToolRequest::ListConversations),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ToolRequest::Ask { .. } => Operation::Ask,
            ToolRequest::ListConversations => Operation::ListConversations,
        }
    }
}
