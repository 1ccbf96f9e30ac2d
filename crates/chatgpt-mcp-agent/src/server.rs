use crate::automation::ChatGptAutomation;
use crate::config::AutomationDelays;
use crate::errors::ChatGptError;
use crate::request::{ChatGptArgs, ToolRequest};
use crate::runner::ScriptRunner;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::schemars::{schema_for, JsonSchema};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use std::sync::Arc;
use tracing::{info, warn};

pub const TOOL_NAME: &str = "chatgpt";

/// JSON schema of `T` as a tool input schema.
fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = serde_json::to_value(schema_for!(T))
        .and_then(serde_json::from_value::<JsonObject>)
        .unwrap_or_default();
    Arc::new(schema)
}

/// MCP front end for [`ChatGptAutomation`]. Clones share the automation, and
/// with it the UI lock, so every transport session drives the same app one
/// operation at a time.
#[derive(Clone)]
pub struct ChatGptServer {
    automation: Arc<ChatGptAutomation>,
}

impl ChatGptServer {
    pub fn new(automation: ChatGptAutomation) -> Self {
        Self {
            automation: Arc::new(automation),
        }
    }

    pub fn with_runner(runner: Arc<dyn ScriptRunner>, delays: AutomationDelays) -> Self {
        Self::new(ChatGptAutomation::new(runner, delays))
    }

    /// Definition of the single registered tool.
    pub fn tool() -> Tool {
        Tool::new(
            TOOL_NAME,
            "Interact with the ChatGPT desktop app on macOS",
            input_schema::<ChatGptArgs>(),
        )
    }

    /// Handles one tool call. Never fails: every error becomes an
    /// `is_error` result whose text is `Error: ` followed by the message.
    pub async fn handle_call(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, kind = e.kind(), "tool call failed: {}", e);
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, ChatGptError> {
        if !matches!(arguments, Some(arguments) if !arguments.is_empty()) {
            return Err(ChatGptError::MissingArguments);
        }

        if name != TOOL_NAME {
            warn!(tool = name, "unknown tool requested");
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "Unknown tool: {name}"
            ))]));
        }

        let request = ToolRequest::from_arguments(arguments)?;
        info!(tool = name, operation = request.operation().as_str(), "tool call");

        match request {
            ToolRequest::Ask {
                prompt,
                conversation_id,
            } => {
                let reply = self
                    .automation
                    .ask(&prompt, conversation_id.as_deref())
                    .await?;
                Ok(CallToolResult::success(vec![Content::text(
                    reply.to_string(),
                )]))
            }
            ToolRequest::ListConversations => {
                let conversations = self.automation.list_conversations().await;
                Ok(CallToolResult::success(vec![Content::text(
                    conversations.to_message(),
                )]))
            }
        }
    }
}

impl ServerHandler for ChatGptServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(crate::prompt::get_server_instructions()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![Self::tool()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .handle_call(&request.name, request.arguments.as_ref())
            .await)
    }
}
