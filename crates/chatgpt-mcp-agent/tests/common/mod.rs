#![allow(dead_code)]

use async_trait::async_trait;
use chatgpt_mcp_agent::config::AutomationDelays;
use chatgpt_mcp_agent::script::Script;
use chatgpt_mcp_agent::{ChatGptServer, RunnerError, ScriptRunner};
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Which generated script the runner was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Probe,
    Launch,
    Ask,
    List,
    Other,
}

pub fn classify(script: &str) -> Step {
    if script.contains("application process") && script.contains("exists") {
        Step::Probe
    } else if script.starts_with(r#"tell application "ChatGPT" to activate"#) {
        Step::Launch
    } else if script.contains("keystroke promptText") {
        Step::Ask
    } else if script.contains("conversationsList") {
        Step::List
    } else {
        Step::Other
    }
}

/// Runner returning canned output per script kind and recording every call.
pub struct FakeRunner {
    responses: HashMap<Step, Result<String, String>>,
    calls: Mutex<Vec<(Step, String)>>,
}

impl FakeRunner {
    /// App running, every script succeeds with empty output.
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(Step::Probe, Ok("true".to_string()));
        Self {
            responses,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn app_running(mut self, running: bool) -> Self {
        self.responses
            .insert(Step::Probe, Ok(running.to_string()));
        self
    }

    pub fn returns(mut self, step: Step, output: &str) -> Self {
        self.responses.insert(step, Ok(output.to_string()));
        self
    }

    pub fn fails(mut self, step: Step, message: &str) -> Self {
        self.responses.insert(step, Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(Step, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls().into_iter().map(|(step, _)| step).collect()
    }

    pub fn script_for(&self, step: Step) -> Option<String> {
        self.calls()
            .into_iter()
            .find(|(s, _)| *s == step)
            .map(|(_, script)| script)
    }
}

#[async_trait]
impl ScriptRunner for FakeRunner {
    async fn run(&self, script: &Script) -> Result<String, RunnerError> {
        let step = classify(script.as_str());
        self.calls
            .lock()
            .unwrap()
            .push((step, script.as_str().to_string()));

        match self.responses.get(&step) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(RunnerError::script(message.clone())),
            None => Ok(String::new()),
        }
    }
}

pub fn server_with(runner: FakeRunner) -> (ChatGptServer, Arc<FakeRunner>) {
    let runner = Arc::new(runner);
    let server = ChatGptServer::with_runner(runner.clone(), AutomationDelays::none());
    (server, runner)
}

pub fn args(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Text of the single content item of a tool result.
pub fn result_text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "expected exactly one content item");
    match &result.content[0].raw {
        RawContent::Text(t) => t.text.clone(),
        _ => panic!("unexpected non-text content"),
    }
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
