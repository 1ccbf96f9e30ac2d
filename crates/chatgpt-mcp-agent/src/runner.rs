//! Execution of generated scripts.

use crate::script::Script;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("AppleScript error: {message}")]
    Script {
        exit_code: Option<i32>,
        message: String,
    },
}

impl RunnerError {
    pub fn script(message: impl Into<String>) -> Self {
        RunnerError::Script {
            exit_code: None,
            message: message.into(),
        }
    }
}

/// Runs a script in the host automation environment and returns what it
/// printed. Implementations block the calling task until the script ends.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, script: &Script) -> Result<String, RunnerError>;
}

/// Runs AppleScript through the `osascript` binary.
#[derive(Debug, Clone)]
pub struct OsaScriptRunner {
    program: String,
}

impl Default for OsaScriptRunner {
    fn default() -> Self {
        Self {
            program: "osascript".to_string(),
        }
    }
}

impl OsaScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different interpreter binary, e.g. a wrapper script.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ScriptRunner for OsaScriptRunner {
    async fn run(&self, script: &Script) -> Result<String, RunnerError> {
        debug!(program = %self.program, bytes = script.as_str().len(), "running script");

        let output = tokio::process::Command::new(&self.program)
            .arg("-e")
            .arg(script.as_str())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            Err(RunnerError::Script {
                exit_code: output.status.code(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::process_exists_script;

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = OsaScriptRunner::with_program("definitely-not-an-osascript-binary");
        let err = runner.run(&process_exists_script()).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
        assert!(err
            .to_string()
            .starts_with("Failed to run definitely-not-an-osascript-binary"));
    }

    #[test]
    fn test_script_error_display() {
        assert_eq!(
            RunnerError::script("execution error: boom (-1728)").to_string(),
            "AppleScript error: execution error: boom (-1728)"
        );
    }
}
