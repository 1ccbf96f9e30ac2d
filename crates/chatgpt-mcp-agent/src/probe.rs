use crate::config::AutomationDelays;
use crate::errors::{ChatGptError, Result};
use crate::runner::ScriptRunner;
use crate::script::{launch_script, process_exists_script, CHATGPT_APP_NAME};
use tracing::{debug, error, info};

/// Makes sure the desktop app is running, launching it if needed.
///
/// Nothing is cached: every call asks the runner again, so calling it before
/// each operation is safe.
pub async fn ensure_available(
    runner: &dyn ScriptRunner,
    delays: &AutomationDelays,
) -> Result<()> {
    let running = runner.run(&process_exists_script()).await.map_err(|e| {
        error!(app = CHATGPT_APP_NAME, "access check failed: {}", e);
        ChatGptError::AccessCheckFailed(e)
    })?;

    if running.trim() == "true" {
        debug!(app = CHATGPT_APP_NAME, "app is running");
        return Ok(());
    }

    info!(app = CHATGPT_APP_NAME, "app is not running, attempting to launch");
    runner.run(&launch_script(delays)).await.map_err(|e| {
        error!(app = CHATGPT_APP_NAME, "error activating app: {}", e);
        ChatGptError::ActivationFailed(e)
    })?;

    Ok(())
}
