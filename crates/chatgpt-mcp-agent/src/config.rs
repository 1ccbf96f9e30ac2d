use std::time::Duration;

/// Fixed waits inserted into the generated scripts. The desktop app gives no
/// readiness signal, so these stand in for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomationDelays {
    /// After bringing the app to the foreground.
    pub activate: Duration,
    /// After clicking a conversation in the sidebar.
    pub conversation_select: Duration,
    /// After launching an app that was not running.
    pub launch_settle: Duration,
    /// Between typing the prompt and pressing return.
    pub keystroke_settle: Duration,
    /// Between submitting the prompt and reading the reply.
    pub response_settle: Duration,
}

impl Default for AutomationDelays {
    fn default() -> Self {
        Self {
            activate: Duration::from_secs(1),
            conversation_select: Duration::from_secs(1),
            launch_settle: Duration::from_secs(2),
            keystroke_settle: Duration::from_millis(500),
            response_settle: Duration::from_secs(5),
        }
    }
}

impl AutomationDelays {
    /// All delays set to zero. Useful with fake runners.
    pub fn none() -> Self {
        Self {
            activate: Duration::ZERO,
            conversation_select: Duration::ZERO,
            launch_settle: Duration::ZERO,
            keystroke_settle: Duration::ZERO,
            response_settle: Duration::ZERO,
        }
    }
}

/// Renders a duration as the seconds operand of AppleScript's `delay`.
pub fn applescript_seconds(duration: Duration) -> String {
    format!("{}", duration.as_secs_f64())
}
