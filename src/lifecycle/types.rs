use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered startup phases.
///
/// Handlers registered at an earlier stage are started before, and stopped
/// after, every handler of a later stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Bootstrap infrastructure such as logging; first up, last down
    Init,
    /// Default stage for application components
    #[default]
    Normal,
    /// Network-facing servers
    Server,
    /// Cluster announcements; only after all servers are up, withdrawn before they stop
    Announcements,
}

impl Stage {
    /// All stages in start order
    pub const ALL: [Stage; 4] = [
        Stage::Init,
        Stage::Normal,
        Stage::Server,
        Stage::Announcements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "INIT",
            Stage::Normal => "NORMAL",
            Stage::Server => "SERVER",
            Stage::Announcements => "ANNOUNCEMENTS",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown lifecycle stage: {}", s))
    }
}

/// Lifecycle state machine: `NotStarted -> Running -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Before `start()` is called
    NotStarted,
    /// Since `start()` and before `stop()`
    Running,
    /// Since `stop()` is called; terminal
    Stopped,
}
