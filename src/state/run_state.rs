/// Run state definitions for tracking pipeline progress
///
/// A run moves strictly forward: `Idle → Running → Draining → Done`.
use std::fmt;

/// Represents the current lifecycle phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Nothing started yet; stays here when no search term is given
    #[default]
    Idle,

    /// All three stages are running and the URL source is still open
    Running,

    /// The URL source has closed; fetcher and matcher drain buffered work
    Draining,

    /// The matcher has drained every page and signaled completion
    Done,
}

impl RunState {
    /// Returns true if `next` directly follows this state
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}
