//! Loading/error state machine observed by front ends.

use serde::{Deserialize, Serialize};

/// Phase of the most recent pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing running; no error to show.
    #[default]
    Idle,
    /// A run is in flight.
    Loading,
    /// The last run produced results.
    Success,
    /// The last run failed; see the error message.
    Error,
}

/// Phase plus the user-facing error message.
///
/// The message is present exactly when the phase is [`Phase::Error`]; the
/// constructors are the only way to build a state, and deserialization
/// rejects payloads that break the pairing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawState")]
pub struct PipelineState {
    phase: Phase,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct RawState {
    phase: Phase,
    #[serde(default)]
    error_message: Option<String>,
}

impl TryFrom<RawState> for PipelineState {
    type Error = String;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        match (raw.phase, raw.error_message) {
            (Phase::Error, Some(message)) => Ok(Self::error(message)),
            (Phase::Error, None) => Err("error state without a message".into()),
            (phase, None) => Ok(Self {
                phase,
                error_message: None,
            }),
            (phase, Some(_)) => Err(format!("{phase:?} state cannot carry an error message")),
        }
    }
}

impl PipelineState {
    /// Nothing running.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            error_message: None,
        }
    }

    /// A run is in flight.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            error_message: None,
        }
    }

    /// The run finished and results were dispatched.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            phase: Phase::Success,
            error_message: None,
        }
    }

    /// The run failed with a user-facing message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Error,
            error_message: Some(message.into()),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// User-facing error message, present only in [`Phase::Error`].
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True while a run is in flight; front ends disable submission.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }
}
