//! Error types shared by the engine client and the assessment flow.

use thiserror::Error;

use crate::router::{ActionKind, Screen};

/// Banner shown for every engine failure other than a user cancel.
pub const CONNECTION_ERROR: &str =
    "Unable to connect to the AI engine. Please ensure the backend server is active.";

/// Banner shown after the user aborts an in-flight request.
pub const CANCELLED_MESSAGE: &str = "Prediction cancelled.";

/// Failures of a single call to the prediction engine.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("invalid engine request: {0}")]
    InvalidUrl(#[source] reqwest::Error),

    #[error("engine request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("engine did not answer before the deadline")]
    Timeout,

    #[error("engine responded with status {0}")]
    Status(u16),

    #[error("engine response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl PredictError {
    /// The only text an end user ever sees for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PredictError::Cancelled => CANCELLED_MESSAGE,
            _ => CONNECTION_ERROR,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            PredictError::InvalidUrl(err)
        } else if err.is_timeout() {
            PredictError::Timeout
        } else if err.is_decode() {
            PredictError::Decode(err)
        } else {
            PredictError::Transport(err)
        }
    }
}

/// Rejected operations on the landing → form → result flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {action} from the {from} screen")]
    InvalidTransition { action: ActionKind, from: Screen },

    #[error("unknown vital field: {0}")]
    UnknownField(String),

    #[error("a prediction is already in flight")]
    SubmitInFlight,

    #[error("no assessment form is open")]
    NoActiveForm,
}
