//! Screen state machine: landing → predict → result, and back to landing.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{engine::PredictionResult, error::FlowError};

/// Which screen is showing, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Landing,
    Predict,
    Result,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Screen::Landing => "landing",
            Screen::Predict => "predict",
            Screen::Result => "result",
        })
    }
}

/// Current screen together with the result it displays, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Landing,
    Predict,
    Result(PredictionResult),
}

impl ViewState {
    pub fn screen(&self) -> Screen {
        match self {
            ViewState::Landing => Screen::Landing,
            ViewState::Predict => Screen::Predict,
            ViewState::Result(_) => Screen::Result,
        }
    }
}

/// Transition requests accepted by [`ViewRouter::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    Predicted(PredictionResult),
    Reset,
}

/// Payload-free tag of an [`Action`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    Predicted,
    Reset,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Start => "start",
            ActionKind::Predicted => "show a prediction",
            ActionKind::Reset => "reset",
        })
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Start => ActionKind::Start,
            Action::Predicted(_) => ActionKind::Predicted,
            Action::Reset => ActionKind::Reset,
        }
    }
}

/// Owns the [`ViewState`]; the only way to change it is [`apply`](Self::apply).
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    state: ViewState,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.state {
            ViewState::Result(result) => Some(result),
            _ => None,
        }
    }

    /// Apply a transition. Invalid edges leave the state untouched.
    pub fn apply(&mut self, action: Action) -> Result<Screen, FlowError> {
        let from = self.screen();
        let next = match (from, action) {
            (Screen::Landing, Action::Start) => ViewState::Predict,
            (Screen::Predict, Action::Predicted(result)) => ViewState::Result(result),
            (_, Action::Reset) => ViewState::Landing,
            (from, action) => {
                return Err(FlowError::InvalidTransition {
                    action: action.kind(),
                    from,
                })
            }
        };
        self.state = next;
        debug!(%from, to = %self.screen(), "screen transition");
        Ok(self.screen())
    }

    pub fn start(&mut self) -> Result<Screen, FlowError> {
        self.apply(Action::Start)
    }

    pub fn on_predicted(&mut self, result: PredictionResult) -> Result<Screen, FlowError> {
        self.apply(Action::Predicted(result))
    }

    /// Return to the landing screen, discarding any held result.
    pub fn reset(&mut self) -> Screen {
        // reset is accepted from every screen
        self.apply(Action::Reset).unwrap_or(Screen::Landing)
    }
}
