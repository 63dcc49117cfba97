//! Top-level assessment store tying the router to the form.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    engine::{PredictClient, PredictionResult},
    error::{FlowError, PredictError},
    form::{FieldUpdate, FormCollector, FormSnapshot, Submission},
    router::{Screen, ViewRouter},
};

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Predicted,
    /// The form stays open with this banner.
    Failed(String),
    Cancelled,
}

/// Single source of truth for one assessment session.
#[derive(Debug, Default)]
pub struct Store {
    router: ViewRouter,
    form: Option<FormCollector>,
}

/// Serializable view of the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub screen: Screen,
    pub form: Option<FormSnapshot>,
    pub result: Option<PredictionResult>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    pub fn form(&self) -> Option<&FormCollector> {
        self.form.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.router.result()
    }

    /// Landing → predict, mounting a form with default values.
    pub fn start(&mut self) -> Result<Screen, FlowError> {
        let screen = self.router.start()?;
        self.form = Some(FormCollector::new());
        Ok(screen)
    }

    /// Back to landing from anywhere; drops the form and any result.
    pub fn reset(&mut self) -> Screen {
        if let Some(form) = &self.form {
            form.cancel();
        }
        self.form = None;
        self.router.reset()
    }

    pub fn update_field(&mut self, name: &str, raw: &str) -> Result<FieldUpdate, FlowError> {
        self.form_mut()?.update_field(name, raw)
    }

    /// Lock the form and hand out the vitals to send.
    ///
    /// Callers that also apply field updates should do both under the same
    /// lock so the values sent are exactly the ones just written.
    pub fn begin_submit(&mut self) -> Result<Submission, FlowError> {
        self.form_mut()?.begin_submit()
    }

    /// Cancel an outstanding submission. Returns false when nothing was in flight.
    pub fn cancel(&self) -> bool {
        self.form.as_ref().is_some_and(FormCollector::cancel)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            screen: self.screen(),
            form: self.form.as_ref().map(FormCollector::snapshot),
            result: self.result().cloned(),
        }
    }

    fn form_mut(&mut self) -> Result<&mut FormCollector, FlowError> {
        match (self.router.screen(), self.form.as_mut()) {
            (Screen::Predict, Some(form)) => Ok(form),
            _ => Err(FlowError::NoActiveForm),
        }
    }

    fn on_predicted(&mut self, result: PredictionResult) -> Result<Screen, FlowError> {
        let screen = self.router.on_predicted(result)?;
        self.form = None;
        Ok(screen)
    }
}

/// Run one submission against the engine.
///
/// Shorthand for [`Store::begin_submit`] followed by [`run_submission`].
pub async fn submit(
    store: &Mutex<Store>,
    client: &PredictClient,
    reveal_delay: Duration,
) -> Result<SubmitOutcome, FlowError> {
    let submission = store.lock().await.begin_submit()?;
    run_submission(store, client, submission, reveal_delay).await
}

/// Send a submission that was already begun and settle the store.
///
/// The lock is only held to flip state; the network call and the reveal delay
/// run without it so `cancel` and `reset` stay responsive. An answer for a
/// form that was reset or cancelled in the meantime is dropped.
pub async fn run_submission(
    store: &Mutex<Store>,
    client: &PredictClient,
    submission: Submission,
    reveal_delay: Duration,
) -> Result<SubmitOutcome, FlowError> {
    let id = submission.id;
    info!(id, url = %client.predict_url(), "submitting vitals");

    let err = match client
        .predict_cancellable(&submission.vitals, submission.cancel)
        .await
    {
        Ok(result) => {
            tokio::time::sleep(reveal_delay).await;
            let mut guard = store.lock().await;
            let owned = guard.form().is_some_and(|f| f.owns(id));
            let cancelled = guard.form().is_some_and(|f| f.is_cancelled(id));
            if owned && !cancelled {
                guard.on_predicted(result)?;
                return Ok(SubmitOutcome::Predicted);
            }
            if !owned {
                warn!(id, "form closed before prediction arrived; dropping result");
                return Ok(SubmitOutcome::Cancelled);
            }
            PredictError::Cancelled
        }
        Err(err) => err,
    };

    let mut guard = store.lock().await;
    if let Ok(form) = guard.form_mut() {
        form.fail(id, &err);
    }
    match err {
        PredictError::Cancelled => Ok(SubmitOutcome::Cancelled),
        err => {
            warn!(id, %err, "prediction failed");
            Ok(SubmitOutcome::Failed(err.user_message().to_string()))
        }
    }
}
