//! HTTP route handlers for Axum.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use tracing::{info, warn};

use crate::{
    error::FlowError,
    store::{self, Store, StoreSnapshot, SubmitOutcome},
    vitals::VitalField,
    web::pages,
};

use super::AppState;

type PageResult<T> = Result<T, (StatusCode, String)>;

fn flow_error(err: FlowError) -> (StatusCode, String) {
    let status = match &err {
        FlowError::UnknownField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::CONFLICT,
    };
    warn!(%err, %status, "rejected request");
    (status, err.to_string())
}

pub async fn index(State(state): State<AppState>) -> PageResult<Html<String>> {
    let store = state.store.lock().await;
    pages::screen_page(&store)
}

pub async fn start(State(state): State<AppState>) -> PageResult<Redirect> {
    state.store.lock().await.start().map_err(flow_error)?;
    Ok(Redirect::to("/"))
}

/// Apply the posted field values, then run the submission.
///
/// A post that arrives while a submission is already running (a double
/// click) changes nothing and lands back on the loading form.
pub async fn predict(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult<Redirect> {
    let begun = {
        let mut store = state.store.lock().await;
        apply_fields(&mut store, &fields).and_then(|()| store.begin_submit())
    };
    let submission = match begun {
        Ok(submission) => submission,
        Err(FlowError::SubmitInFlight) => {
            info!("submission already in flight");
            return Ok(Redirect::to("/"));
        }
        Err(err) => return Err(flow_error(err)),
    };

    // Spawned so the submission settles even if the browser drops the request.
    let task_state = state.clone();
    let outcome = tokio::spawn(async move {
        store::run_submission(
            &task_state.store,
            &task_state.client,
            submission,
            task_state.settings.reveal_delay,
        )
        .await
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(flow_error)?;
    match &outcome {
        SubmitOutcome::Predicted => info!("showing result"),
        SubmitOutcome::Failed(message) => info!(%message, "staying on form"),
        SubmitOutcome::Cancelled => info!("submission cancelled"),
    }
    Ok(Redirect::to("/"))
}

fn apply_fields(store: &mut Store, fields: &HashMap<String, String>) -> Result<(), FlowError> {
    for field in VitalField::ALL {
        if let Some(raw) = fields.get(field.wire_name()) {
            store.update_field(field.wire_name(), raw)?;
        }
    }
    Ok(())
}

pub async fn cancel(State(state): State<AppState>) -> Redirect {
    let cancelled = state.store.lock().await.cancel();
    info!(cancelled, "cancel requested");
    Redirect::to("/")
}

pub async fn reset(State(state): State<AppState>) -> Redirect {
    state.store.lock().await.reset();
    Redirect::to("/")
}

pub async fn snapshot(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(state.store.lock().await.snapshot())
}
