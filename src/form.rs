//! Assessment form state: field values, markers, and the in-flight guard.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tracing::debug;

use crate::{
    engine::{cancel_pair, CancelHandle, CancelToken},
    error::{FlowError, PredictError},
    vitals::{coerce, PatientVitals, VitalField},
};

/// Outcome of a single field update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUpdate {
    pub field: VitalField,
    pub value: f64,
    pub coerced: bool,
}

static NEXT_SUBMISSION: AtomicU64 = AtomicU64::new(1);

/// A submission handed to the engine client.
#[derive(Debug)]
pub struct Submission {
    /// Process-unique id, used to match late answers to the form that asked.
    pub id: u64,
    pub vitals: PatientVitals,
    pub cancel: CancelToken,
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    handle: CancelHandle,
}

#[derive(Debug, Default)]
pub struct FormCollector {
    vitals: PatientVitals,
    coerced: BTreeSet<VitalField>,
    in_flight: Option<InFlight>,
    error: Option<String>,
}

/// Serializable view of the form for the JSON state endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub vitals: PatientVitals,
    pub coerced: Vec<VitalField>,
    pub loading: bool,
    pub error: Option<String>,
}

impl FormCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vitals(&self) -> &PatientVitals {
        &self.vitals
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the last input for `field` collapsed to 0.
    pub fn is_coerced(&self, field: VitalField) -> bool {
        self.coerced.contains(&field)
    }

    /// Set a field from raw text input, collapsing unparsable text to 0.
    pub fn update_field(&mut self, name: &str, raw: &str) -> Result<FieldUpdate, FlowError> {
        let field =
            VitalField::from_wire(name).ok_or_else(|| FlowError::UnknownField(name.to_string()))?;
        if self.is_loading() {
            return Err(FlowError::SubmitInFlight);
        }
        let parsed = coerce(raw);
        self.vitals.set(field, parsed.value);
        if parsed.coerced {
            debug!(%field, raw, "input collapsed to 0");
            self.coerced.insert(field);
        } else {
            self.coerced.remove(&field);
        }
        Ok(FieldUpdate {
            field,
            value: parsed.value,
            coerced: parsed.coerced,
        })
    }

    /// Lock the form for submission and hand out a snapshot of the vitals.
    pub fn begin_submit(&mut self) -> Result<Submission, FlowError> {
        if self.is_loading() {
            return Err(FlowError::SubmitInFlight);
        }
        let id = NEXT_SUBMISSION.fetch_add(1, Ordering::Relaxed);
        let (handle, cancel) = cancel_pair();
        self.in_flight = Some(InFlight { id, handle });
        self.error = None;
        debug!(id, "submission started");
        Ok(Submission {
            id,
            vitals: self.vitals,
            cancel,
        })
    }

    /// Whether submission `id` is the one currently outstanding.
    pub fn owns(&self, id: u64) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.id == id)
    }

    /// Whether submission `id` is outstanding and has been cancelled.
    pub fn is_cancelled(&self, id: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.id == id && f.handle.is_cancelled())
    }

    /// Unlock the form and show the banner for `err`. Ignored unless `id` is
    /// the outstanding submission.
    pub fn fail(&mut self, id: u64, err: &PredictError) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.in_flight = None;
        self.error = Some(err.user_message().to_string());
        true
    }

    /// Fire the cancel signal of the outstanding submission, if any.
    pub fn cancel(&self) -> bool {
        match &self.in_flight {
            Some(f) if !f.handle.is_cancelled() => {
                f.handle.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            vitals: self.vitals,
            coerced: self.coerced.iter().copied().collect(),
            loading: self.is_loading(),
            error: self.error.clone(),
        }
    }
}
