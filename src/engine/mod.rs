//! HTTP client for the remote prediction engine.

pub mod types;

use reqwest::Client;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use types::{EngineStatus, PredictionResult, RiskLevel};

use crate::{config::Settings, error::PredictError, vitals::PatientVitals};

/// Thin wrapper over a shared `reqwest::Client` bound to one engine base URL.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: Client,
    base_url: String,
}

impl PredictClient {
    pub fn new(settings: &Settings) -> Result<Self, PredictError> {
        let http = Client::builder()
            .user_agent(concat!("diapredict/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.request_timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(PredictError::from_reqwest)?;
        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    /// Send one prediction request and decode the response.
    pub async fn predict(&self, vitals: &PatientVitals) -> Result<PredictionResult, PredictError> {
        let url = self.predict_url();
        debug!(%url, ?vitals, "posting vitals");
        let resp = self
            .http
            .post(&url)
            .json(vitals)
            .send()
            .await
            .map_err(|err| {
                warn!(%url, %err, "engine unreachable");
                PredictError::from_reqwest(err)
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "engine rejected prediction");
            return Err(PredictError::Status(status.as_u16()));
        }

        let result: PredictionResult = resp.json().await.map_err(PredictError::from_reqwest)?;
        info!(
            prediction = result.prediction,
            probability = result.probability,
            risk = %result.risk_level,
            "prediction received"
        );
        Ok(result)
    }

    /// Like [`predict`](Self::predict), but gives up as soon as `cancel` fires.
    pub async fn predict_cancellable(
        &self,
        vitals: &PatientVitals,
        mut cancel: CancelToken,
    ) -> Result<PredictionResult, PredictError> {
        tokio::select! {
            result = self.predict(vitals) => result,
            _ = cancel.cancelled() => {
                info!("prediction cancelled");
                Err(PredictError::Cancelled)
            }
        }
    }

    /// Fetch the engine's liveness document from its root path.
    pub async fn status(&self) -> Result<EngineStatus, PredictError> {
        let url = format!("{}/", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(PredictError::from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PredictError::Status(status.as_u16()));
        }
        resp.json().await.map_err(PredictError::from_reqwest)
    }
}

/// Create a linked cancel handle and token.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Waiting side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Resolves once the paired handle fires. Never resolves if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}
