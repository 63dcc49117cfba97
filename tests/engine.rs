mod common;

use std::{sync::Arc, time::Duration};

use common::{closed_url, high_risk, settings_for, Reply, StubEngine};
use diapredict::{
    config::Settings,
    engine::{cancel_pair, PredictClient, RiskLevel},
    error::{PredictError, CONNECTION_ERROR},
    router::Screen,
    store::{self, Store, SubmitOutcome},
    vitals::PatientVitals,
};
use serde_json::json;
use tokio::sync::Mutex;

#[tokio::test]
async fn predict_posts_vitals_and_decodes_result() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let client = PredictClient::new(&engine.settings()).unwrap();

    let result = client.predict(&PatientVitals::default()).await.unwrap();
    assert_eq!(result.prediction, 1);
    assert_eq!(result.risk_level, "High");
    assert_eq!(result.risk(), RiskLevel::High);
    assert_eq!(
        result.feature_importance.as_ref().map(|m| m.len()),
        Some(3)
    );

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    let body = requests[0].as_object().unwrap();
    assert_eq!(body.len(), 8);
    assert_eq!(body["Glucose"], json!(100.0));
    assert_eq!(body["DiabetesPedigreeFunction"], json!(0.5));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let settings = Settings::default().with_api_url(Some(format!("{}/", engine.url).as_str()));
    assert_eq!(settings.api_url, engine.url);

    let client = PredictClient::new(&settings).unwrap();
    assert_eq!(client.predict_url(), format!("{}/predict", engine.url));
    client.predict(&PatientVitals::default()).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let engine = StubEngine::spawn(Reply::Status(500)).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let err = client.predict(&PatientVitals::default()).await.unwrap_err();
    assert!(matches!(err, PredictError::Status(500)), "{err:?}");
    assert_eq!(err.user_message(), CONNECTION_ERROR);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let client = PredictClient::new(&settings_for(&closed_url().await)).unwrap();
    let err = client.predict(&PatientVitals::default()).await.unwrap_err();
    assert!(matches!(err, PredictError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn hung_engine_hits_the_deadline() {
    let engine = StubEngine::spawn(Reply::Hang).await;
    let mut settings = engine.settings();
    settings.request_timeout = Duration::from_millis(200);
    let client = PredictClient::new(&settings).unwrap();
    let err = client.predict(&PatientVitals::default()).await.unwrap_err();
    assert!(matches!(err, PredictError::Timeout), "{err:?}");
}

#[tokio::test]
async fn cancel_aborts_a_pending_request() {
    let engine = StubEngine::spawn(Reply::Hang).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let (handle, token) = cancel_pair();

    let pending = tokio::spawn(async move {
        client
            .predict_cancellable(&PatientVitals::default(), token)
            .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, PredictError::Cancelled), "{err:?}");
}

#[tokio::test]
async fn wrongly_typed_body_is_a_decode_error() {
    let engine = StubEngine::spawn(Reply::Json(json!({"probability": "very"}))).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let err = client.predict(&PatientVitals::default()).await.unwrap_err();
    assert!(matches!(err, PredictError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn unknown_response_keys_are_kept() {
    let mut body = high_risk();
    body["model_version"] = json!("rf-2");
    let engine = StubEngine::spawn(Reply::Json(body)).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let result = client.predict(&PatientVitals::default()).await.unwrap();
    assert_eq!(result.extra.get("model_version"), Some(&json!("rf-2")));
}

#[tokio::test]
async fn status_reads_engine_root() {
    let engine = StubEngine::spawn(Reply::Status(500)).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let status = client.status().await.unwrap();
    assert_eq!(status.status, "online");
}

#[tokio::test]
async fn successful_submit_moves_to_result_screen() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let mut store = Store::new();
    store.start().unwrap();
    store.update_field("Glucose", "150").unwrap();
    let shared = Mutex::new(store);

    let outcome = store::submit(&shared, &client, Duration::ZERO).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Predicted);

    let store = shared.into_inner();
    assert_eq!(store.screen(), Screen::Result);
    assert!(store.form().is_none());
    assert_eq!(store.result().map(|r| r.probability), Some(0.82));
    assert_eq!(engine.requests()[0]["Glucose"], json!(150.0));
}

#[tokio::test]
async fn failed_submit_stays_on_form_with_banner() {
    let engine = StubEngine::spawn(Reply::Status(503)).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let mut store = Store::new();
    store.start().unwrap();
    let shared = Mutex::new(store);

    let outcome = store::submit(&shared, &client, Duration::ZERO).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Failed(CONNECTION_ERROR.to_string()));

    let store = shared.into_inner();
    assert_eq!(store.screen(), Screen::Predict);
    assert!(store.result().is_none());
    let form = store.form().unwrap();
    assert_eq!(form.error(), Some(CONNECTION_ERROR));
    assert!(!form.is_loading());
}

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() {
    let engine = StubEngine::spawn(Reply::Hang).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let shared = Arc::new(Mutex::new(Store::new()));
    shared.lock().await.start().unwrap();

    let first = {
        let shared = shared.clone();
        let client = client.clone();
        tokio::spawn(async move { store::submit(&shared, &client, Duration::ZERO).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(shared.lock().await.form().unwrap().is_loading());

    let second = store::submit(&shared, &client, Duration::ZERO).await;
    assert_eq!(
        second.unwrap_err(),
        diapredict::error::FlowError::SubmitInFlight
    );
    assert!(shared.lock().await.update_field("Age", "40").is_err());

    assert!(shared.lock().await.cancel());
    assert_eq!(first.await.unwrap().unwrap(), SubmitOutcome::Cancelled);
    let store = shared.lock().await;
    assert_eq!(store.screen(), Screen::Predict);
    assert!(!store.form().unwrap().is_loading());
    assert_eq!(engine.requests().len(), 1);
}

#[tokio::test]
async fn answer_after_reset_is_dropped() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let shared = Arc::new(Mutex::new(Store::new()));
    shared.lock().await.start().unwrap();

    let pending = {
        let shared = shared.clone();
        tokio::spawn(async move {
            store::submit(&shared, &client, Duration::from_millis(300)).await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    shared.lock().await.reset();

    assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Cancelled);
    let store = shared.lock().await;
    assert_eq!(store.screen(), Screen::Landing);
    assert!(store.result().is_none());
}

#[tokio::test]
async fn result_is_revealed_only_after_the_delay() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let client = PredictClient::new(&engine.settings()).unwrap();
    let shared = Arc::new(Mutex::new(Store::new()));
    shared.lock().await.start().unwrap();

    let started = std::time::Instant::now();
    let pending = {
        let shared = shared.clone();
        tokio::spawn(async move {
            store::submit(&shared, &client, Duration::from_millis(400)).await
        })
    };
    while engine.requests().is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    {
        let store = shared.lock().await;
        assert_eq!(store.screen(), Screen::Predict);
        assert!(store.form().unwrap().is_loading());
        assert!(store.result().is_none());
    }

    assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Predicted);
    assert!(started.elapsed() >= Duration::from_millis(400));
    let store = shared.lock().await;
    assert_eq!(store.screen(), Screen::Result);
    assert_eq!(store.result().map(|r| r.risk_level.as_str()), Some("High"));
}
