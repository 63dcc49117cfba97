//! askama page models for the three screens.

use askama::Template;
use axum::{http::StatusCode, response::Html};
use chrono::{Datelike, Utc};

use crate::{
    form::FormCollector,
    render::ResultView,
    router::ViewState,
    store::Store,
    vitals::VitalField,
};

pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURE_CARDS: &[FeatureCard] = &[
    FeatureCard {
        title: "Instant Analysis",
        description: "Get results in seconds powered by advanced Random Forest algorithms.",
    },
    FeatureCard {
        title: "Precision AI",
        description: "Trained on thousands of clinical records for high accuracy.",
    },
    FeatureCard {
        title: "Privacy First",
        description: "Your health data is processed in real-time and never stored.",
    },
];

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub year: i32,
    pub features: &'static [FeatureCard],
}

/// One input row of the assessment form.
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub value: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub coerced: bool,
    pub out_of_range: bool,
}

impl FieldView {
    fn new(field: VitalField, form: &FormCollector) -> Self {
        let spec = field.spec();
        let value = form.vitals().get(field);
        Self {
            name: field.wire_name(),
            label: spec.label,
            description: spec.description,
            value: value.to_string(),
            min: spec.min,
            max: spec.max,
            step: spec.step,
            coerced: form.is_coerced(field),
            out_of_range: !field.in_range(value),
        }
    }
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub year: i32,
    pub fields: Vec<FieldView>,
    pub error: Option<String>,
    pub loading: bool,
}

impl FormPage {
    pub fn new(form: &FormCollector) -> Self {
        Self {
            year: current_year(),
            fields: VitalField::ALL
                .into_iter()
                .map(|field| FieldView::new(field, form))
                .collect(),
            error: form.error().map(str::to_string),
            loading: form.is_loading(),
        }
    }
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage {
    pub year: i32,
    pub view: ResultView,
}

fn current_year() -> i32 {
    Utc::now().year()
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, (StatusCode, String)> {
    page.render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Render whichever screen the store is on.
pub fn screen_page(store: &Store) -> Result<Html<String>, (StatusCode, String)> {
    match (store.router().state(), store.form()) {
        (ViewState::Predict, Some(form)) => render(&FormPage::new(form)),
        (ViewState::Result(result), _) => render(&ResultPage {
            year: current_year(),
            view: ResultView::new(result),
        }),
        _ => render(&LandingPage {
            year: current_year(),
            features: FEATURE_CARDS,
        }),
    }
}
