//! CLI entry-point for a single assessment.

use anyhow::{anyhow, Context, Result};
use clap::Args as ClapArgs;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    engine::PredictClient,
    render::ResultView,
    store::{self, Store, SubmitOutcome},
    vitals::VitalField,
};

/// Args for the `assess` command. Omitted vitals keep the form defaults;
/// values that are not numbers count as 0.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[arg(long)]
    pub pregnancies: Option<String>,
    #[arg(long)]
    pub glucose: Option<String>,
    #[arg(long)]
    pub blood_pressure: Option<String>,
    #[arg(long)]
    pub skin_thickness: Option<String>,
    #[arg(long)]
    pub insulin: Option<String>,
    #[arg(long)]
    pub bmi: Option<String>,
    #[arg(long)]
    pub diabetes_pedigree_function: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// Print the engine response as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    fn raw(&self, field: VitalField) -> Option<&str> {
        let value = match field {
            VitalField::Pregnancies => &self.pregnancies,
            VitalField::Glucose => &self.glucose,
            VitalField::BloodPressure => &self.blood_pressure,
            VitalField::SkinThickness => &self.skin_thickness,
            VitalField::Insulin => &self.insulin,
            VitalField::Bmi => &self.bmi,
            VitalField::DiabetesPedigreeFunction => &self.diabetes_pedigree_function,
            VitalField::Age => &self.age,
        };
        value.as_deref()
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let client = PredictClient::new(&settings)?;
    let mut store = Store::new();
    store.start()?;
    for field in VitalField::ALL {
        if let Some(raw) = args.raw(field) {
            let update = store.update_field(field.wire_name(), raw)?;
            if update.coerced {
                warn!(%field, raw, "not a number; using 0");
            }
        }
    }

    let shared = Mutex::new(store);
    match store::submit(&shared, &client, settings.reveal_delay).await? {
        SubmitOutcome::Predicted => {}
        SubmitOutcome::Failed(message) => return Err(anyhow!(message)),
        SubmitOutcome::Cancelled => return Err(anyhow!("prediction cancelled")),
    }

    let store = shared.into_inner();
    let result = store
        .result()
        .context("store left the result screen unexpectedly")?;
    info!(risk = %result.risk_level, "assessment complete");
    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", ResultView::new(result).to_text());
    }
    Ok(())
}
