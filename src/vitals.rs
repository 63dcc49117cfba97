//! Patient vitals collected by the assessment form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight clinical measurements sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VitalField {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    #[serde(rename = "BMI")]
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Display metadata for a field: label, advisory range, slider step and hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub description: &'static str,
    pub default: f64,
}

impl VitalField {
    /// All fields in wire order.
    pub const ALL: [VitalField; 8] = [
        VitalField::Pregnancies,
        VitalField::Glucose,
        VitalField::BloodPressure,
        VitalField::SkinThickness,
        VitalField::Insulin,
        VitalField::Bmi,
        VitalField::DiabetesPedigreeFunction,
        VitalField::Age,
    ];

    /// JSON key used by the prediction engine.
    pub fn wire_name(self) -> &'static str {
        match self {
            VitalField::Pregnancies => "Pregnancies",
            VitalField::Glucose => "Glucose",
            VitalField::BloodPressure => "BloodPressure",
            VitalField::SkinThickness => "SkinThickness",
            VitalField::Insulin => "Insulin",
            VitalField::Bmi => "BMI",
            VitalField::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            VitalField::Age => "Age",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            VitalField::Pregnancies => "pregnancies",
            VitalField::Glucose => "glucose",
            VitalField::BloodPressure => "blood_pressure",
            VitalField::SkinThickness => "skin_thickness",
            VitalField::Insulin => "insulin",
            VitalField::Bmi => "bmi",
            VitalField::DiabetesPedigreeFunction => "diabetes_pedigree_function",
            VitalField::Age => "age",
        }
    }

    /// Resolve a wire name or its snake_case alias.
    pub fn from_wire(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.wire_name() == name || f.alias().eq_ignore_ascii_case(name))
    }

    pub fn spec(self) -> FieldSpec {
        match self {
            VitalField::Pregnancies => FieldSpec {
                label: "Pregnancies",
                min: 0.0,
                max: 20.0,
                step: 1.0,
                description: "Number of times pregnant",
                default: 0.0,
            },
            VitalField::Glucose => FieldSpec {
                label: "Glucose (mg/dL)",
                min: 0.0,
                max: 300.0,
                step: 1.0,
                description: "Plasma glucose concentration",
                default: 100.0,
            },
            VitalField::BloodPressure => FieldSpec {
                label: "Blood Pressure (mm Hg)",
                min: 0.0,
                max: 200.0,
                step: 1.0,
                description: "Diastolic blood pressure",
                default: 72.0,
            },
            VitalField::SkinThickness => FieldSpec {
                label: "Skin Thickness (mm)",
                min: 0.0,
                max: 100.0,
                step: 1.0,
                description: "Triceps skin fold thickness",
                default: 20.0,
            },
            VitalField::Insulin => FieldSpec {
                label: "Insulin (mu U/ml)",
                min: 0.0,
                max: 900.0,
                step: 1.0,
                description: "2-Hour serum insulin",
                default: 0.0,
            },
            VitalField::Bmi => FieldSpec {
                label: "BMI",
                min: 0.0,
                max: 70.0,
                step: 0.1,
                description: "Body mass index",
                default: 30.0,
            },
            VitalField::DiabetesPedigreeFunction => FieldSpec {
                label: "Diabetes Pedigree",
                min: 0.0,
                max: 3.0,
                step: 0.01,
                description: "Diabetes pedigree function",
                default: 0.5,
            },
            VitalField::Age => FieldSpec {
                label: "Age (years)",
                min: 0.0,
                max: 120.0,
                step: 1.0,
                description: "Age of the patient",
                default: 30.0,
            },
        }
    }

    /// Whether `value` lies inside the advisory UI range. Never used to reject input.
    pub fn in_range(self, value: f64) -> bool {
        let spec = self.spec();
        (spec.min..=spec.max).contains(&value)
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Result of coercing raw user input into a field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coerced {
    pub value: f64,
    /// True when the input was not a finite number and collapsed to 0.
    pub coerced: bool,
}

/// Parse raw input as a float, collapsing anything unparsable to 0.
///
/// Empty, non-numeric and non-finite input all yield `0.0` with `coerced` set;
/// the form shows a marker for such fields instead of rejecting the keystroke.
pub fn coerce(raw: &str) -> Coerced {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Coerced {
            value,
            coerced: false,
        },
        _ => Coerced {
            value: 0.0,
            coerced: true,
        },
    }
}

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientVitals {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,
    #[serde(rename = "Glucose")]
    pub glucose: f64,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,
    #[serde(rename = "Insulin")]
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl Default for PatientVitals {
    fn default() -> Self {
        let mut vitals = PatientVitals {
            pregnancies: 0.0,
            glucose: 0.0,
            blood_pressure: 0.0,
            skin_thickness: 0.0,
            insulin: 0.0,
            bmi: 0.0,
            diabetes_pedigree_function: 0.0,
            age: 0.0,
        };
        for field in VitalField::ALL {
            vitals.set(field, field.spec().default);
        }
        vitals
    }
}

impl PatientVitals {
    pub fn get(&self, field: VitalField) -> f64 {
        match field {
            VitalField::Pregnancies => self.pregnancies,
            VitalField::Glucose => self.glucose,
            VitalField::BloodPressure => self.blood_pressure,
            VitalField::SkinThickness => self.skin_thickness,
            VitalField::Insulin => self.insulin,
            VitalField::Bmi => self.bmi,
            VitalField::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            VitalField::Age => self.age,
        }
    }

    pub fn set(&mut self, field: VitalField, value: f64) {
        let slot = match field {
            VitalField::Pregnancies => &mut self.pregnancies,
            VitalField::Glucose => &mut self.glucose,
            VitalField::BloodPressure => &mut self.blood_pressure,
            VitalField::SkinThickness => &mut self.skin_thickness,
            VitalField::Insulin => &mut self.insulin,
            VitalField::Bmi => &mut self.bmi,
            VitalField::DiabetesPedigreeFunction => &mut self.diabetes_pedigree_function,
            VitalField::Age => &mut self.age,
        };
        *slot = value;
    }

    /// Iterate `(field, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (VitalField, f64)> + '_ {
        VitalField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
