//! Static option table for the quote form.
//!
//! Every control is built from [`FIELDS`], and every value check goes back to it,
//! so the allowed values live in exactly one place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The twelve inputs of an insurance quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    NumberOfDependants,
    IncomeLakhs,
    GeneticalRisk,
    InsurancePlan,
    EmploymentStatus,
    Gender,
    MaritalStatus,
    BmiCategory,
    SmokingStatus,
    Region,
    MedicalHistory,
}

/// What kind of control a field is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number { min: u32, max: u32, step: u32 },
    Select { options: &'static [&'static str] },
}

pub const INSURANCE_PLANS: &[&str] = &["Bronze", "Silver", "Gold"];
pub const EMPLOYMENT_STATUSES: &[&str] = &["Salaried", "Self-Employed", "Freelancer", ""];
pub const GENDERS: &[&str] = &["Male", "Female"];
pub const MARITAL_STATUSES: &[&str] = &["Unmarried", "Married"];
pub const BMI_CATEGORIES: &[&str] = &["Normal", "Obesity", "Overweight", "Underweight"];
pub const SMOKING_STATUSES: &[&str] = &["No Smoking", "Regular", "Occasional"];
pub const REGIONS: &[&str] = &["Northwest", "Southeast", "Northeast", "Southwest"];
pub const MEDICAL_HISTORIES: &[&str] = &[
    "No Disease",
    "Diabetes",
    "High blood pressure",
    "Diabetes & High blood pressure",
    "Thyroid",
    "Heart disease",
    "High blood pressure & Heart disease",
    "Diabetes & Thyroid",
    "Diabetes & Heart disease",
];

/// Field table in display order: four rows of three.
pub static FIELDS: [(Field, FieldKind); 12] = [
    (Field::Age, FieldKind::Number { min: 18, max: 100, step: 1 }),
    (Field::NumberOfDependants, FieldKind::Number { min: 0, max: 20, step: 1 }),
    (Field::IncomeLakhs, FieldKind::Number { min: 0, max: 200, step: 1 }),
    (Field::GeneticalRisk, FieldKind::Number { min: 0, max: 5, step: 1 }),
    (Field::InsurancePlan, FieldKind::Select { options: INSURANCE_PLANS }),
    (Field::EmploymentStatus, FieldKind::Select { options: EMPLOYMENT_STATUSES }),
    (Field::Gender, FieldKind::Select { options: GENDERS }),
    (Field::MaritalStatus, FieldKind::Select { options: MARITAL_STATUSES }),
    (Field::BmiCategory, FieldKind::Select { options: BMI_CATEGORIES }),
    (Field::SmokingStatus, FieldKind::Select { options: SMOKING_STATUSES }),
    (Field::Region, FieldKind::Select { options: REGIONS }),
    (Field::MedicalHistory, FieldKind::Select { options: MEDICAL_HISTORIES }),
];

pub const FIELDS_PER_ROW: usize = 3;

impl Field {
    /// Field name as the prediction collaborator expects it.
    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::NumberOfDependants => "Number of Dependants",
            Field::IncomeLakhs => "Income in Lakhs",
            Field::GeneticalRisk => "Genetical Risk",
            Field::InsurancePlan => "Insurance Plan",
            Field::EmploymentStatus => "Employment Status",
            Field::Gender => "Gender",
            Field::MaritalStatus => "Marital Status",
            Field::BmiCategory => "BMI Category",
            Field::SmokingStatus => "Smoking Status",
            Field::Region => "Region",
            Field::MedicalHistory => "Medical History",
        }
    }

    /// snake_case key used in form posts and URL paths.
    pub fn key(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::NumberOfDependants => "number_of_dependants",
            Field::IncomeLakhs => "income_lakhs",
            Field::GeneticalRisk => "genetical_risk",
            Field::InsurancePlan => "insurance_plan",
            Field::EmploymentStatus => "employment_status",
            Field::Gender => "gender",
            Field::MaritalStatus => "marital_status",
            Field::BmiCategory => "bmi_category",
            Field::SmokingStatus => "smoking_status",
            Field::Region => "region",
            Field::MedicalHistory => "medical_history",
        }
    }

    /// Accepts either the key or the label.
    pub fn parse(name: &str) -> Option<Field> {
        FIELDS
            .iter()
            .map(|(field, _)| *field)
            .find(|field| field.key() == name || field.label() == name)
    }

    pub fn kind(self) -> FieldKind {
        FIELDS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, kind)| *kind)
            .unwrap_or_else(|| unreachable!("every field has a table entry"))
    }

    pub fn all() -> impl Iterator<Item = Field> {
        FIELDS.iter().map(|(field, _)| *field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
