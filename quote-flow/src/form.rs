use serde::Serialize;
use tracing::debug;

use crate::{
    controls::Control,
    error::Result,
    options::Field,
    request::QuoteRequest,
};

/// Per-session state of every input control.
///
/// Editing the form never talks to the collaborator; only [`crate::submit`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    controls: Vec<Control>,
}

impl FormState {
    /// All controls at their defaults, in display order.
    pub fn new() -> Self {
        Self {
            controls: Field::all().map(Control::for_field).collect(),
        }
    }

    /// Builds a fresh form from raw `(name, value)` pairs such as an HTML form post.
    ///
    /// Unknown names are ignored and rejected values leave the default in place.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::new();
        for (name, value) in pairs {
            let Some(field) = Field::parse(name) else {
                debug!(name, "ignoring unknown form field");
                continue;
            };
            if let Err(e) = form.set(field, value) {
                debug!(field = %field, error = %e, "rejected form value");
            }
        }
        form
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, field: Field) -> &Control {
        self.controls
            .iter()
            .find(|control| control.field() == field)
            .unwrap_or_else(|| unreachable!("form holds a control for every field"))
    }

    fn control_mut(&mut self, field: Field) -> &mut Control {
        self.controls
            .iter_mut()
            .find(|control| control.field() == field)
            .unwrap_or_else(|| unreachable!("form holds a control for every field"))
    }

    /// Routes a raw value to the field's control.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<()> {
        self.control_mut(field).set_raw(raw)
    }

    fn number(&self, field: Field) -> u32 {
        match self.control(field) {
            Control::Number(input) => input.value(),
            Control::Select(_) => unreachable!("{field} is a number input"),
        }
    }

    fn choice(&self, field: Field) -> &'static str {
        match self.control(field) {
            Control::Select(select) => select.value(),
            Control::Number(_) => unreachable!("{field} is a select box"),
        }
    }

    /// Reads the current control states into a fresh request.
    pub fn collect(&self) -> QuoteRequest {
        QuoteRequest {
            age: self.number(Field::Age),
            number_of_dependants: self.number(Field::NumberOfDependants),
            income_lakhs: self.number(Field::IncomeLakhs),
            genetical_risk: self.number(Field::GeneticalRisk),
            insurance_plan: self.choice(Field::InsurancePlan),
            employment_status: self.choice(Field::EmploymentStatus),
            gender: self.choice(Field::Gender),
            marital_status: self.choice(Field::MaritalStatus),
            bmi_category: self.choice(Field::BmiCategory),
            smoking_status: self.choice(Field::SmokingStatus),
            region: self.choice(Field::Region),
            medical_history: self.choice(Field::MedicalHistory),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
