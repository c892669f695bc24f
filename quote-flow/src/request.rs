use serde::Serialize;

/// Snapshot of the form handed to the prediction collaborator.
///
/// Serialises to a JSON object keyed by the exact field labels. Select values are
/// borrowed from the option table, so a request can only carry listed options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRequest {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Number of Dependants")]
    pub number_of_dependants: u32,
    #[serde(rename = "Income in Lakhs")]
    pub income_lakhs: u32,
    #[serde(rename = "Genetical Risk")]
    pub genetical_risk: u32,
    #[serde(rename = "Insurance Plan")]
    pub insurance_plan: &'static str,
    #[serde(rename = "Employment Status")]
    pub employment_status: &'static str,
    #[serde(rename = "Gender")]
    pub gender: &'static str,
    #[serde(rename = "Marital Status")]
    pub marital_status: &'static str,
    #[serde(rename = "BMI Category")]
    pub bmi_category: &'static str,
    #[serde(rename = "Smoking Status")]
    pub smoking_status: &'static str,
    #[serde(rename = "Region")]
    pub region: &'static str,
    #[serde(rename = "Medical History")]
    pub medical_history: &'static str,
}

impl QuoteRequest {
    /// The payload as a JSON object.
    pub fn to_payload(&self) -> serde_json::Value {
        // plain struct of integers and strings; serialisation cannot fail
        serde_json::to_value(self).unwrap_or_default()
    }
}
