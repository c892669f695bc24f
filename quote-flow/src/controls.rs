use serde::Serialize;
use tracing::debug;

use crate::{
    error::{QuoteError, Result},
    options::{Field, FieldKind},
};

/// Integer input bounded to `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberInput {
    pub field: Field,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    value: u32,
}

impl NumberInput {
    /// Starts at the lower bound.
    pub fn new(field: Field, min: u32, max: u32, step: u32) -> Self {
        Self {
            field,
            min,
            max,
            step,
            value: min,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Stores `value` clamped into the control's bounds and returns what was stored.
    pub fn set(&mut self, value: i64) -> u32 {
        let clamped = value.clamp(i64::from(self.min), i64::from(self.max));
        if clamped != value {
            debug!(field = %self.field, requested = value, stored = clamped, "clamped number input");
        }
        // clamped lies within u32 bounds
        self.value = clamped as u32;
        self.value
    }

    /// Parses a whole number; anything else is rejected and the current value kept.
    pub fn set_raw(&mut self, raw: &str) -> Result<u32> {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => Ok(self.set(value)),
            // out of i64 range but still a whole number: saturate towards the nearer bound
            Err(_) if is_integer_literal(trimmed) => {
                let value = if trimmed.starts_with('-') { i64::MIN } else { i64::MAX };
                Ok(self.set(value))
            }
            Err(_) => Err(QuoteError::InvalidNumber {
                field: self.field,
                value: raw.to_string(),
            }),
        }
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Choice among a fixed option list; free text is never accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectBox {
    pub field: Field,
    pub options: &'static [&'static str],
    selected: usize,
}

impl SelectBox {
    /// Starts at the first option.
    pub fn new(field: Field, options: &'static [&'static str]) -> Self {
        Self {
            field,
            options,
            selected: 0,
        }
    }

    pub fn value(&self) -> &'static str {
        self.options[self.selected]
    }

    pub fn select(&mut self, value: &str) -> Result<&'static str> {
        let index = self
            .options
            .iter()
            .position(|option| *option == value)
            .ok_or_else(|| QuoteError::InvalidOption {
                field: self.field,
                value: value.to_string(),
            })?;
        self.selected = index;
        Ok(self.value())
    }
}

/// One form control, built from the option table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Number(NumberInput),
    Select(SelectBox),
}

impl Control {
    pub fn for_field(field: Field) -> Self {
        match field.kind() {
            FieldKind::Number { min, max, step } => {
                Control::Number(NumberInput::new(field, min, max, step))
            }
            FieldKind::Select { options } => Control::Select(SelectBox::new(field, options)),
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Control::Number(input) => input.field,
            Control::Select(select) => select.field,
        }
    }

    /// Applies a raw textual value the way the widget would.
    pub fn set_raw(&mut self, raw: &str) -> Result<()> {
        match self {
            Control::Number(input) => input.set_raw(raw).map(|_| ()),
            Control::Select(select) => select.select(raw).map(|_| ()),
        }
    }

    /// Current value rendered as text.
    pub fn display_value(&self) -> String {
        match self {
            Control::Number(input) => input.value().to_string(),
            Control::Select(select) => select.value().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age() -> NumberInput {
        NumberInput::new(Field::Age, 18, 100, 1)
    }

    #[test]
    fn number_input_starts_at_minimum() {
        assert_eq!(age().value(), 18);
        assert_eq!(NumberInput::new(Field::GeneticalRisk, 0, 5, 1).value(), 0);
    }

    #[test]
    fn number_input_clamps_out_of_range_values() {
        let mut input = age();
        assert_eq!(input.set(150), 100);
        assert_eq!(input.set(3), 18);
        assert_eq!(input.set(-40), 18);
        assert_eq!(input.set(42), 42);
    }

    #[test]
    fn raw_numbers_are_parsed_and_clamped() {
        let mut input = age();
        assert_eq!(input.set_raw(" 150 ").unwrap(), 100);
        assert_eq!(input.set_raw("99999999999999999999999").unwrap(), 100);
        assert_eq!(input.set_raw("-99999999999999999999999").unwrap(), 18);
    }

    #[test]
    fn non_numeric_text_is_rejected_and_value_kept() {
        let mut input = age();
        input.set(40);
        for raw in ["forty", "40.5", "", "1e3"] {
            assert!(matches!(
                input.set_raw(raw),
                Err(QuoteError::InvalidNumber { field: Field::Age, .. })
            ));
            assert_eq!(input.value(), 40);
        }
    }

    #[test]
    fn select_box_defaults_to_first_option() {
        let select = SelectBox::new(Field::Region, crate::options::REGIONS);
        assert_eq!(select.value(), "Northwest");
    }

    #[test]
    fn select_box_rejects_free_text() {
        let mut select = SelectBox::new(Field::InsurancePlan, crate::options::INSURANCE_PLANS);
        assert_eq!(select.select("Gold").unwrap(), "Gold");
        assert!(select.select("Platinum").is_err());
        assert!(select.select("gold").is_err());
        assert_eq!(select.value(), "Gold");
    }

    #[test]
    fn blank_employment_status_is_selectable() {
        let mut select =
            SelectBox::new(Field::EmploymentStatus, crate::options::EMPLOYMENT_STATUSES);
        assert_eq!(select.select("").unwrap(), "");
    }
}
