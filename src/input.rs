//! Input handling module
//!
//! Describes the editable fields of the two form steps and applies key
//! presses to their values. Editing is pure: a key and the current text go
//! in, the new text comes out, and the caller writes it into the session.

use crate::step::WizardStep;
use crate::types::{FormField, IncomeSource};
use crate::validation::{self, format_currency, format_phone_number};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;

/// How typed text is normalized after every edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Free text, stored as typed
    Plain,
    /// `(ddd) ddd-dddd`
    Phone,
    /// `$1,234`
    Currency,
    /// Digits and dashes, `YYYY-MM-DD`
    Date,
    /// Digits only, at most this many
    Digits(usize),
}

impl Formatter {
    /// Normalize a raw value.
    pub fn apply(self, raw: &str) -> String {
        match self {
            Self::Plain => raw.to_string(),
            Self::Phone => format_phone_number(raw),
            Self::Currency => format_currency(raw),
            Self::Date => raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-')
                .take(10)
                .collect(),
            Self::Digits(max) => validation::digits_only(raw).chars().take(max).collect(),
        }
    }

    /// Whether a typed character can ever survive formatting.
    fn accepts(self, c: char) -> bool {
        match self {
            Self::Plain => !c.is_control(),
            Self::Date => c.is_ascii_digit() || c == '-',
            Self::Phone | Self::Currency | Self::Digits(_) => c.is_ascii_digit(),
        }
    }
}

/// Kinds of input widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Text input
    Text(Formatter),
    /// Two-way choice flipped with Left/Right
    Toggle,
    /// Choice from a fixed list, cycled with Left/Right
    Select,
}

/// One editable field as shown on a form step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: FormField,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
}

impl FieldSpec {
    const fn text(
        field: FormField,
        label: &'static str,
        placeholder: &'static str,
        formatter: Formatter,
    ) -> Self {
        Self {
            field,
            label,
            placeholder,
            kind: InputKind::Text(formatter),
        }
    }
}

/// Contact step fields, in focus order
pub const LOCATION_FIELDS: [FieldSpec; 5] = [
    FieldSpec::text(FormField::Address, "Address", "Street address, city", Formatter::Plain),
    FieldSpec::text(FormField::Email, "Email", "you@example.com", Formatter::Plain),
    FieldSpec::text(FormField::FirstName, "First Name", "", Formatter::Plain),
    FieldSpec::text(FormField::LastName, "Last Name", "", Formatter::Plain),
    FieldSpec::text(FormField::Phone, "Phone", "(555) 555-5555", Formatter::Phone),
];

/// Offer-details step fields, in focus order
pub const OFFER_FIELDS: [FieldSpec; 8] = [
    FieldSpec::text(FormField::BirthDate, "Birth Date", "YYYY-MM-DD", Formatter::Date),
    FieldSpec {
        field: FormField::ResidenceType,
        label: "Do you rent or own?",
        placeholder: "Choose with Left/Right",
        kind: InputKind::Toggle,
    },
    FieldSpec::text(FormField::ResidenceYears, "Years at residence", "0", Formatter::Digits(2)),
    FieldSpec::text(FormField::ResidenceMonths, "Months at residence", "0", Formatter::Digits(2)),
    FieldSpec {
        field: FormField::IncomeSource,
        label: "Income Source",
        placeholder: "Choose with Left/Right",
        kind: InputKind::Select,
    },
    FieldSpec::text(FormField::IncomeYears, "Years receiving income", "0", Formatter::Digits(2)),
    FieldSpec::text(FormField::IncomeMonths, "Months receiving income", "0", Formatter::Digits(2)),
    FieldSpec::text(FormField::MonthlyIncome, "Monthly Income", "$0", Formatter::Currency),
];

/// Editable fields of a step. Empty for steps without a form.
pub fn fields_for(step: WizardStep) -> &'static [FieldSpec] {
    match step {
        WizardStep::Location => &LOCATION_FIELDS,
        WizardStep::GetOffers => &OFFER_FIELDS,
        _ => &[],
    }
}

/// Apply a key press to a text value.
///
/// Returns the new value, or `None` when the key is not a text edit (or
/// the typed character is rejected by the formatter).
pub fn edit_text(current: &str, key: &KeyEvent, formatter: Formatter) -> Option<String> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char(c) if formatter.accepts(c) => {
            let mut raw = current.to_string();
            raw.push(c);
            Some(formatter.apply(&raw))
        }
        KeyCode::Backspace => Some(backspace(current, formatter)),
        _ => None,
    }
}

/// Remove the last meaningful character. For formatted values that is the
/// last digit, so `"(416) 5"` becomes `"416"` rather than `"(416) "`.
fn backspace(current: &str, formatter: Formatter) -> String {
    match formatter {
        Formatter::Phone | Formatter::Currency => {
            let mut digits = validation::digits_only(current);
            digits.pop();
            formatter.apply(&digits)
        }
        _ => {
            let mut value = current.to_string();
            value.pop();
            value
        }
    }
}

/// Cycle an optional income source forward or backward.
///
/// Starting from nothing picks the first (forward) or last (backward) source.
pub fn cycle_income_source(current: Option<IncomeSource>, forward: bool) -> IncomeSource {
    let all: Vec<IncomeSource> = IncomeSource::iter().collect();
    let len = all.len();
    let next = match current.and_then(|c| all.iter().position(|s| *s == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    all[next]
}
