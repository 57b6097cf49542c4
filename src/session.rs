//! Form session controller
//!
//! [`FormSession`] is the single source of truth for a visitor's progress
//! through the wizard: the current step number and every answer collected so
//! far. It is a plain value. Every operation borrows the current session and
//! returns the next one, so the controller can be driven and tested without
//! any rendering code.
//!
//! # Invariants
//!
//! - `step` always lies in `[1, N]`, where N comes from the session's [`StepPlan`]
//! - `budget` always lies in `[MIN_BUDGET, MAX_BUDGET]`
//! - Partial updates never drop sibling fields of the record they touch
//!   (except [`SessionPatch::location`], which replaces the whole record)

use crate::error::Result;
use crate::step::{StepPlan, WizardStep};
use crate::types::{FormField, IncomeSource, ResidenceType, VehicleType};
use crate::validation::{self, ValidationReport};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lowest monthly payment on the budget slider.
pub const MIN_BUDGET: u32 = 150;

/// Highest monthly payment on the budget slider.
pub const MAX_BUDGET: u32 = 800;

/// Slider position for a new session.
pub const DEFAULT_BUDGET: u32 = 400;

/// Slider granularity.
pub const BUDGET_STEP: u32 = 10;

/// Contact details collected on the location step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Location {
    /// Current value of a contact field. `None` for fields of other steps.
    pub fn field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Address => Some(&self.address),
            FormField::Email => Some(&self.email),
            FormField::FirstName => Some(&self.first_name),
            FormField::LastName => Some(&self.last_name),
            FormField::Phone => Some(&self.phone),
            _ => None,
        }
    }
}

/// Field-wise update for [`Location`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationPatch {
    pub address: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl LocationPatch {
    /// Patch that sets a single contact field. `None` if `field` is not a
    /// contact field.
    pub fn single(field: FormField, value: impl Into<String>) -> Option<Self> {
        let value = Some(value.into());
        let patch = match field {
            FormField::Address => Self { address: value, ..Self::default() },
            FormField::Email => Self { email: value, ..Self::default() },
            FormField::FirstName => Self { first_name: value, ..Self::default() },
            FormField::LastName => Self { last_name: value, ..Self::default() },
            FormField::Phone => Self { phone: value, ..Self::default() },
            _ => return None,
        };
        Some(patch)
    }

    fn apply(self, target: &mut Location) {
        if let Some(v) = self.address {
            target.address = v;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if let Some(v) = self.first_name {
            target.first_name = v;
        }
        if let Some(v) = self.last_name {
            target.last_name = v;
        }
        if let Some(v) = self.phone {
            target.phone = v;
        }
    }
}

/// Financial and residence history collected on the get-offers step.
///
/// Durations and income stay as the text the user typed; validation decides
/// what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferDetails {
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub residence_type: Option<ResidenceType>,
    pub residence_years: String,
    pub residence_months: String,
    pub income_source: Option<IncomeSource>,
    pub income_years: String,
    pub income_months: String,
    /// Display-formatted, e.g. `$4,200`
    pub monthly_income: String,
}

impl OfferDetails {
    /// Current value of a free-text offer field. `None` for selector fields
    /// and fields of other steps.
    pub fn text_field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::BirthDate => Some(&self.birth_date),
            FormField::ResidenceYears => Some(&self.residence_years),
            FormField::ResidenceMonths => Some(&self.residence_months),
            FormField::IncomeYears => Some(&self.income_years),
            FormField::IncomeMonths => Some(&self.income_months),
            FormField::MonthlyIncome => Some(&self.monthly_income),
            _ => None,
        }
    }
}

/// Field-wise update for [`OfferDetails`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferDetailsPatch {
    pub birth_date: Option<String>,
    pub residence_type: Option<ResidenceType>,
    pub residence_years: Option<String>,
    pub residence_months: Option<String>,
    pub income_source: Option<IncomeSource>,
    pub income_years: Option<String>,
    pub income_months: Option<String>,
    pub monthly_income: Option<String>,
}

impl OfferDetailsPatch {
    /// Patch that sets a single free-text offer field. `None` if `field` is
    /// not one.
    pub fn text(field: FormField, value: impl Into<String>) -> Option<Self> {
        let value = Some(value.into());
        let patch = match field {
            FormField::BirthDate => Self { birth_date: value, ..Self::default() },
            FormField::ResidenceYears => Self { residence_years: value, ..Self::default() },
            FormField::ResidenceMonths => Self { residence_months: value, ..Self::default() },
            FormField::IncomeYears => Self { income_years: value, ..Self::default() },
            FormField::IncomeMonths => Self { income_months: value, ..Self::default() },
            FormField::MonthlyIncome => Self { monthly_income: value, ..Self::default() },
            _ => return None,
        };
        Some(patch)
    }

    fn apply(self, target: &mut OfferDetails) {
        if let Some(v) = self.birth_date {
            target.birth_date = v;
        }
        if let Some(v) = self.residence_type {
            target.residence_type = Some(v);
        }
        if let Some(v) = self.residence_years {
            target.residence_years = v;
        }
        if let Some(v) = self.residence_months {
            target.residence_months = v;
        }
        if let Some(v) = self.income_source {
            target.income_source = Some(v);
        }
        if let Some(v) = self.income_years {
            target.income_years = v;
        }
        if let Some(v) = self.income_months {
            target.income_months = v;
        }
        if let Some(v) = self.monthly_income {
            target.monthly_income = v;
        }
    }
}

/// Top-level update for [`FormSession::set_state`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub step: Option<u8>,
    pub budget: Option<u32>,
    pub vehicle_type: Option<VehicleType>,
    /// Replaces the whole contact record. Use [`FormSession::update_location`]
    /// to change individual fields.
    pub location: Option<Location>,
}

impl SessionPatch {
    pub fn budget(budget: u32) -> Self {
        Self { budget: Some(budget), ..Self::default() }
    }

    pub fn vehicle_type(vehicle_type: VehicleType) -> Self {
        Self { vehicle_type: Some(vehicle_type), ..Self::default() }
    }
}

/// Everything one visitor has entered, plus where they are in the wizard.
///
/// Deserializing clamps `step` and `budget` into their domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawFormSession")]
pub struct FormSession {
    #[serde(default)]
    plan: StepPlan,
    step: u8,
    budget: u32,
    #[serde(default)]
    vehicle_type: Option<VehicleType>,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    offer_details: OfferDetails,
}

/// Serialized form of [`FormSession`] before the invariants are applied
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormSession {
    #[serde(default)]
    plan: StepPlan,
    step: u8,
    budget: u32,
    #[serde(default)]
    vehicle_type: Option<VehicleType>,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    offer_details: OfferDetails,
}

impl From<RawFormSession> for FormSession {
    fn from(raw: RawFormSession) -> Self {
        Self {
            plan: raw.plan,
            step: raw.plan.clamp(raw.step),
            budget: clamp_budget(raw.budget),
            vehicle_type: raw.vehicle_type,
            location: raw.location,
            offer_details: raw.offer_details,
        }
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(StepPlan::default())
    }
}

impl FormSession {
    /// Fresh session on step 1 with every answer at its default.
    pub fn new(plan: StepPlan) -> Self {
        Self {
            plan,
            step: 1,
            budget: DEFAULT_BUDGET,
            vehicle_type: None,
            location: Location::default(),
            offer_details: OfferDetails::default(),
        }
    }

    /// Fresh session whose slider starts at `budget` (clamped).
    pub fn with_budget(plan: StepPlan, budget: u32) -> Self {
        Self {
            budget: clamp_budget(budget),
            ..Self::new(plan)
        }
    }

    /// Parse a serialized session. Out-of-range step and budget are clamped.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn plan(&self) -> StepPlan {
        self.plan
    }

    /// Current 1-based step number.
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Total number of steps (N).
    pub fn step_count(&self) -> u8 {
        self.plan.step_count()
    }

    /// Screen for the current step.
    pub fn current_step(&self) -> WizardStep {
        self.plan.step_at(self.step)
    }

    /// True once the confirmation screen has been reached.
    pub fn is_complete(&self) -> bool {
        self.current_step() == WizardStep::ThankYou
    }

    /// Fraction of the wizard completed, `(step - 1) / (N - 1)`.
    pub fn progress(&self) -> f64 {
        f64::from(self.step.saturating_sub(1)) / f64::from(self.step_count().saturating_sub(1).max(1))
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn vehicle_type(&self) -> Option<VehicleType> {
        self.vehicle_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn offer_details(&self) -> &OfferDetails {
        &self.offer_details
    }

    /// Shallow-merge top-level fields.
    ///
    /// Performs no validation. `step` and `budget` are clamped into their
    /// domains; `location` replaces the whole record.
    #[must_use]
    pub fn set_state(&self, patch: SessionPatch) -> Self {
        let mut next = self.clone();
        if let Some(step) = patch.step {
            next.step = next.plan.clamp(step);
        }
        if let Some(budget) = patch.budget {
            next.budget = clamp_budget(budget);
        }
        if let Some(vehicle_type) = patch.vehicle_type {
            next.vehicle_type = Some(vehicle_type);
        }
        if let Some(location) = patch.location {
            next.location = location;
        }
        next
    }

    /// Move the budget slider by `delta` dollars, staying inside the domain.
    #[must_use]
    pub fn adjust_budget(&self, delta: i64) -> Self {
        let target = i64::from(self.budget).saturating_add(delta).clamp(0, i64::from(MAX_BUDGET));
        self.set_state(SessionPatch::budget(target as u32))
    }

    /// Shallow-merge individual contact fields.
    #[must_use]
    pub fn update_location(&self, patch: LocationPatch) -> Self {
        let mut next = self.clone();
        patch.apply(&mut next.location);
        next
    }

    /// Shallow-merge individual offer-details fields.
    #[must_use]
    pub fn update_offer_details(&self, patch: OfferDetailsPatch) -> Self {
        let mut next = self.clone();
        patch.apply(&mut next.offer_details);
        next
    }

    /// Advance one step. No-op on the last step.
    #[must_use]
    pub fn next_step(&self) -> Self {
        Self {
            step: self.plan.next(self.step),
            ..self.clone()
        }
    }

    /// Go back one step. No-op on the first step.
    #[must_use]
    pub fn prev_step(&self) -> Self {
        Self {
            step: self.plan.prev(self.step),
            ..self.clone()
        }
    }

    /// Validate the offer-details record against today's date.
    pub fn validate_offer_details(&self) -> ValidationReport {
        validation::validate_offer_details(&self.offer_details)
    }

    /// Validate the offer-details record as of `today`.
    pub fn validate_offer_details_on(&self, today: NaiveDate) -> ValidationReport {
        validation::validate_offer_details_on(&self.offer_details, today)
    }

    /// Validate the contact record.
    pub fn validate_location(&self) -> ValidationReport {
        validation::validate_location(&self.location)
    }

    /// Validate every data-collection step the plan includes.
    pub fn validate_all(&self) -> ValidationReport {
        let mut report = self.validate_location();
        if self.plan.number_of(WizardStep::GetOffers).is_some() {
            report.merge(self.validate_offer_details());
        }
        report
    }
}

fn clamp_budget(budget: u32) -> u32 {
    budget.clamp(MIN_BUDGET, MAX_BUDGET)
}
