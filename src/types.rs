//! Type-safe form value types for leadform
//!
//! Enumerated answers (vehicle category, residence, income source) and the
//! names of every validated field. Using enums instead of free strings keeps
//! typos out of the controller and gives exhaustive matching in the UI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Vehicle category chosen on the second step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleType {
    Car,
    Truck,
    Suv,
    Van,
    /// "$0 down, show me anything" shortcut
    Any,
}

impl VehicleType {
    /// Categories offered as cards on the vehicle step (excludes the shortcut)
    pub const CARDS: [VehicleType; 4] = [Self::Car, Self::Truck, Self::Suv, Self::Van];

    /// Card title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Car => "I Want a Car",
            Self::Truck => "I Want a Truck",
            Self::Suv => "I Want an SUV",
            Self::Van => "I Want a Van",
            Self::Any => "Get $0 Down Approval Offers Today!",
        }
    }

    /// Card subtitle
    pub fn description(&self) -> &'static str {
        match self {
            Self::Car => "Sedans, Coupes, Sports Cars",
            Self::Truck => "Pickup Trucks, Work Trucks",
            Self::Suv => "SUVs, Crossovers",
            Self::Van => "Minivans, Cargo Vans",
            Self::Any => "Any vehicle that fits the budget",
        }
    }
}

/// Whether the applicant rents or owns their residence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResidenceType {
    Rent,
    Own,
}

impl ResidenceType {
    /// The other choice, used by the rent/own toggle
    pub fn toggled(self) -> Self {
        match self {
            Self::Rent => Self::Own,
            Self::Own => Self::Rent,
        }
    }
}

/// Primary source of income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncomeSource {
    Employment,
    SelfEmployment,
    SocialSecurity,
    Disability,
    Retirement,
    Investments,
    Alimony,
    Unemployment,
    Other,
}

impl IncomeSource {
    /// Human readable label for the selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employment => "Employment Income",
            Self::SelfEmployment => "Self Employment",
            Self::SocialSecurity => "Social Security",
            Self::Disability => "Disability Benefits",
            Self::Retirement => "Retirement/Pension",
            Self::Investments => "Investment Income",
            Self::Alimony => "Alimony/Child Support",
            Self::Unemployment => "Unemployment Benefits",
            Self::Other => "Other Income Source",
        }
    }
}

/// Name of a validated field.
///
/// Keys of a validation error map. The string form matches the camelCase
/// field names of the serialized session so errors line up with lead JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FormField {
    // Contact step
    Address,
    Email,
    FirstName,
    LastName,
    Phone,

    // Offer-details step
    BirthDate,
    ResidenceType,
    ResidenceYears,
    ResidenceMonths,
    IncomeSource,
    IncomeYears,
    IncomeMonths,
    MonthlyIncome,

    /// Not an input: carries the generic submission failure
    Submit,
}
