//! leadform library
//!
//! Core of a multi-step vehicle-financing lead form: the form session
//! controller, field validation, the submission seam and the terminal wizard
//! that drives them.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod input;
pub mod session;
pub mod step;
pub mod submission;
pub mod theme;
pub mod types;
pub mod ui;
pub mod validation;

// Re-export main types for convenience
pub use config::LeadFormConfig;
pub use error::{LeadFormError, Result};
pub use session::{
    FormSession, Location, LocationPatch, OfferDetails, OfferDetailsPatch, SessionPatch,
};
pub use step::{StepPlan, WizardStep};
pub use submission::{OfferSubmitter, SimulatedSubmitter, SubmissionWorker};
pub use types::{FormField, IncomeSource, ResidenceType, VehicleType};
pub use validation::{ValidationReport, format_currency, format_phone_number};
