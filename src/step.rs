//! Wizard step plan and step counter
//!
//! The session stores its position as a plain 1-based step number. This
//! module maps those numbers onto the screens of the active [`StepPlan`] and
//! owns the clamping rules for the counter.
//!
//! # Step Flow
//!
//! ```text
//! Standard:          Budget -> Vehicle -> Location -> ThankYou
//! WithOfferDetails:  Budget -> Vehicle -> Location -> GetOffers -> ThankYou
//! ```
//!
//! `next` from the last step and `prev` from the first step are no-ops.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One screen of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Monthly payment slider.
    Budget,
    /// Vehicle category cards.
    Vehicle,
    /// Address, email, name and phone.
    Location,
    /// Birth date, residence and income history.
    GetOffers,
    /// Confirmation screen. No input beyond quitting.
    ThankYou,
}

impl WizardStep {
    /// Heading shown above the step content.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Budget => "What's your monthly budget?",
            Self::Vehicle => "What type of vehicle are you looking for?",
            Self::Location => "You're Almost Done! Where are you located?",
            Self::GetOffers => "You're 30 seconds away",
            Self::ThankYou => "Thank You!",
        }
    }

    /// Short name used by the step indicator.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Vehicle => "Vehicle",
            Self::Location => "Location",
            Self::GetOffers => "Get Offers",
            Self::ThankYou => "Done",
        }
    }

    /// Whether the user can navigate back from this screen.
    pub const fn can_go_back(self) -> bool {
        !matches!(self, Self::Budget | Self::ThankYou)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which screens make up the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepPlan {
    /// Four steps: the lead ends after contact details.
    Standard,
    /// Five steps: contact details are followed by the offer-details form.
    #[default]
    WithOfferDetails,
}

impl StepPlan {
    const STANDARD: [WizardStep; 4] = [
        WizardStep::Budget,
        WizardStep::Vehicle,
        WizardStep::Location,
        WizardStep::ThankYou,
    ];

    const WITH_OFFER_DETAILS: [WizardStep; 5] = [
        WizardStep::Budget,
        WizardStep::Vehicle,
        WizardStep::Location,
        WizardStep::GetOffers,
        WizardStep::ThankYou,
    ];

    /// Select a plan from the `collect_offer_details` switch.
    pub const fn from_offer_details(enabled: bool) -> Self {
        if enabled {
            Self::WithOfferDetails
        } else {
            Self::Standard
        }
    }

    /// All screens of the plan in order.
    pub const fn steps(self) -> &'static [WizardStep] {
        match self {
            Self::Standard => &Self::STANDARD,
            Self::WithOfferDetails => &Self::WITH_OFFER_DETAILS,
        }
    }

    /// Total number of steps (N).
    pub const fn step_count(self) -> u8 {
        self.steps().len() as u8
    }

    /// Clamp a step number into `[1, N]`.
    pub fn clamp(self, step: u8) -> u8 {
        step.clamp(1, self.step_count())
    }

    /// Step number after `step`, saturating at N.
    pub fn next(self, step: u8) -> u8 {
        self.clamp(step.saturating_add(1))
    }

    /// Step number before `step`, saturating at 1.
    pub fn prev(self, step: u8) -> u8 {
        self.clamp(step.saturating_sub(1))
    }

    /// Screen shown for a step number. Out-of-range numbers are clamped first.
    pub fn step_at(self, step: u8) -> WizardStep {
        let index = usize::from(self.clamp(step)) - 1;
        self.steps()[index]
    }

    /// 1-based number of a screen, if the plan contains it.
    pub fn number_of(self, target: WizardStep) -> Option<u8> {
        self.steps()
            .iter()
            .position(|s| *s == target)
            .map(|i| i as u8 + 1)
    }
}
