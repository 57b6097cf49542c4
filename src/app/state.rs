//! Application state definitions
//!
//! Everything the renderer needs to draw a frame. The form answers live in
//! the [`FormSession`]; the rest is presentation state (focus, highlighted
//! card, overlays).

use crate::input;
use crate::session::FormSession;
use crate::step::WizardStep;
use crate::types::{FormField, VehicleType};
use crate::validation::ValidationReport;

/// Row of the "any vehicle" shortcut, below the vehicle cards
pub const ANY_VEHICLE_ROW: usize = VehicleType::CARDS.len();

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Answers and current step
    pub session: FormSession,
    /// Inline errors for the current step
    pub errors: ValidationReport,
    /// Index of the focused field on form steps
    pub focus: usize,
    /// Highlighted row on the vehicle step
    pub vehicle_selection: usize,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Offer submission in flight
    pub submitting: bool,
    /// Status message for user feedback
    pub status_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FormSession::default())
    }
}

impl AppState {
    pub fn new(session: FormSession) -> Self {
        Self {
            session,
            errors: ValidationReport::new(),
            focus: 0,
            vehicle_selection: 0,
            help_visible: false,
            submitting: false,
            status_message: String::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.session.current_step()
    }

    /// Field with keyboard focus, if the current step is a form
    pub fn focused_field(&self) -> Option<FormField> {
        input::fields_for(self.current_step())
            .get(self.focus)
            .map(|spec| spec.field)
    }

    /// Vehicle the highlighted row stands for
    pub fn highlighted_vehicle(&self) -> VehicleType {
        VehicleType::CARDS
            .get(self.vehicle_selection)
            .copied()
            .unwrap_or(VehicleType::Any)
    }

    /// Reset presentation state after the step changed
    pub fn enter_step(&mut self) {
        self.focus = 0;
        self.errors = ValidationReport::new();
        self.status_message.clear();
        if self.current_step() == WizardStep::Vehicle {
            self.vehicle_selection = match self.session.vehicle_type() {
                Some(VehicleType::Any) => ANY_VEHICLE_ROW,
                Some(chosen) => VehicleType::CARDS
                    .iter()
                    .position(|v| *v == chosen)
                    .unwrap_or(0),
                None => 0,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPatch;

    #[test]
    fn test_default_state() {
        let state = AppState::default();
        assert_eq!(state.current_step(), WizardStep::Budget);
        assert!(state.errors.is_valid());
        assert!(!state.help_visible);
        assert!(!state.submitting);
        assert_eq!(state.focused_field(), None);
    }

    #[test]
    fn test_vehicle_preselected_on_return() {
        let session = FormSession::default()
            .set_state(SessionPatch::vehicle_type(VehicleType::Suv))
            .next_step();
        let mut state = AppState::new(session);
        state.enter_step();
        assert_eq!(state.vehicle_selection, 2);
        assert_eq!(state.highlighted_vehicle(), VehicleType::Suv);
    }

    #[test]
    fn test_any_vehicle_row() {
        let mut state = AppState::default();
        state.vehicle_selection = ANY_VEHICLE_ROW;
        assert_eq!(state.highlighted_vehicle(), VehicleType::Any);
    }

    #[test]
    fn test_focused_field_on_form_step() {
        let session = FormSession::default().next_step().next_step();
        let mut state = AppState::new(session);
        state.focus = 4;
        assert_eq!(state.focused_field(), Some(FormField::Phone));
    }
}
