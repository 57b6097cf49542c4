//! Application module
//!
//! Contains the event loop, key dispatch and the glue between the form
//! session and the submission worker.
//!
//! # Module Structure
//! - `state` - Application state (AppState)
//! - Main module - App struct and event loop

mod state;

pub use state::{ANY_VEHICLE_ROW, AppState};

use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config::LeadFormConfig;
use crate::error::{LeadFormError, Result};
use crate::input::{self, InputKind};
use crate::session::{BUDGET_STEP, FormSession, LocationPatch, OfferDetailsPatch, SessionPatch};
use crate::step::WizardStep;
use crate::submission::{OfferSubmitter, SubmissionWorker};
use crate::types::{FormField, ResidenceType};
use crate::ui::UiRenderer;
use crate::validation::SUBMIT_ERROR_MESSAGE;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const PROCESSING_MESSAGE: &str = "Processing...";

/// Main application struct
pub struct App {
    state: AppState,
    ui_renderer: UiRenderer,
    /// Keybinding context for dispatch, nav bar and help
    keybinding_context: KeybindingContext,
    /// Background offer submission
    submissions: SubmissionWorker,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &LeadFormConfig, submitter: Arc<dyn OfferSubmitter>) -> Self {
        info!(
            "Creating new App instance ({} steps, budget {})",
            config.step_plan().step_count(),
            config.default_budget
        );
        let session = FormSession::with_budget(config.step_plan(), config.default_budget);

        Self {
            state: AppState::new(session),
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            submissions: SubmissionWorker::new(submitter),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &FormSession {
        &self.state.session
    }

    pub fn keybinding_context(&self) -> &KeybindingContext {
        &self.keybinding_context
    }

    /// Toggle help overlay visibility
    pub fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_submission();

            terminal
                .draw(|f| {
                    self.ui_renderer
                        .render(f, &self.state, &self.keybinding_context);
                })
                .map_err(|e| LeadFormError::terminal(format!("Failed to draw frame: {}", e)))?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    // Windows reports releases too
                    if key_event.kind == KeyEventKind::Press && self.handle_key_event(key_event) {
                        break;
                    }
                }
            }
        }

        info!("Leaving main loop on step {}", self.state.session.step());
        Ok(())
    }

    /// Apply the outcome of a finished submission, if there is one
    pub fn poll_submission(&mut self) {
        let Some(outcome) = self.submissions.poll() else {
            return;
        };
        self.state.submitting = false;

        match outcome {
            Ok(()) => {
                self.state.session = self.state.session.next_step();
                self.state.enter_step();
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                self.state.status_message.clear();
                self.state.errors.insert(FormField::Submit, SUBMIT_ERROR_MESSAGE);
            }
        }
    }

    /// Handle keyboard input events. Returns `true` when the user quits.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        // Any key dismisses the help overlay
        if self.state.help_visible {
            self.state.help_visible = false;
            return false;
        }

        let step = self.state.current_step();
        let action = self.keybinding_context.resolve(step, &key_event);

        if self.state.submitting {
            // Only quitting and help while the request is out
            match action {
                Some(KeyAction::Quit) => return true,
                Some(KeyAction::Help) => self.toggle_help(),
                _ => debug!("Ignoring {:?} while submitting", key_event.code),
            }
            return false;
        }

        match action {
            Some(KeyAction::Quit) => return true,
            Some(KeyAction::Help) => self.toggle_help(),
            Some(KeyAction::Back) => self.go_back(),
            Some(KeyAction::NavigateUp) => self.move_highlight(step, false),
            Some(KeyAction::NavigateDown) => self.move_highlight(step, true),
            Some(KeyAction::Decrease) => self.adjust(step, false),
            Some(KeyAction::Increase) => self.adjust(step, true),
            Some(KeyAction::Select) => self.select(step),
            Some(KeyAction::Submit) => self.submit_form(step),
            None => self.edit_focused(&key_event),
        }
        false
    }

    fn advance(&mut self) {
        self.state.session = self.state.session.next_step();
        self.state.enter_step();
        info!("Moved to step {} ({})", self.state.session.step(), self.state.current_step());
    }

    fn go_back(&mut self) {
        if !self.state.current_step().can_go_back() {
            return;
        }
        self.state.session = self.state.session.prev_step();
        self.state.enter_step();
        info!("Back to step {} ({})", self.state.session.step(), self.state.current_step());
    }

    fn move_highlight(&mut self, step: WizardStep, down: bool) {
        let (cursor, len) = match step {
            WizardStep::Vehicle => (&mut self.state.vehicle_selection, ANY_VEHICLE_ROW + 1),
            WizardStep::Location | WizardStep::GetOffers => {
                (&mut self.state.focus, input::fields_for(step).len())
            }
            _ => return,
        };
        *cursor = if down {
            (*cursor + 1).min(len - 1)
        } else {
            cursor.saturating_sub(1)
        };
    }

    fn adjust(&mut self, step: WizardStep, up: bool) {
        match step {
            WizardStep::Budget => {
                let delta = i64::from(BUDGET_STEP);
                self.state.session = self
                    .state
                    .session
                    .adjust_budget(if up { delta } else { -delta });
            }
            WizardStep::GetOffers => self.cycle_choice(up),
            _ => {}
        }
    }

    /// Flip the rent/own toggle or cycle the income source under focus
    fn cycle_choice(&mut self, forward: bool) {
        let Some(spec) = input::fields_for(WizardStep::GetOffers).get(self.state.focus) else {
            return;
        };
        let details = self.state.session.offer_details();
        let patch = match spec.kind {
            InputKind::Toggle => OfferDetailsPatch {
                residence_type: Some(match details.residence_type {
                    Some(current) => current.toggled(),
                    None if forward => ResidenceType::Own,
                    None => ResidenceType::Rent,
                }),
                ..OfferDetailsPatch::default()
            },
            InputKind::Select => OfferDetailsPatch {
                income_source: Some(input::cycle_income_source(details.income_source, forward)),
                ..OfferDetailsPatch::default()
            },
            InputKind::Text(_) => return,
        };
        self.state.session = self.state.session.update_offer_details(patch);
        self.state.errors.clear(spec.field);
    }

    fn select(&mut self, step: WizardStep) {
        match step {
            WizardStep::Budget => {
                debug!("Budget chosen: {}", self.state.session.budget());
                self.advance();
            }
            WizardStep::Vehicle => {
                let vehicle = self.state.highlighted_vehicle();
                debug!("Vehicle chosen: {}", vehicle);
                self.state.session = self
                    .state
                    .session
                    .set_state(SessionPatch::vehicle_type(vehicle));
                self.advance();
            }
            WizardStep::Location | WizardStep::GetOffers => {
                if self.state.focus + 1 < input::fields_for(step).len() {
                    self.state.focus += 1;
                } else {
                    self.submit_form(step);
                }
            }
            WizardStep::ThankYou => {}
        }
    }

    /// Validate the current form and move on (or start the submission)
    fn submit_form(&mut self, step: WizardStep) {
        let report = match step {
            WizardStep::Location => self.state.session.validate_location(),
            WizardStep::GetOffers => self.state.session.validate_offer_details(),
            _ => return,
        };

        if !report.is_valid() {
            info!("{} has {} invalid field(s)", step, report.len());
            if let Some(first) = report.fields().next() {
                if let Some(index) = input::fields_for(step).iter().position(|s| s.field == first) {
                    self.state.focus = index;
                }
            }
            self.state.errors = report;
            return;
        }

        if step == WizardStep::GetOffers {
            self.state.errors.clear(FormField::Submit);
            if self.submissions.start(self.state.session.clone()) {
                self.state.submitting = true;
                self.state.status_message = PROCESSING_MESSAGE.to_string();
            }
        } else {
            self.advance();
        }
    }

    /// Route an unbound key to the focused text field
    fn edit_focused(&mut self, key_event: &KeyEvent) {
        let step = self.state.current_step();
        let Some(spec) = input::fields_for(step).get(self.state.focus) else {
            return;
        };
        let InputKind::Text(formatter) = spec.kind else {
            return;
        };

        let session = &self.state.session;
        let current = match step {
            WizardStep::Location => session.location().field(spec.field),
            _ => session.offer_details().text_field(spec.field),
        }
        .unwrap_or_default();

        let Some(value) = input::edit_text(current, key_event, formatter) else {
            return;
        };

        let updated = match step {
            WizardStep::Location => {
                LocationPatch::single(spec.field, value).map(|p| session.update_location(p))
            }
            _ => OfferDetailsPatch::text(spec.field, value).map(|p| session.update_offer_details(p)),
        };
        if let Some(updated) = updated {
            self.state.session = updated;
            self.state.errors.clear(error_key(spec.field));
        }
    }
}

/// Field whose message an edit to `field` clears. Years and months share
/// one message, reported on the years field.
fn error_key(field: FormField) -> FormField {
    match field {
        FormField::ResidenceMonths => FormField::ResidenceYears,
        FormField::IncomeMonths => FormField::IncomeYears,
        other => other,
    }
}
