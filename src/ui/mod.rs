//! User interface module
//!
//! Draws one frame from the application state. Rendering never changes
//! state; everything it shows comes from [`AppState`].
//!
//! # Module Structure
//! - `header` - Banner, step indicator, progress bar, nav bar, help overlay
//! - `screens` - One screen per wizard step

pub mod header;
pub mod screens;

use crate::app::AppState;
use crate::components::keybindings::KeybindingContext;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    Frame,
};

/// UI renderer for the wizard
#[derive(Debug, Default)]
pub struct UiRenderer;

impl UiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a full frame
    pub fn render(&self, f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Banner
                Constraint::Length(1), // Step indicator
                Constraint::Length(1), // Progress bar
                Constraint::Min(1),    // Step content
                Constraint::Length(1), // Navigation bar
            ])
            .split(f.area());

        header::render_header(f, chunks[0]);
        header::render_progress(f, state, chunks[1], chunks[2]);
        screens::render_step(
            f,
            state,
            chunks[3].inner(Margin {
                horizontal: 2,
                vertical: 1,
            }),
        );
        header::render_nav_bar(f, state, keybinding_ctx, chunks[4]);

        if state.help_visible {
            header::render_help_overlay(f, state, keybinding_ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FormSession;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &AppState) -> String {
        draw_sized(state, 100, 40)
    }

    fn draw_sized(state: &AppState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let ctx = KeybindingContext::new();
        terminal
            .draw(|f| UiRenderer::new().render(f, state, &ctx))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_every_step() {
        let mut session = FormSession::default();
        let expected = [
            "What's Your Budget",
            "What are you looking for?",
            "You're Almost Done!",
            "Your 30 Seconds away",
            "Thank You!",
        ];
        for title in expected {
            let screen = draw(&AppState::new(session.clone()));
            assert!(screen.contains(title), "missing {:?}", title);
            session = session.next_step();
        }
    }

    #[test]
    fn test_budget_screen_shows_amount() {
        let screen = draw(&AppState::default());
        assert!(screen.contains("$400 / Month"));
        assert!(screen.contains("Step 1 of 5"));
    }

    #[test]
    fn test_help_overlay_drawn_on_top() {
        let mut state = AppState::default();
        state.help_visible = true;
        let screen = draw(&state);
        assert!(screen.contains("Press any key to close"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(10, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let ctx = KeybindingContext::new();
        let state = AppState::default();
        terminal
            .draw(|f| UiRenderer::new().render(f, &state, &ctx))
            .unwrap();
    }

    /// Every field and error of a form step can be brought into view on a
    /// standard 80x24 terminal by moving focus to it
    fn assert_each_error_reachable(session: FormSession) {
        let mut state = AppState::new(session);
        state.errors = match state.current_step() {
            crate::step::WizardStep::Location => state.session.validate_location(),
            _ => state.session.validate_offer_details(),
        };
        assert!(!state.errors.is_valid());

        let fields = crate::input::fields_for(state.current_step());
        for (i, spec) in fields.iter().enumerate() {
            state.focus = i;
            let screen = draw_sized(&state, 80, 24);
            assert!(screen.contains(spec.label), "{:?} label hidden", spec.field);
            if let Some(message) = state.errors.get(spec.field) {
                assert!(screen.contains(message), "{:?} error hidden", spec.field);
            }
        }
    }

    #[test]
    fn test_offer_errors_reachable_at_80x24() {
        let session = FormSession::default().next_step().next_step().next_step();
        assert_each_error_reachable(session);
    }

    #[test]
    fn test_location_errors_reachable_at_80x24() {
        let session = FormSession::default().next_step().next_step();
        assert_each_error_reachable(session);
    }

    #[test]
    fn test_last_offer_field_visible_with_all_errors() {
        let session = FormSession::default().next_step().next_step().next_step();
        let mut state = AppState::new(session);
        state.errors = state.session.validate_offer_details();
        state.focus = crate::input::OFFER_FIELDS.len() - 1;

        let screen = draw_sized(&state, 80, 24);
        assert!(screen.contains("Monthly Income"));
        assert!(screen.contains("Monthly income is required"));
        assert!(screen.contains("more above"));
    }

    #[test]
    fn test_hidden_errors_are_announced() {
        let session = FormSession::default().next_step().next_step().next_step();
        let mut state = AppState::new(session);
        state.errors = state.session.validate_offer_details();

        let screen = draw_sized(&state, 80, 24);
        assert!(screen.contains("Birth date is required"));
        assert!(screen.contains("more below"));
    }

    #[test]
    fn test_vehicle_screen_offers_any_vehicle() {
        let state = AppState::new(FormSession::default().next_step());
        let screen = draw(&state);
        assert!(screen.contains(crate::types::VehicleType::Any.title()));
    }
}
