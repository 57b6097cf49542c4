//! Header and common widget rendering
//!
//! This module contains the title banner, the step indicator, the progress
//! bar and the navigation bar shared by every step.

use crate::app::AppState;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::{KeybindingContext, NavBarItem};
use crate::step::StepPlan;
use crate::theme::{StepStatus, Styles, Theme};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

const BANNER: &str = "Get Your Car Approved";
const TAGLINE: &str = "Pre-qualified offers with no impact to your credit score";

/// Render the title banner
pub fn render_header(f: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let header = Paragraph::new(vec![
        Line::from(Span::styled(BANNER, Styles::title())),
        Line::from(Span::styled(TAGLINE, Styles::text_muted())),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Styles::border_inactive()),
    )
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// Step indicator line: every step of the plan, numbered
pub fn step_indicator_line(plan: StepPlan, current: u8) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, step) in plan.steps().iter().enumerate() {
        let number = i as u8 + 1;
        if i > 0 {
            spans.push(Span::styled("  ›  ", Styles::text_muted()));
        }
        let status = StepStatus::of(number, current);
        let mark = match status {
            StepStatus::Complete => "✓".to_string(),
            _ => number.to_string(),
        };
        spans.push(Span::styled(
            format!("{} {}", mark, step.label()),
            Theme::step_style(status),
        ));
    }
    Line::from(spans)
}

/// Render the step indicator and the progress bar below it
pub fn render_progress(f: &mut Frame, state: &AppState, indicator: Rect, bar: Rect) {
    let session = &state.session;
    f.render_widget(
        Paragraph::new(step_indicator_line(session.plan(), session.step()))
            .alignment(Alignment::Center),
        indicator,
    );

    let gauge = Gauge::default()
        .gauge_style(Styles::progress())
        .label(format!("Step {} of {}", session.step(), session.step_count()))
        .ratio(session.progress());
    f.render_widget(gauge, bar);
}

/// Nav bar line built from the step's key hints
pub fn nav_bar_line(items: &[NavBarItem]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Styles::nav_hint()));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::nav_key()));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }
    Line::from(spans)
}

/// Render the navigation bar
pub fn render_nav_bar(
    f: &mut Frame,
    state: &AppState,
    keybinding_ctx: &KeybindingContext,
    area: Rect,
) {
    let items = keybinding_ctx.get_nav_items(state.current_step());
    f.render_widget(
        Paragraph::new(nav_bar_line(&items)).alignment(Alignment::Center),
        area,
    );
}

/// Render the help overlay
pub fn render_help_overlay(f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
    let help_overlay = HelpOverlay::new(state.current_step(), keybinding_ctx);
    help_overlay.render(f, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_indicator_lists_every_step() {
        let line = step_indicator_line(StepPlan::Standard, 2);
        assert_eq!(plain(&line), "✓ Budget  ›  2 Vehicle  ›  3 Location  ›  4 Done");

        let line = step_indicator_line(StepPlan::WithOfferDetails, 1);
        assert!(plain(&line).contains("4 Get Offers"));
    }

    #[test]
    fn test_nav_bar_line() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(crate::step::WizardStep::ThankYou);
        let text = plain(&nav_bar_line(&items));
        assert!(text.contains("Enter Finish"));
    }
}
