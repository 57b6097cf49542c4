//! Help overlay component
//!
//! Displays context-sensitive help in a centered window over the current step.

use super::keybindings::{HelpSection, KeybindingContext};
use crate::step::WizardStep;
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const FOOTER: &str = "Press any key to close";

/// Help overlay component
pub struct HelpOverlay {
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    /// Create a new help overlay for the given step
    pub fn new(step: WizardStep, keybinding_ctx: &KeybindingContext) -> Self {
        let sections = keybinding_ctx.get_help_content(step);
        Self {
            content: Self::build_content(&sections, step),
        }
    }

    /// Build the help content from sections
    fn build_content(sections: &[HelpSection], step: WizardStep) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Current: ", Style::default().fg(Colors::FG_MUTED)),
            Span::styled(step.title().to_string(), Style::default().fg(Colors::SECONDARY)),
        ]));
        lines.push(Line::from(""));

        for section in sections {
            lines.push(Line::from(vec![Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )]));

            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{:<10}", key),
                        Style::default()
                            .fg(Colors::PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description.clone(), Styles::text()),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(FOOTER, Styles::text_muted())));
        lines
    }

    /// Lines shown in the overlay
    pub fn lines(&self) -> &[Line<'static>] {
        &self.content
    }

    /// Render the help overlay centered in `parent`
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        let height = (self.content.len() as u16 + 2).min(parent.height);
        let area = centered_rect(60, height, parent);

        let block = Block::default()
            .title(" Help ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active());

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(self.content.clone())
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}

/// Rectangle of `percent_x` width and `height` rows centered in `r`
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
