//! Step screen rendering
//!
//! One function per wizard step. Each draws into the content area handed to
//! it by [`super::UiRenderer`].

use crate::app::{ANY_VEHICLE_ROW, AppState};
use crate::input::{self, FieldSpec, InputKind};
use crate::session::{MAX_BUDGET, MIN_BUDGET};
use crate::step::WizardStep;
use crate::theme::{Colors, Styles, Theme};
use crate::types::{FormField, ResidenceType, VehicleType};
use crate::validation::format_budget;
use std::ops::Range;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Middle label under the budget slider
const BUDGET_MID_LABEL: u32 = 500;

/// Situations the lenders accept, shown under the budget slider
const QUALIFICATIONS: [&str; 8] = [
    "Bad credit",
    "$0 Down",
    "Repossessions",
    "No credit",
    "Bankruptcy",
    "Low payment",
    "Collections",
    "Late payments",
];

const CONSENT_NOTICE: &str = "By submitting, I confirm my agreement to the Terms of Use and \
     Privacy Policy and my consent to obtaining credit reports about me to facilitate my \
     application for a car loan.";

/// Render the screen for the current step
pub fn render_step(f: &mut Frame, state: &AppState, area: Rect) {
    match state.current_step() {
        WizardStep::Budget => render_budget(f, state, area),
        WizardStep::Vehicle => render_vehicle(f, state, area),
        WizardStep::Location => render_location(f, state, area),
        WizardStep::GetOffers => render_get_offers(f, state, area),
        WizardStep::ThankYou => render_thank_you(f, area),
    }
}

fn render_budget(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + amount
            Constraint::Length(3), // Slider
            Constraint::Length(2), // Tagline
            Constraint::Min(4),    // Qualifications
        ])
        .split(area);

    let budget = state.session.budget();
    let title = Paragraph::new(vec![
        Line::from(Span::styled("What's Your Budget", Styles::title())),
        Line::from(""),
        Line::from(Span::styled(format!("{} / Month", format_budget(budget)), Styles::amount())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let slider_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(chunks[1]);
    let slider = LineGauge::default()
        .filled_style(Style::default().fg(Colors::PRIMARY))
        .unfilled_style(Styles::text_muted())
        .label("")
        .ratio(budget_ratio(budget));
    f.render_widget(slider, slider_area[1]);

    let labels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(slider_area[2]);
    let marks = [
        (MIN_BUDGET, Alignment::Left),
        (BUDGET_MID_LABEL, Alignment::Center),
        (MAX_BUDGET, Alignment::Right),
    ];
    for ((amount, alignment), rect) in marks.into_iter().zip(labels.iter()) {
        f.render_widget(
            Paragraph::new(format_budget(amount))
                .style(Styles::text_muted())
                .alignment(alignment),
            *rect,
        );
    }

    f.render_widget(
        Paragraph::new("No obligation. No commitments. Only FREE offers.")
            .style(Styles::text_secondary())
            .alignment(Alignment::Center),
        chunks[2],
    );

    let items: Vec<Line> = QUALIFICATIONS
        .chunks(2)
        .map(|pair| {
            let mut spans = Vec::new();
            for text in pair {
                spans.push(Span::styled("  ✓ ", Styles::success()));
                spans.push(Span::styled(format!("{:<20}", text), Styles::text()));
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(
        Paragraph::new(items).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Styles::border_inactive()),
        ),
        chunks[3],
    );
}

/// Slider fill for a budget, 0.0 at the minimum and 1.0 at the maximum
pub fn budget_ratio(budget: u32) -> f64 {
    let clamped = budget.clamp(MIN_BUDGET, MAX_BUDGET);
    f64::from(clamped - MIN_BUDGET) / f64::from(MAX_BUDGET - MIN_BUDGET)
}

fn render_vehicle(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("What are you looking for?", Styles::title())),
            Line::from(Span::styled(
                "Select the type of vehicle you're interested in",
                Styles::text_secondary(),
            )),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let chosen = state.session.vehicle_type();
    let mut items: Vec<ListItem> = VehicleType::CARDS
        .iter()
        .enumerate()
        .map(|(i, vehicle)| {
            let highlighted = i == state.vehicle_selection;
            let marker = if chosen == Some(*vehicle) { "● " } else { "  " };
            let title_style = if highlighted { Styles::selected() } else { Styles::text() };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Styles::success()),
                    Span::styled(format!(" {} ", vehicle.title()), title_style),
                ]),
                Line::from(Span::styled(
                    format!("    {}", vehicle.description()),
                    Styles::text_muted(),
                )),
            ])
        })
        .collect();

    let any_style = if state.vehicle_selection == ANY_VEHICLE_ROW {
        Styles::selected()
    } else {
        Styles::amount()
    };
    items.push(ListItem::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}  ", VehicleType::Any.title()), any_style)),
    ]));

    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_inactive()),
        ),
        chunks[1],
    );
}

fn render_location(f: &mut Frame, state: &AppState, area: Rect) {
    let intro = vec![
        Line::from(Span::styled("You're Almost Done!", Styles::title())),
        Line::from(Span::styled("Where are you located?", Styles::text())),
        Line::from(Span::styled(
            format!(
                "Let us know your address so we can find the best vehicles in your area \
                 that match your budget of {}/month",
                format_budget(state.session.budget())
            ),
            Styles::text_secondary(),
        )),
    ];
    render_form(f, state, area, intro, None);
}

fn render_get_offers(f: &mut Frame, state: &AppState, area: Rect) {
    let intro = vec![
        Line::from(Span::styled("Your 30 Seconds away", Styles::title())),
        Line::from(Span::styled(
            "We will send your offers as soon as you complete this final step",
            Styles::text_secondary(),
        )),
    ];
    render_form(f, state, area, intro, Some(CONSENT_NOTICE));
}

/// Intro, field list and footer (status or submission error) of a form step.
///
/// The field list scrolls so the focused field and its error stay in view.
fn render_form(
    f: &mut Frame,
    state: &AppState,
    area: Rect,
    intro: Vec<Line<'static>>,
    notice: Option<&str>,
) {
    let intro_height = wrapped_height(&intro, area.width).saturating_add(1);
    let notice_height = notice.map_or(0, |n| wrapped_height(&[Line::raw(n)], area.width));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(intro_height),
            Constraint::Min(3),
            Constraint::Length(notice_height.saturating_add(1)),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(intro)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let visible = usize::from(chunks[1].height.saturating_sub(2));
    let offset = scroll_offset(focused_rows(state), visible);
    let (above, below) = hidden_errors(state, offset, visible);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_inactive());
    if above > 0 {
        block = block.title_top(
            Line::styled(format!(" ↑ {} more above ", above), Styles::error()).right_aligned(),
        );
    }
    if below > 0 {
        block = block.title_bottom(
            Line::styled(format!(" ↓ {} more below ", below), Styles::error()).right_aligned(),
        );
    }
    let fields = Paragraph::new(form_lines(state))
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    f.render_widget(fields, chunks[1]);

    let mut footer = Vec::new();
    if let Some(message) = state.errors.get(FormField::Submit) {
        footer.push(Line::from(Span::styled(message.to_string(), Styles::error())));
    } else if !state.status_message.is_empty() {
        footer.push(Line::from(Span::styled(
            state.status_message.clone(),
            Styles::warning().add_modifier(Modifier::BOLD),
        )));
    } else {
        footer.push(Line::from(""));
    }
    if let Some(notice) = notice {
        footer.push(Line::from(Span::styled(notice.to_string(), Styles::text_muted())));
    }
    f.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[2],
    );
}

/// Rows needed by `lines` when wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Rows of the field list taken by the focused field and its error
pub fn focused_rows(state: &AppState) -> Range<usize> {
    let mut row = 0;
    for (i, spec) in input::fields_for(state.current_step()).iter().enumerate() {
        let height = 1 + usize::from(state.errors.get(spec.field).is_some());
        if i == state.focus {
            return row..row + height;
        }
        row += height;
    }
    row..row
}

/// First row to draw so that `focus` fits in a window of `visible` rows
pub fn scroll_offset(focus: Range<usize>, visible: usize) -> usize {
    focus.end.saturating_sub(visible).min(focus.start)
}

/// Error rows above and below the window starting at `offset`
fn hidden_errors(state: &AppState, offset: usize, visible: usize) -> (usize, usize) {
    let mut row = 0;
    let (mut above, mut below) = (0, 0);
    for spec in input::fields_for(state.current_step()) {
        row += 1;
        if state.errors.get(spec.field).is_some() {
            if row < offset {
                above += 1;
            } else if row >= offset + visible {
                below += 1;
            }
            row += 1;
        }
    }
    (above, below)
}

/// Lines of the field list: label and value per field, the error under it
pub fn form_lines(state: &AppState) -> Vec<Line<'static>> {
    let step = state.current_step();
    let mut lines = Vec::new();

    for (i, spec) in input::fields_for(step).iter().enumerate() {
        let focused = i == state.focus;
        let error = state.errors.get(spec.field);

        let label_style = if focused {
            Styles::focused()
        } else if error.is_some() {
            Styles::error()
        } else {
            Styles::text_secondary()
        };
        let cursor = if focused { "▸ " } else { "  " };

        let mut spans = vec![
            Span::styled(cursor, Styles::focused()),
            Span::styled(format!("{:<26}", spec.label), label_style),
        ];
        spans.extend(value_spans(state, spec, focused));
        lines.push(Line::from(spans));

        if let Some(message) = error {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(message.to_string(), Styles::error()),
            ]));
        }
    }
    lines
}

fn value_spans(state: &AppState, spec: &FieldSpec, focused: bool) -> Vec<Span<'static>> {
    let details = state.session.offer_details();
    let border = Theme::field_border(focused, state.errors.get(spec.field).is_some());

    match spec.kind {
        InputKind::Text(_) => {
            let value = match state.current_step() {
                WizardStep::Location => state.session.location().field(spec.field),
                _ => details.text_field(spec.field),
            }
            .unwrap_or_default();

            let mut spans = vec![Span::styled("[ ", border)];
            if value.is_empty() && !focused {
                spans.push(Span::styled(spec.placeholder.to_string(), Styles::text_muted()));
            } else {
                spans.push(Span::styled(value.to_string(), Styles::text()));
            }
            if focused {
                spans.push(Span::styled("▏", Styles::focused()));
            }
            spans.push(Span::styled(" ]", border));
            spans
        }
        InputKind::Toggle => [ResidenceType::Rent, ResidenceType::Own]
            .into_iter()
            .flat_map(|option| {
                let style = if details.residence_type == Some(option) {
                    Styles::selected()
                } else {
                    Styles::unselected()
                };
                let label = match option {
                    ResidenceType::Rent => " Rent ",
                    ResidenceType::Own => " Own ",
                };
                [Span::styled(label, style), Span::raw("  ")]
            })
            .collect(),
        InputKind::Select => match details.income_source {
            Some(source) => vec![
                Span::styled("< ", border),
                Span::styled(source.label(), Styles::text()),
                Span::styled(" >", border),
            ],
            None => vec![Span::styled(spec.placeholder, Styles::text_muted())],
        },
    }
}

fn render_thank_you(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✔",
            Styles::success().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Thank You!", Styles::title())),
        Line::from(""),
        Line::from(Span::styled(
            "A complete copy of your application has been assigned to a",
            Styles::text(),
        )),
        Line::from(vec![
            Span::styled(
                "Credit Specialist",
                Styles::text().add_modifier(Modifier::BOLD),
            ),
            Span::styled(" who will contact you shortly", Styles::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "You will receive a confirmation email with your application details.",
            Styles::text_muted(),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
