//! Centralized theme and styling for the TUI
//!
//! This module provides a single source of truth for all colors, styles,
//! and visual constants used by the wizard screens.
//!
//! # Usage
//! ```rust
//! use leadform::theme::{Colors, StepStatus, Styles, Theme};
//! use ratatui::style::Style;
//!
//! // Use color constants
//! let style = Style::default().fg(Colors::PRIMARY);
//!
//! // Use pre-built styles
//! let title_style = Styles::title();
//!
//! // Use semantic styles
//! let current = Theme::step_style(StepStatus::Current);
//! ```

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Gauge/progress bar background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    // -------------------------------------------------------------------------
    // Accent Colors (branding, emphasis)
    // -------------------------------------------------------------------------

    /// Brand accent - borders, titles, the active step
    pub const PRIMARY: Color = Color::LightRed;

    /// Secondary accent - key hints, amounts
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;

    pub const WARNING: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    /// Focused field border
    pub const BORDER_ACTIVE: Color = Color::LightRed;

    /// Unfocused field border
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Selected item highlight
    pub const SELECTED_BG: Color = Color::LightRed;

    /// Selected item text (for contrast on the highlight)
    pub const SELECTED_FG: Color = Color::Black;

    /// Unselected list item
    pub const UNSELECTED: Color = Color::Gray;

    /// Progress bar fill
    pub const PROGRESS: Color = Color::LightRed;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Step Indicator Colors
    // -------------------------------------------------------------------------

    /// Step currently shown
    pub const STEP_ACTIVE: Color = Color::LightRed;

    /// Step already passed
    pub const STEP_COMPLETE: Color = Color::Green;

    /// Step not yet reached
    pub const STEP_PENDING: Color = Color::Gray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Muted text (placeholders, fine print)
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Secondary text (descriptions)
    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Large emphasised amount (budget display)
    pub fn amount() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    /// Selected/highlighted item
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Unselected list item
    pub fn unselected() -> Style {
        Style::default().fg(Colors::UNSELECTED)
    }

    /// Label of the focused field
    pub fn focused() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    /// Progress bar style
    pub fn progress() -> Style {
        Style::default()
            .fg(Colors::PROGRESS)
            .bg(Colors::BG_GAUGE)
    }

    /// Key name in the nav bar
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Navigation hint (keybindings)
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Where a step sits relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    Current,
    Pending,
}

impl StepStatus {
    /// Status of step `number` when the wizard is on `current`
    pub fn of(number: u8, current: u8) -> Self {
        match number.cmp(&current) {
            std::cmp::Ordering::Less => Self::Complete,
            std::cmp::Ordering::Equal => Self::Current,
            std::cmp::Ordering::Greater => Self::Pending,
        }
    }
}

/// Theme context providing semantic style lookups
pub struct Theme;

impl Theme {
    /// Style for a step indicator entry
    pub fn step_style(status: StepStatus) -> Style {
        match status {
            StepStatus::Complete => Style::default().fg(Colors::STEP_COMPLETE),
            StepStatus::Current => Style::default()
                .fg(Colors::STEP_ACTIVE)
                .add_modifier(Modifier::BOLD),
            StepStatus::Pending => Style::default().fg(Colors::STEP_PENDING),
        }
    }

    /// Border style for a field box
    pub fn field_border(focused: bool, has_error: bool) -> Style {
        if has_error {
            Styles::error()
        } else if focused {
            Styles::border_active()
        } else {
            Styles::border_inactive()
        }
    }
}
