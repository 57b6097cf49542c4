//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change with the current wizard step.
//! The same registry drives key dispatch, the nav bar and the help overlay, so
//! what the user sees is always what the keys do.

use crate::step::WizardStep;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    Decrease,
    Increase,
    Select,
    Submit,
    Back,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Whether a key event triggers this binding.
    ///
    /// Unmodified bindings ignore Shift (BackTab arrives with Shift set) but
    /// never fire for Ctrl/Alt chords.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.code != self.key {
            return false;
        }
        if self.modifiers.is_empty() {
            !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        } else {
            event.modifiers.contains(self.modifiers)
        }
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Step-specific keybindings
    step_bindings: HashMap<WizardStep, Vec<Keybinding>>,
    /// Global keybindings (available on every step)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            step_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for all steps
    fn register_defaults(&mut self) {
        // Text steps cannot use plain letters, so globals are chords/function keys
        self.global_bindings = vec![
            Keybinding::new(KeyCode::F(1), KeyAction::Help, "F1", "Help"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        self.step_bindings.insert(
            WizardStep::Budget,
            vec![
                Keybinding::new(KeyCode::Left, KeyAction::Decrease, "Left", "Lower budget"),
                Keybinding::new(KeyCode::Right, KeyAction::Increase, "Right", "Raise budget"),
                Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", "Continue"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.step_bindings.insert(
            WizardStep::Vehicle,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Navigate up"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Navigate down"),
                Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", "Choose vehicle"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Go back"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        let form_bindings = vec![
            Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Previous field"),
            Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Next field"),
            Keybinding::new(KeyCode::BackTab, KeyAction::NavigateUp, "S-Tab", "Previous field"),
            Keybinding::new(KeyCode::Tab, KeyAction::NavigateDown, "Tab", "Next field"),
            Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", "Next field"),
            Keybinding::with_modifiers(
                KeyCode::Char('s'),
                KeyModifiers::CONTROL,
                KeyAction::Submit,
                "Ctrl+S",
                "Submit",
            ),
            Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Go back"),
        ];

        self.step_bindings
            .insert(WizardStep::Location, form_bindings.clone());

        let mut offer_bindings = form_bindings;
        offer_bindings.push(Keybinding::new(
            KeyCode::Left,
            KeyAction::Decrease,
            "Left",
            "Previous choice",
        ));
        offer_bindings.push(Keybinding::new(
            KeyCode::Right,
            KeyAction::Increase,
            "Right",
            "Next choice",
        ));
        self.step_bindings
            .insert(WizardStep::GetOffers, offer_bindings);

        self.step_bindings.insert(
            WizardStep::ThankYou,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Quit, "Enter", "Finish"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );
    }

    /// Get keybindings for a specific step (includes global bindings)
    pub fn get_bindings(&self, step: WizardStep) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(step_bindings) = self.step_bindings.get(&step) {
            bindings.extend(step_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());

        bindings
    }

    /// Action bound to a key event on the given step, if any.
    ///
    /// Unbound keys fall through to text entry on the form steps.
    pub fn resolve(&self, step: WizardStep, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(step)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, step: WizardStep) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(step);

        let priority_actions = match step {
            WizardStep::Budget => vec![
                KeyAction::Decrease,
                KeyAction::Increase,
                KeyAction::Select,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            WizardStep::Vehicle => vec![
                KeyAction::NavigateUp,
                KeyAction::NavigateDown,
                KeyAction::Select,
                KeyAction::Back,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            WizardStep::Location => vec![
                KeyAction::NavigateUp,
                KeyAction::NavigateDown,
                KeyAction::Select,
                KeyAction::Submit,
                KeyAction::Back,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            WizardStep::GetOffers => vec![
                KeyAction::NavigateUp,
                KeyAction::NavigateDown,
                KeyAction::Decrease,
                KeyAction::Increase,
                KeyAction::Submit,
                KeyAction::Back,
            ],
            WizardStep::ThankYou => vec![KeyAction::Select, KeyAction::Quit],
        };

        // Combine paired keys into single items for cleaner display
        let mut items: Vec<NavBarItem> = Vec::new();
        let mut has_nav = false;
        let mut has_adjust = false;

        for action in priority_actions {
            let is_nav = matches!(action, KeyAction::NavigateUp | KeyAction::NavigateDown);
            let is_adjust = matches!(action, KeyAction::Decrease | KeyAction::Increase);
            if (is_nav && has_nav) || (is_adjust && has_adjust) {
                continue;
            }

            if let Some(binding) = bindings.iter().find(|b| b.action == action) {
                if is_nav {
                    items.push(NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Navigate".to_string(),
                    });
                    has_nav = true;
                } else if is_adjust {
                    items.push(NavBarItem {
                        key_display: "Left/Right".to_string(),
                        action_label: "Adjust".to_string(),
                    });
                    has_adjust = true;
                } else {
                    items.push(NavBarItem {
                        key_display: binding.display.clone(),
                        action_label: binding.description.clone(),
                    });
                }
            }
        }

        items
    }

    /// Get full help content for a step (for help overlay)
    pub fn get_help_content(&self, step: WizardStep) -> Vec<HelpSection> {
        let groups: [(&str, fn(KeyAction) -> bool); 3] = [
            ("Navigation", |a| {
                matches!(
                    a,
                    KeyAction::NavigateUp
                        | KeyAction::NavigateDown
                        | KeyAction::Decrease
                        | KeyAction::Increase
                )
            }),
            ("Actions", |a| matches!(a, KeyAction::Select | KeyAction::Submit)),
            ("General", |a| {
                matches!(a, KeyAction::Back | KeyAction::Help | KeyAction::Quit)
            }),
        ];

        let bindings = self.get_bindings(step);
        groups
            .iter()
            .filter_map(|(title, belongs)| {
                let items: Vec<(String, String)> = bindings
                    .iter()
                    .filter(|b| belongs(b.action))
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect();
                (!items.is_empty()).then(|| HelpSection {
                    title: title.to_string(),
                    items,
                })
            })
            .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_every_step_has_bindings() {
        let ctx = KeybindingContext::new();
        for step in [
            WizardStep::Budget,
            WizardStep::Vehicle,
            WizardStep::Location,
            WizardStep::GetOffers,
            WizardStep::ThankYou,
        ] {
            assert!(!ctx.get_nav_items(step).is_empty(), "{:?} has no nav items", step);
            assert!(!ctx.get_help_content(step).is_empty());
        }
    }

    #[test]
    fn test_letters_are_free_on_form_steps() {
        let ctx = KeybindingContext::new();
        assert_eq!(ctx.resolve(WizardStep::Location, &key(KeyCode::Char('q'))), None);
        assert_eq!(ctx.resolve(WizardStep::GetOffers, &key(KeyCode::Char('?'))), None);
        assert_eq!(
            ctx.resolve(WizardStep::Budget, &key(KeyCode::Char('q'))),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(ctx.resolve(WizardStep::Location, &event), Some(KeyAction::Quit));
        assert_eq!(ctx.resolve(WizardStep::Budget, &event), Some(KeyAction::Quit));
    }

    #[test]
    fn test_backtab_with_shift_navigates_up() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            ctx.resolve(WizardStep::Location, &event),
            Some(KeyAction::NavigateUp)
        );
    }

    #[test]
    fn test_left_right_only_adjust_where_bound() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.resolve(WizardStep::GetOffers, &key(KeyCode::Right)),
            Some(KeyAction::Increase)
        );
        assert_eq!(ctx.resolve(WizardStep::Location, &key(KeyCode::Right)), None);
    }

    #[test]
    fn test_enter_moves_on_and_ctrl_s_submits() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.resolve(WizardStep::Location, &key(KeyCode::Enter)),
            Some(KeyAction::Select)
        );
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(ctx.resolve(WizardStep::GetOffers, &event), Some(KeyAction::Submit));
        assert_eq!(ctx.resolve(WizardStep::Budget, &event), None);
    }

    #[test]
    fn test_nav_items_combine_pairs() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(WizardStep::GetOffers);
        assert_eq!(items.iter().filter(|i| i.action_label == "Navigate").count(), 1);
        assert_eq!(items.iter().filter(|i| i.action_label == "Adjust").count(), 1);
    }
}
