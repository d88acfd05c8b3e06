//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so `[keybindings]` in config.toml can
//! rebind any action.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    GoTop,
    GoBottom,
    PageDown,
    PageUp,
    Back,
    FetchNews,
    ToggleDropdown,
    ToggleOption,
    SelectAll,
    ClearAll,
    OpenLink,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::GoTop => "Jump to first",
            Self::GoBottom => "Jump to last",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::Back => "Close dropdown / dismiss",
            Self::FetchNews => "Fetch & classify news",
            Self::ToggleDropdown => "Open/close category filter",
            Self::ToggleOption => "Toggle highlighted category",
            Self::SelectAll => "Select all categories",
            Self::ClearAll => "Clear all categories",
            Self::OpenLink => "Open article in browser",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Card list has focus.
    Global,
    /// Category dropdown is open.
    Dropdown,
}

impl Context {
    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "Dashboard",
            Self::Dropdown => "Category filter",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Space", ...
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=12).contains(&n).then_some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(KeySpec::ch(c))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to [`Context::Global`].
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Dropdown, Global};

        // === Dashboard ===
        self.bind(Global, KeySpec::ch('q'), Action::Quit);
        self.bind(Global, KeySpec::ctrl('c'), Action::Quit);

        self.bind(Global, KeySpec::ch('j'), Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Global, KeySpec::ch('k'), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Global, KeySpec::ch('g'), Action::GoTop);
        self.bind(Global, KeySpec::plain(KeyCode::Home), Action::GoTop);
        self.bind(Global, KeySpec::ch('G'), Action::GoBottom);
        self.bind(Global, KeySpec::plain(KeyCode::End), Action::GoBottom);
        self.bind(Global, KeySpec::ctrl('d'), Action::PageDown);
        self.bind(Global, KeySpec::plain(KeyCode::PageDown), Action::PageDown);
        self.bind(Global, KeySpec::ctrl('u'), Action::PageUp);
        self.bind(Global, KeySpec::plain(KeyCode::PageUp), Action::PageUp);

        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        self.bind(Global, KeySpec::ch('f'), Action::FetchNews);
        self.bind(Global, KeySpec::ch('/'), Action::ToggleDropdown);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::ToggleDropdown);

        self.bind(Global, KeySpec::ch('o'), Action::OpenLink);
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::OpenLink);

        self.bind(Global, KeySpec::ch('T'), Action::CycleTheme);
        self.bind(Global, KeySpec::ch('?'), Action::ShowHelp);

        // === Category dropdown ===
        self.bind(Dropdown, KeySpec::ch(' '), Action::ToggleOption);
        self.bind(Dropdown, KeySpec::plain(KeyCode::Enter), Action::ToggleOption);
        self.bind(Dropdown, KeySpec::ch('a'), Action::SelectAll);
        self.bind(Dropdown, KeySpec::ch('c'), Action::ClearAll);
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys are action names ("quit", "fetch_news"); values are key strings
    /// ("q", "Ctrl+r", "F5"). Returns warnings for anything unusable.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted letters arrive with SHIFT set; bindings store the plain char.
        let modifiers = match code {
            KeyCode::Char(_) => modifiers - KeyModifiers::SHIFT,
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// First key bound to `action` in `context` (falling back to Global), for
    /// status-bar hints.
    pub fn key_for(&self, action: Action, context: Context) -> Option<String> {
        let first_in = |ctx: Context| {
            self.bindings
                .iter()
                .find(|(c, _, a)| *c == ctx && *a == action)
                .map(|(_, key, _)| format_key(key))
        };
        first_in(context).or_else(|| {
            if context == Context::Global {
                None
            } else {
                first_in(Context::Global)
            }
        })
    }

    /// (context, key display string, action, description) for the help screen.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" => Some(Action::NavDown),
        "nav_up" => Some(Action::NavUp),
        "go_top" => Some(Action::GoTop),
        "go_bottom" => Some(Action::GoBottom),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "back" => Some(Action::Back),
        "fetch_news" => Some(Action::FetchNews),
        "toggle_dropdown" => Some(Action::ToggleDropdown),
        "toggle_option" => Some(Action::ToggleOption),
        "select_all" => Some(Action::SelectAll),
        "clear_all" => Some(Action::ClearAll),
        "open_link" => Some(Action::OpenLink),
        "cycle_theme" => Some(Action::CycleTheme),
        "show_help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
