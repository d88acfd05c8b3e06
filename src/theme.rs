//! Theme system for the dashboard.
//!
//! Semantic roles map to ratatui `Style` values. [`ThemeVariant`] picks a
//! palette; [`StyleMap`] resolves role names at render time.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Cards --
    pub card_source: Style,
    pub card_date: Style,
    pub card_title: Style,
    pub card_body: Style,
    pub card_label: Style,
    pub card_label_uncategorized: Style,
    pub card_link: Style,
    pub card_selected: Style,
    pub placeholder: Style,

    // -- Header --
    pub button: Style,
    pub button_disabled: Style,
    pub loader: Style,
    pub trigger: Style,
    pub trigger_has_selection: Style,

    // -- Dropdown --
    pub option_normal: Style,
    pub option_selected: Style,
    pub option_highlighted: Style,

    // -- Stats / errors --
    pub stats_label: Style,
    pub stats_value: Style,
    pub error: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            card_source: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            card_date: Style::default().fg(Color::DarkGray),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::Gray),
            card_label: Style::default().fg(Color::Black).bg(Color::Magenta),
            card_label_uncategorized: Style::default().fg(Color::Black).bg(Color::Gray),
            card_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            card_selected: Style::default().fg(Color::Yellow),
            placeholder: Style::default().fg(Color::White),

            button: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::Gray).bg(Color::DarkGray),
            loader: Style::default().fg(Color::Yellow),
            trigger: Style::default().fg(Color::Gray),
            trigger_has_selection: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            option_normal: Style::default(),
            option_selected: Style::default().fg(Color::Magenta),
            option_highlighted: Style::default().bg(Color::DarkGray).fg(Color::White),

            stats_label: Style::default().fg(Color::DarkGray),
            stats_value: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::White).bg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            card_source: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            card_date: Style::default().fg(Color::DarkGray),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::Black),
            card_label: Style::default().fg(Color::White).bg(Color::Magenta),
            card_label_uncategorized: Style::default().fg(Color::Black).bg(Color::Gray),
            card_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            card_selected: Style::default().fg(Color::Magenta),
            placeholder: Style::default().fg(Color::Black),

            button: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::DarkGray).bg(Color::Gray),
            loader: Style::default().fg(Color::Magenta),
            trigger: Style::default().fg(Color::DarkGray),
            trigger_has_selection: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            option_normal: Style::default().fg(Color::Black),
            option_selected: Style::default().fg(Color::Magenta),
            option_highlighted: Style::default().bg(Color::Blue).fg(Color::White),

            stats_label: Style::default().fg(Color::DarkGray),
            stats_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::White).bg(Color::Red),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// Role name → `Style` lookup built from a [`ColorPalette`].
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_NAMES: [&str; 23] = [
    "card_source",
    "card_date",
    "card_title",
    "card_body",
    "card_label",
    "card_label_uncategorized",
    "card_link",
    "card_selected",
    "placeholder",
    "button",
    "button_disabled",
    "loader",
    "trigger",
    "trigger_has_selection",
    "option_normal",
    "option_selected",
    "option_highlighted",
    "stats_label",
    "stats_value",
    "error",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 23] = [
            p.card_source,
            p.card_date,
            p.card_title,
            p.card_body,
            p.card_label,
            p.card_label_uncategorized,
            p.card_link,
            p.card_selected,
            p.placeholder,
            p.button,
            p.button_disabled,
            p.loader,
            p.trigger,
            p.trigger_has_selection,
            p.option_normal,
            p.option_selected,
            p.option_highlighted,
            p.stats_label,
            p.stats_value,
            p.error,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Unknown roles resolve to `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
