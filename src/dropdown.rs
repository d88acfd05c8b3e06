//! Multi-select category dropdown.
//!
//! Two states, `Closed` (initial) and `Open`. The checked state of every
//! option is read straight from the owned [`SelectionState`], so an
//! option's checkbox and its "selected" marker can never disagree.

use crate::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// One row of the option list as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionView<'a> {
    pub category: &'a str,
    pub checked: bool,
    pub highlighted: bool,
}

#[derive(Debug, Default)]
pub struct Dropdown {
    state: DropdownState,
    options: Vec<String>,
    selection: SelectionState,
    cursor: usize,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the option list. Duplicates are dropped, first wins.
    ///
    /// Selected categories that are no longer offered are deselected;
    /// returns whether that changed the selection.
    pub fn set_options(&mut self, categories: Vec<String>) -> bool {
        let mut options: Vec<String> = Vec::with_capacity(categories.len());
        for category in categories {
            if !options.contains(&category) {
                options.push(category);
            }
        }

        let stale: Vec<String> = self
            .selection
            .iter()
            .filter(|c| !options.iter().any(|o| o.as_str() == *c))
            .map(str::to_string)
            .collect();
        let pruned = !stale.is_empty();
        for category in stale {
            self.selection.set(&category, false);
        }

        self.options = options;
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
        pruned
    }

    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Trigger activated: closed→open, open→closed.
    pub fn click_trigger(&mut self) {
        self.state = match self.state {
            DropdownState::Closed => DropdownState::Open,
            DropdownState::Open => DropdownState::Closed,
        };
        tracing::debug!(state = ?self.state, "Dropdown toggled");
    }

    /// A click landed outside the dropdown's bounds. Returns true if that
    /// closed it.
    pub fn click_outside(&mut self) -> bool {
        self.close()
    }

    /// Returns true if the dropdown was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = DropdownState::Closed;
        was_open
    }

    /// Toggle the option at `index`. Returns its new checked state, or
    /// `None` if there is no such option.
    pub fn toggle_option(&mut self, index: usize) -> Option<bool> {
        let category = self.options.get(index)?;
        let checked = self.selection.toggle(category);
        self.cursor = index;
        tracing::debug!(category = %category, checked, "Category toggled");
        Some(checked)
    }

    pub fn toggle_highlighted(&mut self) -> Option<bool> {
        self.toggle_option(self.cursor)
    }

    /// Check every option.
    pub fn select_all(&mut self) {
        self.selection
            .select_all(self.options.iter().map(String::as_str));
        tracing::debug!(selected = self.selection.len(), "Selected all categories");
    }

    /// Uncheck every option.
    pub fn clear_all(&mut self) {
        self.selection.clear();
        tracing::debug!("Cleared category selection");
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Trigger label.
    pub fn summary(&self) -> String {
        self.selection.summary()
    }

    pub fn options(&self) -> impl Iterator<Item = OptionView<'_>> {
        self.options.iter().enumerate().map(|(i, category)| OptionView {
            category,
            checked: self.selection.contains(category),
            highlighted: i == self.cursor,
        })
    }
}
