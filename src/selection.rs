//! The set of categories the user has chosen to filter by.

use std::collections::HashSet;

/// Summary shown on the dropdown trigger when nothing is selected.
pub const EMPTY_SUMMARY: &str = "Select categories...";

/// Set of selected category labels.
///
/// Uniqueness is by string equality; order is irrelevant. Starts empty and
/// is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.selected.contains(category)
    }

    /// Set membership of `category` explicitly. Returns true if it changed.
    pub fn set(&mut self, category: &str, checked: bool) -> bool {
        if checked {
            self.selected.insert(category.to_string())
        } else {
            self.selected.remove(category)
        }
    }

    /// Flip membership of `category`. Returns the new checked state.
    pub fn toggle(&mut self, category: &str) -> bool {
        let checked = !self.contains(category);
        self.set(category, checked);
        checked
    }

    /// Add every category in `categories`.
    pub fn select_all<'a, I>(&mut self, categories: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.selected
            .extend(categories.into_iter().map(str::to_string));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// True if any label in `labels` is selected.
    pub fn matches_any<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().any(|label| self.contains(label.as_ref()))
    }

    /// Human-readable summary for the dropdown trigger.
    ///
    /// - empty: "Select categories..."
    /// - one: the category name
    /// - more: "<n> categories selected"
    pub fn summary(&self) -> String {
        match self.selected.len() {
            0 => EMPTY_SUMMARY.to_string(),
            1 => self.selected.iter().next().cloned().unwrap_or_default(),
            n => format!("{} categories selected", n),
        }
    }
}
