//! # Selection Model
//!
//! Tracks which rendered rows are checked plus the anchor used for
//! shift-click range selection. Every full re-render replaces the row order
//! and starts again with nothing checked.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Row ids in rendered order
    rows: Vec<String>,
    checked: HashSet<String>,
    /// Most recently clicked row
    last_checked: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with a freshly rendered set of rows, all unchecked
    pub fn reset<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.rows = rows.into_iter().collect();
        self.checked.clear();
        self.last_checked = None;
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn all_checked(&self) -> bool {
        !self.rows.is_empty() && self.checked.len() == self.rows.len()
    }

    pub fn last_checked(&self) -> Option<&str> {
        self.last_checked.as_deref()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row == id)
    }

    fn set(&mut self, id: &str, checked: bool) {
        if checked {
            self.checked.insert(id.to_string());
        } else {
            self.checked.remove(id);
        }
    }

    /// Set every row to `checked`
    pub fn toggle_all(&mut self, checked: bool) {
        if checked {
            self.checked = self.rows.iter().cloned().collect();
        } else {
            self.checked.clear();
        }
    }

    /// Toggle a row, extending the change over a range when `shift_held`.
    ///
    /// With shift held and an anchor still present among the rendered rows,
    /// every row between the anchor and the clicked row (inclusive, in either
    /// direction) takes the clicked row's new state. An anchor that is no
    /// longer rendered counts as no anchor. The clicked row becomes the new
    /// anchor in every case. Clicks on unknown rows are ignored.
    pub fn row_clicked(&mut self, id: &str, shift_held: bool) {
        let Some(clicked) = self.position(id) else {
            tracing::debug!("Ignoring click on unknown row {}", id);
            return;
        };

        let new_state = !self.is_checked(id);
        self.set(id, new_state);

        let anchor = self
            .last_checked
            .as_deref()
            .and_then(|anchor| self.position(anchor));

        if let (true, Some(anchor)) = (shift_held, anchor) {
            let (start, end) = (anchor.min(clicked), anchor.max(clicked));
            let range: Vec<String> = self.rows[start..=end].to_vec();
            for row in range {
                self.set(&row, new_state);
            }
        }

        self.last_checked = Some(id.to_string());
    }

    /// Checked ids in row order, or `None` when nothing is checked
    pub fn collect_selected_ids(&self) -> Option<Vec<String>> {
        let ids: Vec<String> = self
            .rows
            .iter()
            .filter(|row| self.checked.contains(*row))
            .cloned()
            .collect();
        if ids.is_empty() {
            None
        } else {
            Some(ids)
        }
    }
}
