//! Ordered item list shown by the widget and its per-item correctness marks.

use serde::{Deserialize, Serialize};
use shared::domain::{normalize_item_text, Position};
use tracing::warn;

use crate::error::ControllerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    text: String,
    marked_incorrect: bool,
}

impl Item {
    pub fn new(text: &str) -> Self {
        Self {
            text: normalize_item_text(text),
            marked_incorrect: false,
        }
    }

    pub fn with_mark(text: &str, marked_incorrect: bool) -> Self {
        Self {
            marked_incorrect,
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_marked_incorrect(&self) -> bool {
        self.marked_incorrect
    }
}

/// Items in displayed order. A position is the item's index in this order,
/// so positions are always contiguous from zero. The length never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    items: Vec<Item>,
}

impl ListState {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            items: texts
                .into_iter()
                .map(|text| Item::new(text.as_ref()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Payload snapshot for the grading call.
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }

    pub fn marks(&self) -> Vec<bool> {
        self.items.iter().map(|item| item.marked_incorrect).collect()
    }

    pub fn has_marks(&self) -> bool {
        self.items.iter().any(|item| item.marked_incorrect)
    }

    pub fn check_position(&self, position: Position) -> Result<(), ControllerError> {
        if position.index() < self.items.len() {
            Ok(())
        } else {
            Err(ControllerError::PositionOutOfRange {
                position: position.index(),
                len: self.items.len(),
            })
        }
    }

    /// Moves the item at `from` so it ends up at `to`, shifting the items in
    /// between. Returns whether the order changed.
    pub fn move_item(&mut self, from: Position, to: Position) -> Result<bool, ControllerError> {
        self.check_position(from)?;
        self.check_position(to)?;
        if from == to {
            return Ok(false);
        }
        let item = self.items.remove(from.index());
        self.items.insert(to.index(), item);
        Ok(true)
    }

    pub fn clear_marks(&mut self) {
        for item in &mut self.items {
            item.marked_incorrect = false;
        }
    }

    /// Marks exactly the items whose slot differs from the slot the grader
    /// expects for them. Slots the grader did not report on end up unmarked.
    pub fn apply_expected_positions(&mut self, expected: &[Position]) {
        if expected.len() != self.items.len() {
            warn!(
                expected_len = expected.len(),
                item_count = self.items.len(),
                "grading state length does not match item count"
            );
        }
        for (index, item) in self.items.iter_mut().enumerate() {
            item.marked_incorrect = expected
                .get(index)
                .is_some_and(|expected| expected.index() != index);
        }
    }
}

#[cfg(test)]
#[path = "tests/list_state_tests.rs"]
mod tests;
