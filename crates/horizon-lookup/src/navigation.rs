//! Keyboard navigation state machine for the suggestion list.
//!
//! The [`Navigator`] owns the [`SuggestionModel`] and decides what each key
//! or pointer event means. It performs no I/O: it reports what happened and
//! the controller carries out the side effects (highlighting rows, writing the
//! committed value into the control).

use horizon_lookup_core::logging::targets;

use crate::control::ControlId;
use crate::events::Key;
use crate::suggestion::{Suggestion, SuggestionModel};

/// Visibility of the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// No suggestions are shown.
    #[default]
    Hidden,
    /// Suggestions are shown for a control.
    Visible {
        /// The control the suggestions belong to.
        origin: ControlId,
        /// Caret offset recorded when the list was populated.
        caret: usize,
    },
}

/// A request to write a suggestion into its control.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRequest {
    /// The control to write into.
    pub origin: ControlId,
    /// Caret offset recorded when the list was populated.
    pub caret: usize,
    /// The chosen suggestion.
    pub suggestion: Suggestion,
}

/// Outcome of a key-down.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Nothing changed.
    Ignored,
    /// The selection moved to this index.
    Moved(usize),
    /// The selection was reset to this index; the list stays visible.
    SelectionReset(usize),
    /// The selected suggestion is to be committed. The list is now hidden.
    Commit(CommitRequest),
}

impl KeyOutcome {
    /// Whether the host's default action for the key must be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Moved(_) | Self::Commit(_))
    }
}

/// The suggestion list's state machine.
#[derive(Debug, Default)]
pub struct Navigator {
    state: NavigationState,
    model: SuggestionModel,
    /// Key whose key-down was consumed; its key-up must not re-query.
    swallow_key_up: Option<Key>,
}

impl Navigator {
    /// Create a hidden navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Whether suggestions are shown.
    pub fn is_visible(&self) -> bool {
        matches!(self.state, NavigationState::Visible { .. })
    }

    /// Whether suggestions are shown for `control`.
    pub fn is_visible_for(&self, control: ControlId) -> bool {
        matches!(self.state, NavigationState::Visible { origin, .. } if origin == control)
    }

    /// The suggestion model.
    pub fn model(&self) -> &SuggestionModel {
        &self.model
    }

    /// Show `items` for `origin`, selecting the first.
    ///
    /// An empty list hides instead. Returns whether the list is visible.
    pub fn populate(&mut self, origin: ControlId, caret: usize, items: Vec<Suggestion>) -> bool {
        if items.is_empty() {
            self.hide();
            return false;
        }

        tracing::trace!(target: targets::NAVIGATION, ?origin, caret, count = items.len(), "showing suggestions");
        self.model.replace(items);
        self.state = NavigationState::Visible { origin, caret };
        true
    }

    /// Hide the list and drop its items.
    pub fn hide(&mut self) {
        if self.is_visible() {
            tracing::trace!(target: targets::NAVIGATION, "hiding suggestions");
        }
        self.state = NavigationState::Hidden;
        self.model.clear();
    }

    /// Handle a key-down on `control`.
    pub fn key_down(&mut self, control: ControlId, key: Key) -> KeyOutcome {
        let visible = self.is_visible_for(control);

        let outcome = match key {
            Key::ArrowDown if visible => {
                self.model.move_next();
                KeyOutcome::Moved(self.model.selected_index())
            }
            Key::ArrowUp if visible => {
                self.model.move_previous();
                KeyOutcome::Moved(self.model.selected_index())
            }
            key if key.is_commit() && visible => match self.take_commit(None) {
                Some(request) => KeyOutcome::Commit(request),
                None => KeyOutcome::Ignored,
            },
            Key::Backspace if visible => {
                self.model.reset();
                KeyOutcome::SelectionReset(self.model.selected_index())
            }
            _ => KeyOutcome::Ignored,
        };

        if outcome.prevents_default() {
            self.swallow_key_up = Some(key);
        }
        if outcome != KeyOutcome::Ignored {
            tracing::debug!(target: targets::NAVIGATION, ?key, ?outcome, "key handled");
        }
        outcome
    }

    /// Handle a key-up. Returns whether the list should be re-queried.
    pub fn key_up(&mut self, key: Key) -> bool {
        if self.swallow_key_up == Some(key) {
            self.swallow_key_up = None;
            return false;
        }
        true
    }

    /// Handle a pointer-down on item `index` of the list shown for `control`.
    pub fn pointer_down(&mut self, control: ControlId, index: usize) -> Option<CommitRequest> {
        if !self.is_visible_for(control) {
            tracing::debug!(target: targets::NAVIGATION, ?control, index, "pointer-down without visible suggestions");
            return None;
        }
        self.take_commit(Some(index))
    }

    /// Handle loss of focus.
    pub fn blur(&mut self) {
        self.swallow_key_up = None;
        self.hide();
    }

    /// Hide and hand out the selected (or given) item for committing.
    fn take_commit(&mut self, index: Option<usize>) -> Option<CommitRequest> {
        let NavigationState::Visible { origin, caret } = self.state else {
            return None;
        };
        let index = index.unwrap_or(self.model.selected_index());
        let suggestion = self.model.get(index)?.clone();

        self.hide();
        Some(CommitRequest {
            origin,
            caret,
            suggestion,
        })
    }
}
