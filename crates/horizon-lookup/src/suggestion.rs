//! Suggestions and the selection model behind the suggestion list.

use serde_json::Value;

use crate::format::{FormattedText, format_spans};
use crate::record::{Record, value_to_string};

/// A record projected onto the configured return fields.
///
/// Fields keep the configured order. A field the record lacks is present
/// here with no value and displays as the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestion {
    fields: Vec<(String, Option<Value>)>,
}

impl Suggestion {
    /// Project `record` onto `return_fields`.
    pub fn from_record<S: AsRef<str>>(record: &Record, return_fields: &[S]) -> Self {
        let fields = return_fields
            .iter()
            .map(|name| {
                let name = name.as_ref();
                (name.to_string(), record.get(name).cloned())
            })
            .collect();
        Self { fields }
    }

    /// Get the value of a return field.
    ///
    /// Returns `None` both for fields that are not return fields and for
    /// return fields the record did not have.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Iterate over `(field name, value)` pairs in return-field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Field names in return-field order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Display strings of the fields, in return-field order.
    pub fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(_, value)| value.as_ref().map(value_to_string).unwrap_or_default())
            .collect()
    }

    /// Number of projected fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the suggestion has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the suggestion with a positional template.
    pub fn render(&self, template: &str) -> FormattedText {
        format_spans(template, &self.values())
    }
}

/// The current suggestion list and its selection.
///
/// A non-empty list always has exactly one selected entry; next/previous
/// wrap around at either end.
#[derive(Debug, Clone, Default)]
pub struct SuggestionModel {
    items: Vec<Suggestion>,
    selected: usize,
}

impl SuggestionModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items and select the first one.
    pub fn replace(&mut self, items: Vec<Suggestion>) {
        self.items = items;
        self.selected = 0;
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    /// Select the next item, wrapping to the first.
    pub fn move_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    /// Select the previous item, wrapping to the last.
    pub fn move_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        self.selected = (self.selected + len - 1) % len;
    }

    /// Select the first item.
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// The selected item, if any.
    pub fn current(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }

    /// The selected index.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Get an item by index.
    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.items.get(index)
    }

    /// All items.
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
