//! Case-insensitive record matching.
//!
//! ```
//! use horizon_lookup::matcher::{MatchMode, filter};
//! use horizon_lookup::record::records_from_value;
//! use serde_json::json;
//!
//! let records = records_from_value(json!([{"sailnos": "1234"}, {"sailnos": "512"}])).unwrap();
//! let fields = ["sailnos"];
//!
//! assert_eq!(filter("12", &records, "sailnos", &fields, MatchMode::Contains).len(), 2);
//! assert_eq!(filter("12", &records, "sailnos", &fields, MatchMode::PrefixOnly).len(), 1);
//! ```

use crate::record::{Record, RecordSet};
use crate::suggestion::Suggestion;

/// Where the query has to occur in the match field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The query may occur anywhere in the field.
    #[default]
    Contains,
    /// The field must start with the query.
    PrefixOnly,
}

impl MatchMode {
    /// Whether `haystack` matches `needle` in this mode. Both are expected to
    /// be lowercased already.
    fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Contains => haystack.contains(needle),
            Self::PrefixOnly => haystack.starts_with(needle),
        }
    }
}

/// Everything a [`LookupModel`] needs to answer a query.
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions<'a> {
    /// Field compared against the query.
    pub match_field: &'a str,
    /// Fields each suggestion is projected onto, in order.
    pub return_fields: &'a [String],
    /// Where the query has to occur.
    pub mode: MatchMode,
}

/// Trait for providing lookup suggestions.
///
/// Implement this trait to answer queries from something other than an
/// in-memory record list.
pub trait LookupModel: Send + Sync {
    /// Get the suggestions matching `query`, in record order.
    fn lookup(&self, query: &str, options: &MatchOptions<'_>) -> Vec<Suggestion>;

    /// Get the total number of records in the model (before filtering).
    ///
    /// Returns `None` if the count is unknown or expensive to compute.
    fn count(&self) -> Option<usize> {
        None
    }
}

/// Filter `records` by `query` and project the survivors onto
/// `return_fields`.
///
/// The query is trimmed, then compared case-insensitively against the string
/// form of each record's `match_field`. An empty query matches every record.
pub fn filter<S: AsRef<str>>(
    query: &str,
    records: &[Record],
    match_field: &str,
    return_fields: &[S],
    mode: MatchMode,
) -> Vec<Suggestion> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| mode.matches(&record.field_string(match_field).to_lowercase(), &needle))
        .map(|record| Suggestion::from_record(record, return_fields))
        .collect()
}

/// A lookup model backed by a record set snapshot.
///
/// The snapshot is replaced wholesale; matching never mutates it.
#[derive(Debug, Clone)]
pub struct RecordListModel {
    records: RecordSet,
}

impl RecordListModel {
    /// Create a model over the given records.
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }

    /// Create an empty model.
    pub fn empty() -> Self {
        Self {
            records: RecordSet::from(Vec::new()),
        }
    }

    /// The current snapshot.
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Replace the snapshot.
    pub fn set_records(&mut self, records: RecordSet) {
        self.records = records;
    }
}

impl LookupModel for RecordListModel {
    fn lookup(&self, query: &str, options: &MatchOptions<'_>) -> Vec<Suggestion> {
        filter(
            query,
            &self.records,
            options.match_field,
            options.return_fields,
            options.mode,
        )
    }

    fn count(&self) -> Option<usize> {
        Some(self.records.len())
    }
}

impl Default for RecordListModel {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Record>> for RecordListModel {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records.into())
    }
}
