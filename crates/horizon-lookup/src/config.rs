//! Lookup configuration.
//!
//! [`LookupOptions`] is the serializable form, with camelCase keys such as
//! `lookupRegex` and `propertiesToReturn`. [`LookupConfig`] is the validated,
//! immutable form a controller runs with.
//!
//! ```
//! use horizon_lookup::config::LookupOptions;
//!
//! let options = LookupOptions::from_json(r#"{
//!     "lookupRegex": "^[A-Z]{2}[0-9]+$",
//!     "propertyToMatch": "code",
//!     "propertiesToReturn": ["code", "name"],
//!     "resultFormat": "{1} [{0}]"
//! }"#).unwrap();
//!
//! let config = options.into_config().unwrap();
//! assert!(config.match_pattern().is_match("GB123"));
//! ```

use std::path::Path;

use horizon_lookup_core::logging::targets;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Result};
use crate::matcher::{MatchMode, MatchOptions};

/// Default token pattern: one to six digits.
pub const DEFAULT_LOOKUP_REGEX: &str = "[0-9]{1,6}";
/// Default match field.
pub const DEFAULT_MATCH_FIELD: &str = "sailnos";
/// Default return fields.
pub const DEFAULT_RETURN_FIELDS: [&str; 3] = ["Classtype", "sailnos", "sailor"];
/// Default result template.
pub const DEFAULT_RESULT_FORMAT: &str = "{0} {1} ({2})";

/// Serializable lookup options.
///
/// Every key is optional; missing keys take the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupOptions {
    /// Pattern the word under the caret must match to trigger a lookup.
    pub lookup_regex: String,
    /// Where to load records from.
    pub lookup_url: Option<String>,
    /// Host selector for the controls to bind; informational for hosts.
    pub textbox_selector: Option<String>,
    /// Record field the query is compared against.
    pub property_to_match: String,
    /// Record fields shown and inserted, in template order.
    pub properties_to_return: Vec<String>,
    /// Template for the inserted text.
    pub result_format: String,
    /// Payload property holding the record array. Empty means none.
    pub data_property: Option<String>,
    /// Match only at the start of the field.
    pub match_only_beginning_of_word: bool,
    /// Message to show when a lookup finds nothing.
    pub no_matches_text: Option<String>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            lookup_regex: DEFAULT_LOOKUP_REGEX.to_string(),
            lookup_url: None,
            textbox_selector: None,
            property_to_match: DEFAULT_MATCH_FIELD.to_string(),
            properties_to_return: DEFAULT_RETURN_FIELDS.iter().map(|s| s.to_string()).collect(),
            result_format: DEFAULT_RESULT_FORMAT.to_string(),
            data_property: None,
            match_only_beginning_of_word: false,
            no_matches_text: None,
        }
    }
}

impl LookupOptions {
    /// Parse options from JSON.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| LookupError::ConfigParse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    /// Parse options from TOML.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| LookupError::ConfigParse {
            format: "TOML",
            message: e.to_string(),
        })
    }

    /// Load options from a `.json` or `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| LookupError::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading lookup options");
        match extension.as_deref() {
            Some("toml") => Self::from_toml(&source),
            Some("json") => Self::from_json(&source),
            other => Err(LookupError::ConfigParse {
                format: "unknown",
                message: format!(
                    "unsupported configuration file extension {:?} for '{}'",
                    other.unwrap_or(""),
                    path.display()
                ),
            }),
        }
    }

    /// Validate the options and build a [`LookupConfig`].
    pub fn into_config(self) -> Result<LookupConfig> {
        let match_pattern = compile_pattern(&self.lookup_regex)?;
        Ok(LookupConfig {
            match_pattern,
            match_field: self.property_to_match,
            return_fields: self.properties_to_return,
            result_format: self.result_format,
            match_mode: if self.match_only_beginning_of_word {
                MatchMode::PrefixOnly
            } else {
                MatchMode::Contains
            },
            data_property: self.data_property.filter(|p| !p.is_empty()),
            lookup_url: self.lookup_url.filter(|u| !u.is_empty()),
            textbox_selector: self.textbox_selector,
            no_matches_text: self.no_matches_text,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| LookupError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Validated lookup configuration.
///
/// The token pattern is tested unanchored: a word qualifies when the pattern
/// matches anywhere in it. Anchor the pattern (`^...$`) to require a whole
/// word match.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    match_pattern: Regex,
    match_field: String,
    return_fields: Vec<String>,
    result_format: String,
    match_mode: MatchMode,
    data_property: Option<String>,
    lookup_url: Option<String>,
    textbox_selector: Option<String>,
    no_matches_text: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            match_pattern: Regex::new(DEFAULT_LOOKUP_REGEX).expect("default lookup pattern is valid"),
            match_field: DEFAULT_MATCH_FIELD.to_string(),
            return_fields: DEFAULT_RETURN_FIELDS.iter().map(|s| s.to_string()).collect(),
            result_format: DEFAULT_RESULT_FORMAT.to_string(),
            match_mode: MatchMode::Contains,
            data_property: None,
            lookup_url: None,
            textbox_selector: None,
            no_matches_text: None,
        }
    }
}

impl LookupConfig {
    /// Create a configuration with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Pattern the word under the caret must match.
    pub fn match_pattern(&self) -> &Regex {
        &self.match_pattern
    }

    /// Record field compared against the query.
    pub fn match_field(&self) -> &str {
        &self.match_field
    }

    /// Fields each suggestion is projected onto.
    pub fn return_fields(&self) -> &[String] {
        &self.return_fields
    }

    /// Template for the inserted text.
    pub fn result_format(&self) -> &str {
        &self.result_format
    }

    /// Where the query has to occur in the match field.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Payload property holding the record array.
    pub fn data_property(&self) -> Option<&str> {
        self.data_property.as_deref()
    }

    /// Where records are loaded from.
    pub fn lookup_url(&self) -> Option<&str> {
        self.lookup_url.as_deref()
    }

    /// Host selector for the controls to bind.
    pub fn textbox_selector(&self) -> Option<&str> {
        self.textbox_selector.as_deref()
    }

    /// Message shown when a lookup finds nothing.
    pub fn no_matches_text(&self) -> Option<&str> {
        self.no_matches_text.as_deref()
    }

    /// Whether `word` should trigger a lookup.
    pub fn qualifies(&self, word: &str) -> bool {
        self.match_pattern.is_match(word)
    }

    /// Matching parameters for a [`LookupModel`](crate::matcher::LookupModel).
    pub fn match_options(&self) -> MatchOptions<'_> {
        MatchOptions {
            match_field: &self.match_field,
            return_fields: &self.return_fields,
            mode: self.match_mode,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the token pattern.
    pub fn with_match_pattern(mut self, pattern: &str) -> Result<Self> {
        self.match_pattern = compile_pattern(pattern)?;
        Ok(self)
    }

    /// Set the match field.
    pub fn with_match_field(mut self, field: impl Into<String>) -> Self {
        self.match_field = field.into();
        self
    }

    /// Set the return fields.
    pub fn with_return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the result template.
    pub fn with_result_format(mut self, template: impl Into<String>) -> Self {
        self.result_format = template.into();
        self
    }

    /// Set the match mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Set the payload property holding the record array.
    pub fn with_data_property(mut self, property: impl Into<String>) -> Self {
        self.data_property = Some(property.into()).filter(|p| !p.is_empty());
        self
    }

    /// Set the URL records are loaded from.
    pub fn with_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_url = Some(url.into()).filter(|u| !u.is_empty());
        self
    }

    /// Set the host selector.
    pub fn with_textbox_selector(mut self, selector: impl Into<String>) -> Self {
        self.textbox_selector = Some(selector.into());
        self
    }

    /// Set the message shown when a lookup finds nothing.
    pub fn with_no_matches_text(mut self, text: impl Into<String>) -> Self {
        self.no_matches_text = Some(text.into());
        self
    }
}

impl TryFrom<LookupOptions> for LookupConfig {
    type Error = LookupError;

    fn try_from(options: LookupOptions) -> Result<Self> {
        options.into_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LookupOptions::default().into_config().unwrap();
        assert_eq!(config.match_field(), "sailnos");
        assert_eq!(config.return_fields(), ["Classtype", "sailnos", "sailor"]);
        assert_eq!(config.result_format(), "{0} {1} ({2})");
        assert_eq!(config.match_mode(), MatchMode::Contains);
        assert_eq!(config.data_property(), None);
        assert_eq!(config.lookup_url(), None);
        assert!(config.qualifies("1234"));
        assert!(!config.qualifies("abc"));
    }

    #[test]
    fn test_default_pattern_is_unanchored() {
        let config = LookupConfig::default();
        assert!(config.qualifies("GBR1234"));
    }

    #[test]
    fn test_json_uses_camel_case_option_names() {
        let options = LookupOptions::from_json(
            r#"{
                "lookupUrl": "https://example.com/sailors.json",
                "dataProperty": "data",
                "matchOnlyBeginningOfWord": true,
                "noMatchesText": "No matches found."
            }"#,
        )
        .unwrap();
        let config = options.into_config().unwrap();

        assert_eq!(config.lookup_url(), Some("https://example.com/sailors.json"));
        assert_eq!(config.data_property(), Some("data"));
        assert_eq!(config.match_mode(), MatchMode::PrefixOnly);
        assert_eq!(config.no_matches_text(), Some("No matches found."));
        assert_eq!(config.match_field(), "sailnos");
    }

    #[test]
    fn test_empty_data_property_means_none() {
        let options = LookupOptions::from_json(r#"{"dataProperty": ""}"#).unwrap();
        assert_eq!(options.into_config().unwrap().data_property(), None);
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let options = LookupOptions {
            lookup_regex: "[0-9".to_string(),
            ..LookupOptions::default()
        };
        let err = options.into_config().unwrap_err();
        assert!(matches!(err, LookupError::InvalidPattern { ref pattern, .. } if pattern == "[0-9"));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = LookupOptions::from_json("{").unwrap_err();
        assert!(matches!(err, LookupError::ConfigParse { format: "JSON", .. }));
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            propertyToMatch = "code"
            propertiesToReturn = ["code", "name"]
            resultFormat = "{{1}} [{{0}}]"
            "#
        )
        .unwrap();

        let config = LookupOptions::from_file(file.path())
            .unwrap()
            .into_config()
            .unwrap();
        assert_eq!(config.match_field(), "code");
        assert_eq!(config.return_fields(), ["code", "name"]);
        assert_eq!(config.result_format(), "{1} [{0}]");
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"resultFormat": "{{0}}"}}"#).unwrap();

        let options = LookupOptions::from_file(file.path()).unwrap();
        assert_eq!(options.result_format, "{0}");
    }

    #[test]
    fn test_unknown_extension_and_missing_file() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            LookupOptions::from_file(file.path()),
            Err(LookupError::ConfigParse { .. })
        ));
        assert!(matches!(
            LookupOptions::from_file("/definitely/not/here.json"),
            Err(LookupError::Io { .. })
        ));
    }

    #[test]
    fn test_builder_methods() {
        let config = LookupConfig::new()
            .with_match_pattern("^[A-Z]+$")
            .unwrap()
            .with_match_field("code")
            .with_return_fields(["code"])
            .with_result_format("{0}!")
            .with_match_mode(MatchMode::PrefixOnly)
            .with_data_property("")
            .with_no_matches_text("nothing");

        assert!(config.qualifies("ABC"));
        assert!(!config.qualifies("AB1"));
        assert_eq!(config.data_property(), None);
        assert_eq!(config.match_options().match_field, "code");
        assert!(LookupConfig::new().with_match_pattern("(").is_err());
    }

    #[test]
    fn test_options_round_trip_keys() {
        let json = serde_json::to_value(LookupOptions::default()).unwrap();
        assert_eq!(json["lookupRegex"], "[0-9]{1,6}");
        assert_eq!(json["matchOnlyBeginningOfWord"], false);
    }
}
