//! Horizon Lookup - inline lookup autocomplete for text inputs.
//!
//! As the user types, the word under the caret is checked against a
//! configurable pattern. Qualifying words are matched against an in-memory
//! record set, the matches are shown on a presentation surface, and the
//! keyboard (or pointer) picks one. The chosen record is formatted with a
//! positional template and spliced into the text in place of the word.
//!
//! The pieces, from the bottom up:
//!
//! - [`format`]: positional `{0}` templates
//! - [`text`]: the word under the caret and replacing it
//! - [`matcher`]: case-insensitive record matching
//! - [`suggestion`]: projected records and the selection model
//! - [`navigation`]: the keyboard navigation state machine
//! - [`controller`]: wiring it all to a host control, a surface and a
//!   record source
//!
//! # Example
//!
//! ```no_run
//! use horizon_lookup::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LookupOptions::from_file("lookup.toml")?.into_config()?;
//!     let surface = HeadlessSurface::new();
//!     let mut controller = LookupController::new(config, surface, HttpDataSource::new());
//!
//!     let mut input = TextBuffer::new();
//!     controller.attach(&input);
//!
//!     // In the host's event loop:
//!     controller.process_pending();
//!     controller.handle_event(&mut input, LookupEvent::KeyUp(Key::Other(49)));
//!     Ok(())
//! }
//! ```

pub use horizon_lookup_core::{ConnectionGuard, ConnectionId, Signal, logging};

/// Networking: the HTTP client and shared runtime.
pub mod net {
    pub use horizon_lookup_net::*;
}

pub mod config;
pub mod control;
pub mod controller;
mod error;
pub mod events;
pub mod format;
pub mod matcher;
pub mod navigation;
pub mod record;
pub mod source;
pub mod suggestion;
pub mod surface;
pub mod text;

pub use config::{LookupConfig, LookupOptions};
pub use control::{ControlId, TextBuffer, TextControl};
pub use controller::{Commit, LookupController, RefreshHandle, RefreshResult, RefreshStatus};
pub use error::{LookupError, Result};
pub use events::{EventResponse, Key, LookupEvent};
pub use matcher::{LookupModel, MatchMode, RecordListModel};
pub use record::{Record, RecordSet};
pub use source::{DataSource, HttpDataSource, StaticSource, fetch_records};
pub use suggestion::{Suggestion, SuggestionModel};
pub use surface::{HeadlessSurface, PresentationSurface, SuggestionRow};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{LookupConfig, LookupOptions};
    pub use crate::control::{ControlId, TextBuffer, TextControl};
    pub use crate::controller::{Commit, LookupController, RefreshResult, RefreshStatus};
    pub use crate::events::{EventResponse, Key, LookupEvent};
    pub use crate::matcher::MatchMode;
    pub use crate::record::{Record, RecordSet, records_from_value};
    pub use crate::source::{DataSource, HttpDataSource, StaticSource};
    pub use crate::surface::{HeadlessSurface, PresentationSurface, SuggestionRow};
    pub use crate::{LookupError, Signal};
}
