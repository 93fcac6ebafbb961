//! The lookup controller.
//!
//! [`LookupController`] binds one configuration and one record set to a
//! presentation surface and any number of host text controls. The host feeds
//! it [`LookupEvent`]s from its UI thread and honors the returned
//! [`EventResponse`].
//!
//! Record loading is the only asynchronous part. A refresh fetches on the
//! tokio runtime; the result is queued and applied the next time the host
//! calls [`LookupController::process_pending`], so records and suggestion
//! state are only ever touched from the host's thread.
//!
//! # Example
//!
//! ```
//! use horizon_lookup::prelude::*;
//! use serde_json::json;
//!
//! let surface = HeadlessSurface::new();
//! let mut controller =
//!     LookupController::new(LookupConfig::default(), surface.clone(), StaticSource::empty());
//! controller.set_records(
//!     records_from_value(json!([{"Classtype": "Laser", "sailnos": "1234", "sailor": "Ann"}])).unwrap(),
//! );
//!
//! let mut input = TextBuffer::new();
//! controller.attach(&input);
//!
//! input.insert_str("boat 123");
//! controller.handle_event(&mut input, LookupEvent::KeyUp(Key::Other(51)));
//! assert_eq!(surface.row_texts(), vec!["Laser 1234 (Ann)"]);
//!
//! let response = controller.handle_event(&mut input, LookupEvent::KeyDown(Key::Enter));
//! assert!(response.prevent_default);
//! assert_eq!(input.text(), "boat Laser 1234 (Ann)");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use horizon_lookup_core::logging::targets;
use horizon_lookup_core::{Signal, TaskQueue, TaskSender};
use horizon_lookup_net::runtime;
use tokio::task::JoinHandle;

use crate::config::LookupConfig;
use crate::control::{ControlId, TextControl};
use crate::error::{LookupError, Result};
use crate::events::{EventResponse, Key, LookupEvent};
use crate::format::format;
use crate::matcher::{LookupModel, RecordListModel};
use crate::navigation::{CommitRequest, KeyOutcome, Navigator};
use crate::record::RecordSet;
use crate::source::{DataSource, fetch_records};
use crate::suggestion::Suggestion;
use crate::surface::{PresentationSurface, SuggestionRow};
use crate::text::{clamp_offset, current_word, splice_current_word};

/// A suggestion written into a control.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// The control written to.
    pub control: ControlId,
    /// The formatted text that replaced the word under the caret.
    pub replacement: String,
    /// The control's new text.
    pub text: String,
    /// The control's new caret offset, just after the replacement.
    pub caret: usize,
    /// The committed suggestion.
    pub suggestion: Suggestion,
}

/// Outcome of a refresh.
#[derive(Debug)]
pub enum RefreshStatus {
    /// The records were replaced.
    Loaded {
        /// Number of records loaded.
        count: usize,
    },
    /// Fetching or decoding failed; the previous records are kept.
    ///
    /// Reported even when a newer snapshot was applied in the meantime.
    Failed(LookupError),
    /// The fetch succeeded, but a newer snapshot was applied first; the
    /// result was discarded.
    Stale,
}

/// A finished refresh, as reported to callbacks and
/// [`LookupController::records_loaded`].
#[derive(Debug)]
pub struct RefreshResult {
    /// Sequence number of the refresh.
    pub sequence: u64,
    /// URL that was fetched.
    pub url: String,
    /// What happened.
    pub status: RefreshStatus,
}

impl RefreshResult {
    /// Whether the records were replaced.
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, RefreshStatus::Loaded { .. })
    }

    /// The error, if the refresh failed.
    pub fn error(&self) -> Option<&LookupError> {
        match &self.status {
            RefreshStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Callback invoked on the host thread when a refresh is applied.
pub type RefreshCallback = Box<dyn FnOnce(&RefreshResult)>;

/// A handle to an in-flight refresh.
#[derive(Debug)]
pub struct RefreshHandle {
    sequence: u64,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Sequence number of the refresh.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether the fetch has finished and its result is queued.
    pub fn is_fetched(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the fetch has finished and its result is queued for
    /// [`LookupController::process_pending`].
    pub async fn fetched(self) {
        if let Err(err) = self.task.await {
            tracing::warn!(target: targets::CONTROLLER, sequence = self.sequence, %err, "refresh task failed");
        }
    }
}

/// A fetched record set waiting to be applied. `outcome` is `None` when the
/// refresh task ended without producing one.
struct RefreshCompletion {
    sequence: u64,
    url: String,
    outcome: Option<Result<RecordSet>>,
}

type Inbox = Vec<RefreshCompletion>;

/// Posts a refresh's completion to the controller exactly once.
///
/// If the task panics or is cancelled before [`deliver`](Self::deliver), the
/// drop posts an empty completion so the controller can release the callback.
struct CompletionPoster {
    sequence: u64,
    url: String,
    sender: Option<TaskSender<Inbox>>,
}

impl CompletionPoster {
    fn deliver(mut self, outcome: Result<RecordSet>) {
        self.send(Some(outcome));
    }

    fn send(&mut self, outcome: Option<Result<RecordSet>>) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        let sequence = self.sequence;
        let completion = RefreshCompletion {
            sequence,
            url: std::mem::take(&mut self.url),
            outcome,
        };
        if sender.post(move |inbox: &mut Inbox| inbox.push(completion)).is_err() {
            tracing::debug!(target: targets::CONTROLLER, sequence, "controller dropped before refresh completed");
        }
    }
}

impl Drop for CompletionPoster {
    fn drop(&mut self) {
        self.send(None);
    }
}

/// Inline lookup for one or more text controls.
///
/// # Signals
///
/// - `activated(Commit)`: a suggestion was written into a control
/// - `highlighted(Suggestion)`: the highlighted suggestion changed
/// - `records_loaded(RefreshResult)`: a refresh finished
pub struct LookupController {
    config: Arc<LookupConfig>,
    surface: Box<dyn PresentationSurface>,
    source: Arc<dyn DataSource>,
    records: RecordListModel,
    navigator: Navigator,
    controls: Vec<ControlId>,

    completions: TaskQueue<Inbox>,
    callbacks: HashMap<u64, RefreshCallback>,
    next_sequence: u64,
    applied_sequence: u64,

    /// Signal emitted when a suggestion is written into a control.
    pub activated: Signal<Commit>,

    /// Signal emitted when the highlighted suggestion changes.
    pub highlighted: Signal<Suggestion>,

    /// Signal emitted when a refresh has been applied, failed or went stale.
    pub records_loaded: Signal<RefreshResult>,
}

impl LookupController {
    /// Create a controller.
    ///
    /// If the configuration has a lookup URL, the initial load starts
    /// immediately; until it is applied the controller simply finds no
    /// matches.
    pub fn new(
        config: impl Into<Arc<LookupConfig>>,
        surface: impl PresentationSurface + 'static,
        source: impl DataSource + 'static,
    ) -> Self {
        let mut controller = Self {
            config: config.into(),
            surface: Box::new(surface),
            source: Arc::new(source),
            records: RecordListModel::empty(),
            navigator: Navigator::new(),
            controls: Vec::new(),
            completions: TaskQueue::new(),
            callbacks: HashMap::new(),
            next_sequence: 0,
            applied_sequence: 0,
            activated: Signal::new(),
            highlighted: Signal::new(),
            records_loaded: Signal::new(),
        };
        controller.reload();
        controller
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The configuration.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// The current record snapshot.
    pub fn records(&self) -> &RecordSet {
        self.records.records()
    }

    /// The navigation state machine.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Whether suggestions are shown.
    pub fn is_visible(&self) -> bool {
        self.navigator.is_visible()
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Bind a control. Events from unbound controls are ignored.
    pub fn attach(&mut self, control: &dyn TextControl) {
        let id = control.id();
        if !self.controls.contains(&id) {
            tracing::debug!(target: targets::CONTROLLER, ?id, "attached control");
            self.controls.push(id);
        }
    }

    /// Unbind a control, hiding its suggestions.
    pub fn detach(&mut self, id: ControlId) {
        self.controls.retain(|c| *c != id);
        if self.navigator.is_visible_for(id) {
            self.hide();
        }
    }

    /// Whether a control is bound.
    pub fn is_attached(&self, id: ControlId) -> bool {
        self.controls.contains(&id)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Replace the records synchronously.
    ///
    /// Any refresh started earlier becomes stale.
    pub fn set_records(&mut self, records: RecordSet) {
        self.next_sequence += 1;
        self.applied_sequence = self.next_sequence;
        tracing::info!(target: targets::CONTROLLER, count = records.len(), "records replaced");
        self.records.set_records(records);
    }

    /// Reload from the configured lookup URL, if there is one.
    pub fn reload(&mut self) -> Option<RefreshHandle> {
        let url = self.config.lookup_url()?.to_string();
        Some(self.start_refresh(url))
    }

    /// Replace the records from `url` in the background.
    ///
    /// `on_loaded` runs on the host thread from
    /// [`process_pending`](Self::process_pending) once the outcome is known.
    pub fn refresh<F>(&mut self, url: impl Into<String>, on_loaded: F) -> RefreshHandle
    where
        F: FnOnce(&RefreshResult) + 'static,
    {
        let handle = self.start_refresh(url.into());
        self.callbacks.insert(handle.sequence(), Box::new(on_loaded));
        handle
    }

    fn start_refresh(&mut self, url: String) -> RefreshHandle {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        let source = Arc::clone(&self.source);
        let data_property = self.config.data_property().map(str::to_string);

        tracing::debug!(target: targets::CONTROLLER, sequence, %url, "starting refresh");
        let poster = CompletionPoster {
            sequence,
            url,
            sender: Some(self.completions.sender()),
        };
        let task = runtime::spawn_detached(async move {
            let outcome = fetch_records(source.as_ref(), &poster.url, data_property.as_deref()).await;
            poster.deliver(outcome);
        });

        RefreshHandle { sequence, task }
    }

    /// Apply finished refreshes. Call this regularly from the host thread.
    ///
    /// Returns the number of refreshes processed.
    pub fn process_pending(&mut self) -> usize {
        let mut inbox = Inbox::new();
        self.completions.process_all(&mut inbox);
        let processed = inbox.len();
        for completion in inbox {
            self.apply_refresh(completion);
        }
        processed
    }

    fn apply_refresh(&mut self, completion: RefreshCompletion) {
        let RefreshCompletion {
            sequence,
            url,
            outcome,
        } = completion;

        let Some(outcome) = outcome else {
            let released = self.callbacks.remove(&sequence).is_some();
            tracing::warn!(target: targets::CONTROLLER, sequence, %url, released, "refresh ended without a result");
            return;
        };

        let stale = sequence <= self.applied_sequence;
        let status = match outcome {
            Err(err) => {
                tracing::warn!(target: targets::CONTROLLER, sequence, %url, stale, %err, "refresh failed");
                RefreshStatus::Failed(err)
            }
            Ok(_) if stale => {
                tracing::warn!(
                    target: targets::CONTROLLER,
                    sequence,
                    applied = self.applied_sequence,
                    "discarding stale refresh"
                );
                RefreshStatus::Stale
            }
            Ok(records) => {
                let count = records.len();
                self.records.set_records(records);
                self.applied_sequence = sequence;
                tracing::info!(target: targets::CONTROLLER, sequence, count, %url, "records refreshed");
                RefreshStatus::Loaded { count }
            }
        };

        let result = RefreshResult {
            sequence,
            url,
            status,
        };
        if let Some(callback) = self.callbacks.remove(&sequence) {
            callback(&result);
        }
        self.records_loaded.emit(result);
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Handle an event from `control`.
    pub fn handle_event(&mut self, control: &mut dyn TextControl, event: LookupEvent) -> EventResponse {
        let id = control.id();
        if !self.is_attached(id) {
            tracing::trace!(target: targets::CONTROLLER, ?id, ?event, "ignoring event from unattached control");
            return EventResponse::PROPAGATE;
        }
        tracing::trace!(target: targets::CONTROLLER, ?id, ?event, "handling event");

        match event {
            LookupEvent::KeyDown(key) => self.key_down(control, key),
            LookupEvent::KeyUp(key) => {
                if self.navigator.key_up(key) {
                    self.update_suggestions(control);
                }
                EventResponse::PROPAGATE
            }
            LookupEvent::Click => {
                self.update_suggestions(control);
                EventResponse::PROPAGATE
            }
            LookupEvent::Blur => {
                self.navigator.blur();
                self.surface.hide();
                EventResponse::PROPAGATE
            }
            LookupEvent::PointerDown { index } => match self.navigator.pointer_down(id, index) {
                Some(request) => {
                    self.commit(control, request);
                    control.set_focus();
                    EventResponse::CONSUMED
                }
                None => EventResponse::PROPAGATE,
            },
        }
    }

    /// Hide the suggestions.
    pub fn hide(&mut self) {
        self.navigator.hide();
        self.surface.hide();
    }

    fn key_down(&mut self, control: &mut dyn TextControl, key: Key) -> EventResponse {
        match self.navigator.key_down(control.id(), key) {
            KeyOutcome::Moved(index) => {
                self.surface.highlight(index);
                self.emit_highlighted();
                EventResponse::PREVENT_DEFAULT
            }
            KeyOutcome::Commit(request) => {
                self.commit(control, request);
                EventResponse::CONSUMED
            }
            KeyOutcome::SelectionReset(index) => {
                self.surface.highlight(index);
                self.emit_highlighted();
                EventResponse::PROPAGATE
            }
            KeyOutcome::Ignored => EventResponse::PROPAGATE,
        }
    }

    /// Re-query for the word under the control's caret.
    fn update_suggestions(&mut self, control: &dyn TextControl) {
        let id = control.id();
        let text = control.text();
        let caret = clamp_offset(text, control.caret_offset());
        let word = current_word(text, caret);

        if !self.config.qualifies(word) {
            tracing::trace!(target: targets::CONTROLLER, word, "word does not qualify");
            self.hide();
            return;
        }

        let items = self.records.lookup(word, &self.config.match_options());
        tracing::trace!(target: targets::CONTROLLER, word, matches = items.len(), "looked up word");

        if self.navigator.populate(id, caret, items) {
            let template = self.config.result_format();
            let rows: Vec<SuggestionRow> = self
                .navigator
                .model()
                .items()
                .iter()
                .map(|suggestion| SuggestionRow::render(suggestion, template))
                .collect();
            self.surface.show(id, &rows);
            self.surface.highlight(0);
            self.emit_highlighted();
        } else if let Some(message) = self.config.no_matches_text() {
            self.surface.show_message(id, message);
        } else {
            self.surface.hide();
        }
    }

    fn commit(&mut self, control: &mut dyn TextControl, request: CommitRequest) {
        self.surface.hide();

        let values = request.suggestion.values();
        if values.is_empty() {
            tracing::warn!(target: targets::CONTROLLER, "no return fields configured, ignoring commit");
            return;
        }

        let replacement = format(self.config.result_format(), &values);
        let splice = splice_current_word(control.text(), request.caret, &replacement);
        tracing::debug!(
            target: targets::CONTROLLER,
            control = ?request.origin,
            %replacement,
            "committing suggestion"
        );

        control.set_text(splice.text.clone());
        control.set_caret_offset(splice.caret);

        self.activated.emit(Commit {
            control: request.origin,
            replacement,
            text: splice.text,
            caret: splice.caret,
            suggestion: request.suggestion,
        });
    }

    fn emit_highlighted(&self) {
        if let Some(suggestion) = self.navigator.model().current() {
            self.highlighted.emit(suggestion.clone());
        }
    }
}

impl std::fmt::Debug for LookupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupController")
            .field("config", &self.config)
            .field("records", &self.records.records().len())
            .field("navigator", &self.navigator)
            .field("controls", &self.controls)
            .field("pending", &self.completions.pending_count())
            .field("applied_sequence", &self.applied_sequence)
            .finish()
    }
}
