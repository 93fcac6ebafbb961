//! Events the host feeds into the lookup controller.
//!
//! Hosts translate their native input events into [`LookupEvent`]s. Hosts
//! that only see raw DOM-style key codes can use [`Key::from_key_code`].
//!
//! Pointer-down on a suggestion must be delivered before the blur it causes,
//! which is the order browsers and most toolkits already use.

/// Keys the lookup engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    /// Any other key, by its raw key code.
    Other(u32),
}

impl Key {
    /// Translate a DOM `keyCode`.
    ///
    /// ```
    /// use horizon_lookup::events::Key;
    ///
    /// assert_eq!(Key::from_key_code(13), Key::Enter);
    /// assert_eq!(Key::from_key_code(65), Key::Other(65));
    /// ```
    pub fn from_key_code(code: u32) -> Self {
        match code {
            8 => Self::Backspace,
            9 => Self::Tab,
            13 => Self::Enter,
            37 => Self::ArrowLeft,
            38 => Self::ArrowUp,
            39 => Self::ArrowRight,
            40 => Self::ArrowDown,
            other => Self::Other(other),
        }
    }

    /// Whether this key commits the selected suggestion.
    pub fn is_commit(self) -> bool {
        matches!(self, Self::ArrowRight | Self::Tab | Self::Enter)
    }

    /// Whether this key moves the selection.
    pub fn is_navigation(self) -> bool {
        matches!(self, Self::ArrowUp | Self::ArrowDown)
    }
}

/// An input event on a bound text control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupEvent {
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The control was clicked (the caret may have moved).
    Click,
    /// The control lost focus.
    Blur,
    /// The pointer went down on the suggestion at `index`.
    PointerDown {
        /// Index of the suggestion in the displayed list.
        index: usize,
    },
}

/// What the host should do with the native event after the controller saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Suppress the control's default action (caret move, focus change, newline).
    pub prevent_default: bool,
    /// Do not deliver the event to other handlers.
    pub stop_propagation: bool,
}

impl EventResponse {
    /// Let the event continue normally.
    pub const PROPAGATE: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    /// Suppress the default action only.
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };

    /// Suppress the default action and stop propagation.
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };

    /// Whether the controller handled the event in any way the host must honor.
    pub fn is_accepted(&self) -> bool {
        self.prevent_default || self.stop_propagation
    }
}
