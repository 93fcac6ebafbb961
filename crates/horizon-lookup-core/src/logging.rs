//! Logging facilities for Horizon Lookup.
//!
//! Horizon Lookup uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_lookup=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_lookup_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_lookup_core::signal";
    /// Owner-thread task queue target.
    pub const TASK: &str = "horizon_lookup_core::task";
    /// HTTP client target.
    pub const HTTP: &str = "horizon_lookup_net::http";
    /// Lookup controller target (event handling, commits, refreshes).
    pub const CONTROLLER: &str = "horizon_lookup::controller";
    /// Navigation state machine target.
    pub const NAVIGATION: &str = "horizon_lookup::navigation";
    /// Record source target (fetching and unwrapping payloads).
    pub const SOURCE: &str = "horizon_lookup::source";
    /// Configuration target.
    pub const CONFIG: &str = "horizon_lookup::config";
}
