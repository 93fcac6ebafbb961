//! Core systems for Horizon Lookup.
//!
//! This crate provides the foundational pieces the lookup engine is built on:
//!
//! - **Signals**: Typed change notification
//! - **Task Queue**: Posting work from background tasks onto the owner thread
//! - **Logging**: Shared `tracing` target names
//!
//! # Example
//!
//! A background fetch hands its result to the owner thread, which then
//! notifies listeners:
//!
//! ```
//! use horizon_lookup_core::{Signal, TaskQueue};
//!
//! let loaded = Signal::<usize>::new();
//! loaded.connect(|count| println!("{count} records loaded"));
//!
//! let queue = TaskQueue::<Vec<usize>>::new();
//! let sender = queue.sender();
//! std::thread::spawn(move || sender.post(|counts| counts.push(42)))
//!     .join()
//!     .unwrap()
//!     .unwrap();
//!
//! let mut counts = Vec::new();
//! queue.process_all(&mut counts);
//! for count in counts {
//!     loaded.emit(count);
//! }
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod task;

pub use error::{CoreError, Result};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{TaskId, TaskQueue, TaskSender};
