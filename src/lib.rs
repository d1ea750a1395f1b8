//! Leveled, timestamped logging for embedded targets.
//!
//! A [`Logger`] writes lines of the form
//!
//! ```text
//!     1234 INFO  main.rs:42: radio initialized
//! ```
//!
//! to an [`embedded_io::Write`] console and fans every event out to a fixed
//! number of registered callbacks. Nothing is allocated. Concurrent callers
//! are serialized by an optional [`Lock`]; a caller whose acquire fails (an
//! interrupt handler using [`TryLock`], say) loses its message instead of
//! blocking.
#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod level;
pub mod lock;
mod macros;
pub mod registry;
pub mod serial_logger;

pub use console::{SharedConsole, StdOut, Style};
pub use dispatcher::{Logger, TimestampFn};
pub use error::Error;
pub use event::LogEvent;
pub use level::Level;
pub use lock::{Lock, SpinLock, TryLock};
pub use macros::file_name;
pub use registry::{CallbackEntry, CallbackFn, CallbackRegistry};
