//! The logger: configuration, console and callbacks behind one entry point.

use core::fmt;

use embedded_io::Write;

use crate::console::{SharedConsole, Style};
use crate::error::Error;
use crate::event::LogEvent;
use crate::level::Level;
use crate::lock::Lock;
use crate::registry::{CallbackFn, CallbackRegistry};

/// Returns the current time, in units chosen by the application.
pub type TimestampFn = fn() -> u32;

#[derive(Clone, Copy)]
struct LogConfig<'a> {
    level: Level,
    console_disabled: bool,
    lock: Option<&'a dyn Lock>,
    timestamp: Option<TimestampFn>,
}

/// Leveled logger writing to a console sink `W` and up to `N` callbacks
/// that receive user data `D`.
///
/// `N = 0` removes callback support. Configuration takes `&mut self`, so it
/// has to be done before the logger is shared; [`Logger::log`] only needs
/// `&self` and may be called from any context the installed [`Lock`]
/// supports.
pub struct Logger<'a, W, D = (), const N: usize = 0> {
    config: LogConfig<'a>,
    style: Style,
    console: SharedConsole<W>,
    callbacks: CallbackRegistry<D, N>,
}

impl<'a, W, D, const N: usize> Logger<'a, W, D, N> {
    pub const fn new(console: W, style: Style) -> Self {
        Self {
            config: LogConfig {
                level: Level::Trace,
                console_disabled: false,
                lock: None,
                timestamp: None,
            },
            style,
            console: SharedConsole::new(console),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Console output is limited to events at or above `level`.
    /// Callbacks keep their own thresholds.
    pub fn set_level(&mut self, level: Level) {
        self.config.level = level;
    }

    pub fn level(&self) -> Level {
        self.config.level
    }

    /// Stops console output (`log_off`). Callbacks still run.
    pub fn disable_console(&mut self) {
        self.config.console_disabled = true;
    }

    /// Resumes console output (`log_on`).
    pub fn enable_console(&mut self) {
        self.config.console_disabled = false;
    }

    pub fn is_console_enabled(&self) -> bool {
        !self.config.console_disabled
    }

    /// Without a timestamp function every event is stamped 0.
    pub fn set_timestamp_fn(&mut self, timestamp: Option<TimestampFn>) {
        self.config.timestamp = timestamp;
    }

    /// Without a lock every acquire succeeds.
    pub fn set_lock(&mut self, lock: Option<&'a dyn Lock>) {
        self.config.lock = lock;
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn console(&self) -> &SharedConsole<W> {
        &self.console
    }

    pub fn callbacks(&self) -> &CallbackRegistry<D, N> {
        &self.callbacks
    }

    pub fn into_console(self) -> W {
        self.console.into_inner()
    }

    fn timestamp(&self) -> u32 {
        self.config.timestamp.map_or(0, |now| now())
    }

    fn acquire(&self) -> Option<Held<'_>> {
        match self.config.lock {
            Some(lock) if !lock.lock(true) => None,
            lock => Some(Held(lock)),
        }
    }

    fn prints(&self, level: Level) -> bool {
        !self.config.console_disabled && level >= self.config.level
    }
}

impl<W, D: Copy + PartialEq, const N: usize> Logger<'_, W, D, N> {
    /// Registers `callback` for events at or above `level`. Registering a
    /// known `(callback, data)` pair again only updates its level.
    pub fn register_callback(
        &mut self,
        callback: CallbackFn<D>,
        data: D,
        level: Level,
    ) -> Result<(), Error> {
        self.callbacks.register(callback, data, level)
    }

    pub fn unregister_callback(&mut self, callback: CallbackFn<D>, data: D) {
        self.callbacks.unregister(callback, data);
    }

    /// Whether an event at `level` reaches the console or any callback.
    pub fn enabled(&self, level: Level) -> bool {
        self.prints(level) || self.callbacks.iter().any(|entry| entry.level <= level)
    }
}

impl<W: Write, D: Copy + PartialEq, const N: usize> Logger<'_, W, D, N> {
    /// Logs one event.
    ///
    /// Returns the number of console bytes written: 0 when the console is
    /// off, the level is filtered or the lock could not be taken. If the
    /// lock is refused, callbacks are skipped too and the event is lost.
    /// A console write failure is reported after the callbacks have run.
    pub fn log(
        &self,
        level: Level,
        file: &str,
        line: u32,
        args: fmt::Arguments<'_>,
    ) -> Result<usize, Error> {
        let event = LogEvent {
            timestamp: self.timestamp(),
            level,
            file,
            line,
            args,
        };

        let Some(_held) = self.acquire() else {
            return Ok(0);
        };

        let written = if self.prints(level) {
            self.console.write_event(&event, self.style)
        } else {
            Ok(0)
        };
        self.callbacks.dispatch(&event);
        written
    }
}

/// An acquired lock, released on drop so that a panicking callback does not
/// leave it held.
struct Held<'l>(Option<&'l dyn Lock>);

impl Drop for Held<'_> {
    fn drop(&mut self) {
        if let Some(lock) = self.0 {
            let _ = lock.lock(false);
        }
    }
}
