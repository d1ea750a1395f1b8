use core::cell::RefCell;
use core::fmt::{self, Write as _};

use critical_section::Mutex;
use embedded_io::Write;

use crate::error::Error;
use crate::event::LogEvent;

/// How the console prefix is rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    /// Level and location wrapped in ANSI colors.
    Color,
}

const RESET: &str = "\x1b[0m";
const GREY: &str = "\x1b[90m";

/// Console sink shared between thread and interrupt context.
///
/// Every access runs inside a critical section.
pub struct SharedConsole<W> {
    port: Mutex<RefCell<W>>,
}

impl<W> SharedConsole<W> {
    pub const fn new(port: W) -> Self {
        Self {
            port: Mutex::new(RefCell::new(port)),
        }
    }

    /// Runs `f` on the sink.
    ///
    /// Panics when called from inside another access to the same console,
    /// for instance from a `Display` impl that is being logged. The logger
    /// itself only uses [`SharedConsole::try_with`].
    pub fn with<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        critical_section::with(|cs| f(&mut self.port.borrow_ref_mut(cs)))
    }

    /// Runs `f` on the sink, or returns `None` if the sink is already in use
    /// further up the call stack.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut port = self.port.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut port))
        })
    }

    pub fn into_inner(self) -> W {
        self.port.into_inner().into_inner()
    }
}

impl<W: Write> SharedConsole<W> {
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        self.try_with(|port| port.write(buf).map_err(|_| Error::Console))
            .unwrap_or(Err(Error::Console))
    }

    pub fn flush(&self) -> Result<(), Error> {
        self.try_with(|port| port.flush().map_err(|_| Error::Console))
            .unwrap_or(Err(Error::Console))
    }

    /// Writes the prefix and the message body of `event`.
    ///
    /// Returns the number of bytes written, or `Error::Console` if either
    /// part failed or the console is busy on this call stack (an argument
    /// that logs while being formatted).
    pub fn write_event(&self, event: &LogEvent<'_>, style: Style) -> Result<usize, Error> {
        self.try_with(|port| {
            let prefix = print(port, format_args!("{}", Prefix { event, style }));
            let body = print(port, event.args);
            match (prefix, body) {
                (Some(prefix), Some(body)) => Ok(prefix + body),
                _ => Err(Error::Console),
            }
        })
        .unwrap_or(Err(Error::Console))
    }

    /// Handle that writes raw text to this console.
    pub fn stdout(&self) -> StdOut<'_, W> {
        StdOut(self)
    }
}

/// Formats `args` into `port`, returning the byte count.
///
/// `None` when the sink fails or a `Display` impl in `args` returns an error;
/// either way the line on the console is incomplete.
fn print<W: Write>(port: &mut W, args: fmt::Arguments<'_>) -> Option<usize> {
    let mut out = Counting { port, written: 0 };
    out.write_fmt(args).ok()?;
    Some(out.written)
}

struct Counting<'a, W> {
    port: &'a mut W,
    written: usize,
}

impl<W: Write> fmt::Write for Counting<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        self.written += s.len();
        Ok(())
    }
}

struct Prefix<'a, 'e> {
    event: &'a LogEvent<'e>,
    style: Style,
}

impl fmt::Display for Prefix<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ev = self.event;
        match self.style {
            Style::Plain => write!(
                f,
                "{:>8} {:<5} {}:{}: ",
                ev.timestamp, ev.level, ev.file, ev.line
            ),
            Style::Color => write!(
                f,
                "{:>8} {}{:<5}{RESET} {GREY}{}:{}:{RESET} ",
                ev.timestamp,
                ev.level.color(),
                ev.level,
                ev.file,
                ev.line
            ),
        }
    }
}

pub struct StdOut<'a, W>(&'a SharedConsole<W>);

impl<W: Write> embedded_io::ErrorType for StdOut<'_, W> {
    type Error = Error;
}

impl<W: Write> embedded_io::Write for StdOut<'_, W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}

impl<W: Write> fmt::Write for StdOut<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.0.try_with(|port| port.write_all(s.as_bytes())) {
            Some(Ok(())) => Ok(()),
            _ => Err(fmt::Error),
        }
    }
}
