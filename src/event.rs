use core::fmt::{self, Write as _};

use heapless::String;

use crate::level::Level;

/// A single log call, borrowed for the duration of that call.
///
/// Callbacks receive a reference and must not keep it: `args` borrows the
/// caller's stack frame. `fmt::Arguments` can be formatted any number of
/// times, so the console and every callback each render their own copy.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub timestamp: u32,
    pub level: Level,
    pub file: &'a str,
    pub line: u32,
    pub args: fmt::Arguments<'a>,
}

impl LogEvent<'_> {
    /// Renders the message body into a bounded buffer.
    ///
    /// Text that does not fit is cut at the last whole character.
    pub fn message<const N: usize>(&self) -> String<N> {
        let mut buf = Truncating {
            out: String::new(),
            full: false,
        };
        let _ = buf.write_fmt(self.args);
        buf.out
    }
}

struct Truncating<const N: usize> {
    out: String<N>,
    full: bool,
}

impl<const N: usize> fmt::Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.out.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}
