#![allow(dead_code)]

use std::cell::RefCell;

use embedded_io::ErrorKind;
use log_ec::{LogEvent, Logger};

/// Console sink that keeps everything in memory.
#[derive(Default)]
pub struct MemorySink {
    pub out: Vec<u8>,
    pub broken: bool,
}

impl embedded_io::ErrorType for MemorySink {
    type Error = ErrorKind;
}

impl embedded_io::Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        if self.broken {
            return Err(ErrorKind::Other);
        }
        self.out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

pub fn output<D, const N: usize>(logger: &Logger<'_, MemorySink, D, N>) -> String {
    logger
        .console()
        .with(|sink| String::from_utf8(sink.out.clone()).unwrap())
}

thread_local! {
    static RECORDED: RefCell<Vec<(&'static str, String)>> = const { RefCell::new(Vec::new()) };
}

/// Callback that records `(name, message)` for the current thread.
pub fn record(event: &LogEvent<'_>, name: &'static str) {
    let message = event.message::<128>();
    RECORDED.with(|r| r.borrow_mut().push((name, message.as_str().to_owned())));
}

pub fn take_recorded() -> Vec<(&'static str, String)> {
    RECORDED.with(|r| r.borrow_mut().drain(..).collect())
}
