use embedded_io::Write;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::dispatcher::Logger;
use crate::level::Level;
use crate::macros::file_name;

impl<W, D, const N: usize> log::Log for Logger<'_, W, D, N>
where
    W: Write + Send,
    D: Copy + PartialEq + Send + Sync,
{
    fn enabled(&self, metadata: &Metadata) -> bool {
        Logger::enabled(self, Level::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let level = Level::from(record.level());
        if Logger::enabled(self, level) {
            let file = record.file().map_or("", file_name);
            let _ = Logger::log(self, level, file, record.line().unwrap_or(0), *record.args());
        }
    }

    fn flush(&self) {
        let _ = self.console().flush();
    }
}

/// Installs `logger` as the backend of the `log` facade.
pub fn init<W, D, const N: usize>(
    logger: &'static Logger<'static, W, D, N>,
    max_level: LevelFilter,
) -> Result<(), SetLoggerError>
where
    W: Write + Send + 'static,
    D: Copy + PartialEq + Send + Sync + 'static,
{
    log::set_logger(logger).map(|()| log::set_max_level(max_level))
}
