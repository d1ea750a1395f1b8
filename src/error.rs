use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The console sink reported a write failure. No partial count is kept.
    #[error("console write failed")]
    Console,
    /// Every callback slot is occupied.
    #[error("callback registry is full")]
    RegistryFull,
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}
