//! Lock hooks that serialize log calls.
//!
//! The logger calls [`Lock::lock`] with `true` before touching the console or
//! the callbacks and with `false` afterwards. An acquire that returns `false`
//! drops the message.

use spin::mutex::SpinMutex;

pub trait Lock: Sync {
    /// Acquires (`true`) or releases (`false`) the lock.
    ///
    /// A release must pair with an earlier successful acquire.
    fn lock(&self, acquire: bool) -> bool;
}

impl<F> Lock for F
where
    F: Fn(bool) -> bool + Sync,
{
    fn lock(&self, acquire: bool) -> bool {
        self(acquire)
    }
}

/// Non-blocking lock for callers that cannot wait, such as interrupt
/// handlers. A contended acquire fails at once.
#[derive(Debug, Default)]
pub struct TryLock {
    raw: SpinMutex<()>,
}

impl TryLock {
    pub const fn new() -> Self {
        Self {
            raw: SpinMutex::new(()),
        }
    }

    pub fn is_held(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Lock for TryLock {
    fn lock(&self, acquire: bool) -> bool {
        if acquire {
            self.raw.try_lock().map(core::mem::forget).is_some()
        } else {
            release(&self.raw);
            true
        }
    }
}

/// Blocking lock: acquire spins until the holder releases.
///
/// Must not be used from a context that can preempt the holder on the same
/// core, it would spin forever.
#[derive(Debug, Default)]
pub struct SpinLock {
    raw: SpinMutex<()>,
}

impl SpinLock {
    pub const fn new() -> Self {
        Self {
            raw: SpinMutex::new(()),
        }
    }

    pub fn is_held(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Lock for SpinLock {
    fn lock(&self, acquire: bool) -> bool {
        if acquire {
            core::mem::forget(self.raw.lock());
        } else {
            release(&self.raw);
        }
        true
    }
}

fn release(raw: &SpinMutex<()>) {
    if raw.is_locked() {
        // SAFETY: the acquire forgot its guard, so this is the only unlock
        // for that hold.
        unsafe { raw.force_unlock() }
    }
}
