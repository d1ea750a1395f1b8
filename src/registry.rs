//! Fixed-capacity table of log callbacks.
//!
//! A registration is identified by its `(callback, data)` pair. The table
//! never holds the same pair twice: registering an existing pair replaces it.

use core::ptr;

use crate::error::Error;
use crate::event::LogEvent;
use crate::level::Level;

/// Subscriber invoked synchronously for each admitted event.
pub type CallbackFn<D> = fn(&LogEvent<'_>, D);

#[derive(Debug, Clone, Copy)]
pub struct CallbackEntry<D> {
    pub callback: CallbackFn<D>,
    pub data: D,
    pub level: Level,
}

impl<D: Copy + PartialEq> CallbackEntry<D> {
    fn is(&self, callback: CallbackFn<D>, data: D) -> bool {
        ptr::fn_addr_eq(self.callback, callback) && self.data == data
    }
}

pub struct CallbackRegistry<D, const N: usize> {
    slots: [Option<CallbackEntry<D>>; N],
}

impl<D, const N: usize> Default for CallbackRegistry<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, const N: usize> CallbackRegistry<D, N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &CallbackEntry<D>> {
        self.slots.iter().flatten()
    }
}

impl<D: Copy + PartialEq, const N: usize> CallbackRegistry<D, N> {
    /// Registers `callback` for events at or above `level`.
    ///
    /// An existing registration of the same pair is dropped first, so
    /// re-registering only moves the pair to the first free slot with the
    /// new level.
    pub fn register(
        &mut self,
        callback: CallbackFn<D>,
        data: D,
        level: Level,
    ) -> Result<(), Error> {
        self.unregister(callback, data);

        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(Error::RegistryFull)?;
        *slot = Some(CallbackEntry {
            callback,
            data,
            level,
        });
        Ok(())
    }

    /// Clears the first slot holding the pair. Unknown pairs are ignored.
    pub fn unregister(&mut self, callback: CallbackFn<D>, data: D) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| matches!(slot, Some(entry) if entry.is(callback, data)))
        {
            *slot = None;
        }
    }

    pub fn contains(&self, callback: CallbackFn<D>, data: D) -> bool {
        self.iter().any(|entry| entry.is(callback, data))
    }

    /// Calls every entry whose threshold admits `event.level`.
    pub fn dispatch(&self, event: &LogEvent<'_>) {
        for entry in self.iter().filter(|entry| entry.level <= event.level) {
            (entry.callback)(event, entry.data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    // distinct bodies so the functions are never folded into one address
    fn a(_: &LogEvent<'_>, _: usize) {
        core::hint::black_box(1);
    }
    fn b(_: &LogEvent<'_>, _: usize) {
        core::hint::black_box(2);
    }
    fn c(_: &LogEvent<'_>, _: usize) {
        core::hint::black_box(3);
    }

    #[test]
    fn register_fills_first_free_slot() {
        let mut reg = CallbackRegistry::<usize, 3>::new();
        reg.register(a, 0, Level::Info).unwrap();
        reg.register(b, 0, Level::Debug).unwrap();
        reg.unregister(a, 0);
        reg.register(c, 0, Level::Warn).unwrap();

        let order: Vec<_> = reg.iter().map(|e| e.level).collect();
        assert_eq!(order, [Level::Warn, Level::Debug]);
    }

    #[test]
    fn same_pair_updates_in_place() {
        let mut reg = CallbackRegistry::<usize, 2>::new();
        reg.register(a, 1, Level::Info).unwrap();
        reg.register(a, 1, Level::Error).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.iter().next().map(|e| e.level), Some(Level::Error));

        // a second distinct pair still fits
        reg.register(a, 2, Level::Trace).unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn full_registry_rejects_and_keeps_entries() {
        let mut reg = CallbackRegistry::<usize, 2>::new();
        reg.register(a, 0, Level::Info).unwrap();
        reg.register(b, 0, Level::Info).unwrap();
        assert_eq!(reg.register(c, 0, Level::Info), Err(Error::RegistryFull));
        assert!(reg.contains(a, 0));
        assert!(reg.contains(b, 0));
        assert!(!reg.contains(c, 0));
    }

    #[test]
    fn full_registry_still_accepts_existing_pair() {
        let mut reg = CallbackRegistry::<usize, 1>::new();
        reg.register(a, 0, Level::Info).unwrap();
        assert_eq!(reg.register(a, 0, Level::Warn), Ok(()));
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut reg = CallbackRegistry::<usize, 2>::new();
        reg.register(a, 0, Level::Info).unwrap();
        reg.unregister(a, 1);
        reg.unregister(b, 0);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn zero_capacity_never_registers() {
        let mut reg = CallbackRegistry::<usize, 0>::new();
        assert_eq!(reg.register(a, 0, Level::Info), Err(Error::RegistryFull));
        assert!(reg.is_empty());
    }

    #[derive(Clone, Copy)]
    struct Hits<'a>(&'a Cell<u32>);

    impl PartialEq for Hits<'_> {
        fn eq(&self, other: &Self) -> bool {
            core::ptr::eq(self.0, other.0)
        }
    }

    #[test]
    fn dispatch_respects_thresholds() {
        fn count(_: &LogEvent<'_>, hits: Hits<'_>) {
            hits.0.set(hits.0.get() + 1);
        }

        let info_hits = Cell::new(0);
        let debug_hits = Cell::new(0);
        let mut reg = CallbackRegistry::<Hits<'_>, 2>::new();
        reg.register(count, Hits(&info_hits), Level::Info).unwrap();
        reg.register(count, Hits(&debug_hits), Level::Debug).unwrap();
        assert_eq!(reg.len(), 2);

        for level in [Level::Info, Level::Debug, Level::Warn] {
            reg.dispatch(&LogEvent {
                timestamp: 0,
                level,
                file: "t.rs",
                line: 1,
                args: format_args!("x"),
            });
        }
        assert_eq!(info_hits.get(), 2);
        assert_eq!(debug_hits.get(), 3);
    }
}
