use crate::core::{DeskError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

/// Lets one save run at a time.
///
/// A second submit while a save is still awaiting the store fails with
/// [`DeskError::SaveInProgress`] instead of queueing.
#[derive(Debug, Default)]
pub struct SaveGuard {
    busy: AtomicBool,
}

impl SaveGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<SavePermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DeskError::SaveInProgress)?;
        Ok(SavePermit { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one save; releases the guard on drop
#[derive(Debug)]
pub struct SavePermit<'a> {
    busy: &'a AtomicBool,
}

impl Drop for SavePermit<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
