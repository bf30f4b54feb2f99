//! Persistence seam for timesheets.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;

use crate::timesheet::Timesheet;

/// Loads and saves the whole timesheet.
///
/// `save` replaces the persisted state in full. Implementations must not
/// leave a partially written timesheet behind if saving fails.
pub trait EntryStore {
    type Error;

    /// Reads the persisted timesheet, or an empty one if nothing is stored yet.
    fn load(&self) -> Result<Timesheet, Self::Error>;

    /// Overwrites the persisted timesheet.
    fn save(&self, timesheet: &Timesheet) -> Result<(), Self::Error>;
}

/// In-memory store that records how often it was saved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    timesheet: RefCell<Timesheet>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new(timesheet: Timesheet) -> Self {
        Self {
            timesheet: RefCell::new(timesheet),
            saves: Cell::new(0),
        }
    }

    /// A copy of the currently stored timesheet.
    pub fn snapshot(&self) -> Timesheet {
        self.timesheet.borrow().clone()
    }

    /// Number of times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl EntryStore for MemoryStore {
    type Error = Infallible;

    fn load(&self) -> Result<Timesheet, Self::Error> {
        Ok(self.snapshot())
    }

    fn save(&self, timesheet: &Timesheet) -> Result<(), Self::Error> {
        self.timesheet.replace(timesheet.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
