//! The ring of forks shared by adjacent seats.

use std::sync::{Arc, Mutex, MutexGuard};

/// Evidence that a fork is held; dropping the guard releases the fork.
pub(crate) type ForkGuard<'a> = MutexGuard<'a, ()>;

/// One exclusive fork on the table.
///
/// The mutex is the entire resource: its guard is the only proof of
/// possession, so two seats can never hold the same fork at once.
#[derive(Debug)]
pub struct Fork {
    id: usize,
    slot: Mutex<()>,
}

impl Fork {
    fn new(id: usize) -> Self {
        Self {
            id,
            slot: Mutex::new(()),
        }
    }

    /// 0-based position on the table.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Block until the fork is free, then take it.
    pub(crate) fn pick_up(&self) -> ForkGuard<'_> {
        self.slot.lock().unwrap()
    }
}

/// The full ring, one fork per seat.
#[derive(Debug)]
pub struct Table {
    forks: Vec<Arc<Fork>>,
}

impl Table {
    /// Lay `seats` forks around the table.
    pub fn new(seats: usize) -> Self {
        let forks = (0..seats).map(|id| Arc::new(Fork::new(id))).collect();
        Self { forks }
    }

    pub fn seats(&self) -> usize {
        self.forks.len()
    }

    /// Forks for the seat at `index` (0-based): left is the fork with the
    /// same index, right is the previous one around the ring, so fork *i*
    /// ends up shared by seats *i* and *i+1*. With a single seat both
    /// handles point at the same fork.
    pub fn seat_pair(&self, index: usize) -> (Arc<Fork>, Arc<Fork>) {
        let seats = self.forks.len();
        let left = Arc::clone(&self.forks[index]);
        let right = Arc::clone(&self.forks[(index + seats - 1) % seats]);
        (left, right)
    }
}
