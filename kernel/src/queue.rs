//! Ready queues, blocked list, exited list, and the active-task pointer.
//!
//! All of this lives in one `static mut Scheduler`, mutated only from within
//! a critical section (see [`crate::critical`]): `NUM_PRIORITIES` intrusive
//! FIFO ready queues plus two holding lists for blocked and exited tasks.

use core::ptr::NonNull;

use crate::config::NUM_PRIORITIES;
use crate::list::TaskList;
use crate::tcb::Tcb;

pub struct Scheduler {
    pub active: Option<NonNull<Tcb>>,
    pub ready: [TaskList; NUM_PRIORITIES],
    pub blocked: TaskList,
    pub exited: TaskList,
}

impl Scheduler {
    pub const fn new() -> Self {
        const EMPTY: TaskList = TaskList::new();
        Self {
            active: None,
            ready: [EMPTY; NUM_PRIORITIES],
            blocked: TaskList::new(),
            exited: TaskList::new(),
        }
    }

    /// Appends `task` to the tail of the ready queue at its own priority.
    ///
    /// # Safety
    /// `task` must be unlinked and its `priority` must be `< NUM_PRIORITIES`.
    pub unsafe fn ready_append(&mut self, task: NonNull<Tcb>) {
        let priority = unsafe { task.as_ref().priority } as usize;
        unsafe { self.ready[priority].append(task) };
    }

    /// Index of the highest non-empty ready queue among `1..NUM_PRIORITIES`,
    /// if any are non-empty. Priority 0 (the idle task's queue) is excluded
    /// from this scan and checked separately by the caller, once this
    /// returns `None`.
    pub fn highest_nonempty_priority(&self) -> Option<usize> {
        (1..NUM_PRIORITIES)
            .rev()
            .find(|&p| !self.ready[p].is_empty())
    }
}

/// # Safety
/// Every access must happen from within [`crate::critical::free`] (or
/// equivalent, interrupts-already-masked context).
pub static mut SCHEDULER: Scheduler = Scheduler::new();
