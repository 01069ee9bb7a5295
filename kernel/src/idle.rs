//! Idle task.
//!
//! Runs at [`crate::config::IDLE_PRIORITY`], the lowest priority level,
//! guaranteeing the ready-queue scan in
//! [`crate::queue::Scheduler::highest_nonempty_priority`] never needs to
//! consider it directly: it is only ever reached as the fallback when every
//! other queue is empty.

use crate::api::{self, TaskConfig};
use crate::config::{IDLE_STACK_SIZE, IDLE_TASK_NAME, IDLE_PRIORITY};
use crate::tcb::{TaskArg, TaskHandle};

/// Creates the idle task. Called exactly once, by `rtos_start`.
pub(crate) fn spawn() -> Option<TaskHandle> {
    api::task_create(
        idle_entry,
        0,
        Some(TaskConfig {
            priority: Some(IDLE_PRIORITY),
            stack_size: Some(IDLE_STACK_SIZE),
            name: Some(IDLE_TASK_NAME),
            stack: None,
        }),
    )
}

/// While the exited list is non-empty, reap one TCB (freeing its stack, if
/// owned, and then the TCB itself); then yield. The reap loop recovers
/// memory from self-destroyed tasks; the yield is what lets higher-priority
/// ready tasks actually run between reaps.
extern "C" fn idle_entry(_arg: TaskArg) -> ! {
    loop {
        while let Some(dead) = api::pop_exited() {
            unsafe { api::reap(dead) };
        }
        api::task_yield();
    }
}
