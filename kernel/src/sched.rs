//! Scheduler core.
//!
//! `select_active_task` is the only function allowed to move a TCB between
//! "previously active" and "on some list" — everything else (the public API)
//! only ever prepares a TCB's state and then triggers an exception that
//! eventually calls down here.
//!
//! Precondition: called with interrupts disabled (from within an exception
//! handler, via [`crate::critical::free`] at the Rust/assembly boundary).

use core::ptr::NonNull;

use crate::config::IDLE_PRIORITY;
use crate::queue::Scheduler;
use crate::tcb::{Tcb, TaskState};

/// Picks the next active task and reparents the previous one onto the list
/// appropriate for its state.
///
/// If every ready queue in `1..NUM_PRIORITIES` is empty, the idle task's own
/// queue (`ready[IDLE_PRIORITY]`) is consulted next; only if that is also
/// empty does the current active task (if any) keep running. In steady
/// state the idle task is always ready or active, so the final fallback is
/// reached only transiently, never as the system's resting state.
///
/// An EXITED predecessor is never re-appended to a list here: `task_destroy`
/// already placed it on the exited list before raising the exception, and
/// re-appending it here would duplicate the node.
///
/// # Safety
/// Must be called with interrupts masked, and every pointer reachable from
/// `scheduler` must point to a live `Tcb`.
pub unsafe fn select_active_task(scheduler: &mut Scheduler) {
    let previous = scheduler.active.take();

    let new = match scheduler.highest_nonempty_priority() {
        Some(priority) => {
            let head = scheduler.ready[priority]
                .head()
                .expect("non-empty queue must have a head");
            unsafe { scheduler.ready[priority].remove(head) };
            head
        }
        None => match scheduler.ready[IDLE_PRIORITY as usize].pop_front() {
            Some(idle) => idle,
            None => previous.expect(
                "no ready task, no idle task, and no previous active task: the idle task must always be ready or active",
            ),
        },
    };

    if let Some(prev) = previous {
        if prev != new {
            reparent_previous(scheduler, prev);
        }
    }

    unsafe {
        let mut new = new;
        new.as_mut().state = TaskState::Active;
    }
    scheduler.active = Some(new);
}

/// Places a just-deactivated TCB onto the list matching its current state.
fn reparent_previous(scheduler: &mut Scheduler, prev: NonNull<Tcb>) {
    let state = unsafe { prev.as_ref().state };
    match state {
        TaskState::Blocked => unsafe { scheduler.blocked.append(prev) },
        TaskState::Exited => {
            // Already placed on the exited list by `task_destroy`; do not
            // re-append.
        }
        TaskState::Ready => unsafe { scheduler.ready_append(prev) },
        TaskState::Active => unsafe {
            // Preempted without itself calling task_yield/block_active_task
            // (e.g. the tick handler's preemption path): still marked
            // Active, so it must be flipped to Ready before rejoining a
            // ready queue, or it ends up listed while claiming to be the
            // running task.
            let mut prev = prev;
            prev.as_mut().state = TaskState::Ready;
            scheduler.ready_append(prev);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcb::test_support::leak_test_tcb;

    fn set_priority_and_state(mut t: NonNull<Tcb>, priority: u8, state: TaskState) {
        unsafe {
            t.as_mut().priority = priority;
            t.as_mut().state = state;
        }
    }

    #[test]
    fn picks_highest_priority_ready_task() {
        let mut sched = Scheduler::new();
        let lo = leak_test_tcb("lo");
        let hi = leak_test_tcb("hi");
        let md = leak_test_tcb("md");
        set_priority_and_state(lo, 1, TaskState::Ready);
        set_priority_and_state(hi, 5, TaskState::Ready);
        set_priority_and_state(md, 3, TaskState::Ready);
        unsafe {
            sched.ready_append(lo);
            sched.ready_append(hi);
            sched.ready_append(md);
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(hi));
    }

    #[test]
    fn fifo_within_same_priority() {
        let mut sched = Scheduler::new();
        let a = leak_test_tcb("a");
        let b = leak_test_tcb("b");
        set_priority_and_state(a, 3, TaskState::Ready);
        set_priority_and_state(b, 3, TaskState::Ready);
        unsafe {
            sched.ready_append(a);
            sched.ready_append(b);
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(a));
        // `a` yields (goes back to Ready) and stays in the scheduler, `b`
        // should be picked next since it was still waiting.
        unsafe {
            sched.active.unwrap().as_mut().state = TaskState::Ready;
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(b));
    }

    #[test]
    fn exited_predecessor_is_not_reappended() {
        let mut sched = Scheduler::new();
        let dying = leak_test_tcb("dying");
        let next = leak_test_tcb("next");
        set_priority_and_state(dying, 2, TaskState::Active);
        set_priority_and_state(next, 2, TaskState::Ready);
        sched.active = Some(dying);
        unsafe {
            sched.ready_append(next);
            // task_destroy's job: mark exited and place on the exited list
            // *before* raising the exception.
            let mut dying_mut = dying;
            dying_mut.as_mut().state = TaskState::Exited;
            sched.exited.append(dying);
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(next));
        // `dying` must appear exactly once on the exited list, not twice.
        assert_eq!(sched.exited.pop_front(), Some(dying));
        assert!(sched.exited.is_empty());
    }

    #[test]
    fn no_ready_task_keeps_previous_active() {
        let mut sched = Scheduler::new();
        let only = leak_test_tcb("only");
        set_priority_and_state(only, 2, TaskState::Active);
        sched.active = Some(only);
        unsafe {
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(only));
    }

    #[test]
    fn idle_task_dispatched_when_no_other_task_ready() {
        let mut sched = Scheduler::new();
        let idle = leak_test_tcb("idle");
        set_priority_and_state(idle, IDLE_PRIORITY, TaskState::Ready);
        unsafe {
            sched.ready_append(idle);
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(idle));
    }

    /// Reproduces a sole task self-destructing: `task_destroy` has already
    /// cleared `scheduler.active` and appended the dying task to the exited
    /// list before the context switch runs, so `previous` here is `None`.
    /// With only the idle task ready, it must be picked instead of
    /// panicking on the last-resort fallback.
    #[test]
    fn exit_of_sole_task_falls_back_to_idle() {
        let mut sched = Scheduler::new();
        let idle = leak_test_tcb("idle");
        let dying = leak_test_tcb("dying");
        set_priority_and_state(idle, IDLE_PRIORITY, TaskState::Ready);
        set_priority_and_state(dying, 3, TaskState::Exited);
        unsafe {
            sched.ready_append(idle);
            sched.exited.append(dying);
            // task_destroy already nulled `active` before pending the switch.
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(idle));
        assert_eq!(sched.exited.pop_front(), Some(dying));
    }

    /// Reproduces tick-preemption: the previous task never called
    /// `task_yield`/`block_active_task`, so it is still `Active` when
    /// reparented. It must be flipped to `Ready` before rejoining its ready
    /// queue.
    #[test]
    fn preempted_active_task_is_reset_to_ready() {
        let mut sched = Scheduler::new();
        let low = leak_test_tcb("low");
        let high = leak_test_tcb("high");
        set_priority_and_state(low, 2, TaskState::Active);
        set_priority_and_state(high, 5, TaskState::Ready);
        sched.active = Some(low);
        unsafe {
            sched.ready_append(high);
            select_active_task(&mut sched);
        }
        assert_eq!(sched.active, Some(high));
        assert_eq!(unsafe { low.as_ref().state }, TaskState::Ready);
        assert_eq!(sched.ready[2].pop_front(), Some(low));
    }
}
