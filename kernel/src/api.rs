//! Public API: the functions everything else in this crate exists to
//! implement. All of them (barring `rtos_start`) may be called from any
//! task; `unblock_task` is additionally safe from ISR context.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::config::{DEFAULT_STACK_SIZE, DEFAULT_TASK_PRIORITY, NUM_PRIORITIES};
use crate::critical;
#[cfg(target_arch = "arm")]
use crate::error::{fatal, SchedulerError};
use crate::list::ListLink;
use crate::queue::SCHEDULER;
use crate::stack;
use crate::tcb::{
    BlockCause, Tcb, TaskArg, TaskEntry, TaskHandle, TaskName, TaskState, BLOCK_CAUSE_NONE,
};

/// Caller-supplied stack memory, used when a task should run on a buffer the
/// caller owns rather than one `task_create` allocates.
pub struct CallerStack {
    pub base: *mut u8,
    pub size: usize,
}

/// Optional overrides for `task_create`; any field left `None` falls back to
/// the matching default in [`crate::config`].
#[derive(Default)]
pub struct TaskConfig<'a> {
    pub priority: Option<u8>,
    pub stack_size: Option<usize>,
    pub name: Option<&'a str>,
    pub stack: Option<CallerStack>,
}

/// Allocates a TCB and (unless `config.stack` supplies one) a stack, builds
/// the task's initial frame, and appends it to its priority's ready queue.
///
/// Returns `None` if `priority >= NUM_PRIORITIES` or if any allocation
/// fails; validation happens before any allocation, so a rejected priority
/// never leaks a TCB (see DESIGN.md).
pub fn task_create(entry: TaskEntry, arg: TaskArg, config: Option<TaskConfig>) -> Option<TaskHandle> {
    let config = config.unwrap_or_default();
    let priority = config.priority.unwrap_or(DEFAULT_TASK_PRIORITY);
    if priority as usize >= NUM_PRIORITIES {
        return None;
    }

    let (stack_base, stack_limit, stack_owned) = match config.stack {
        Some(CallerStack { base, size }) => {
            if base.is_null() || size < 64 {
                return None;
            }
            (base as u32, base as u32 + size as u32, false)
        }
        None => {
            let size = config.stack_size.unwrap_or(DEFAULT_STACK_SIZE);
            let layout = Layout::from_size_align(size, 8).ok()?;
            let ptr = unsafe { alloc::alloc::alloc(layout) };
            if ptr.is_null() {
                return None;
            }
            (ptr as u32, ptr as u32 + size as u32, true)
        }
    };

    let stack_top = unsafe { stack::init_stack(stack_limit, entry, arg, exit_trampoline) };

    let tcb = Tcb {
        stack_top,
        stack_base,
        stack_limit,
        stack_owned,
        entry,
        arg,
        name: config.name.map(TaskName::new).unwrap_or(TaskName::EMPTY),
        priority,
        state: TaskState::Ready,
        block_cause: BLOCK_CAUSE_NONE,
        list_link: ListLink::new(),
    };

    let Some(ptr) = try_alloc_tcb(tcb) else {
        if stack_owned {
            let layout = Layout::from_size_align(stack_limit as usize - stack_base as usize, 8)
                .expect("stack layout was valid at allocation");
            unsafe { alloc::alloc::dealloc(stack_base as *mut u8, layout) };
        }
        return None;
    };

    critical::free(|| unsafe {
        (*core::ptr::addr_of_mut!(SCHEDULER)).ready_append(ptr);
    });

    Some(unsafe { TaskHandle::from_raw(ptr) })
}

/// If `handle` is the active task: marks it EXITED, appends it to the
/// exited list, clears `active`, and pends a context switch — the running
/// code never returns past this call (the task that owned `handle` never
/// executes another instruction). If `handle` is any other task: unlinks it
/// from whatever list its state says it belongs to and reaps it
/// immediately, since nothing is running on its stack.
pub fn task_destroy(handle: TaskHandle) {
    let mut ptr = handle.as_ptr();

    let destroying_active = critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        if scheduler.active == Some(ptr) {
            ptr.as_mut().state = TaskState::Exited;
            scheduler.exited.append(ptr);
            scheduler.active = None;
            true
        } else {
            false
        }
    });

    if destroying_active {
        pend_context_switch();
        return;
    }

    critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        match ptr.as_ref().state {
            TaskState::Ready => {
                let priority = ptr.as_ref().priority as usize;
                scheduler.ready[priority].remove(ptr);
            }
            TaskState::Blocked => scheduler.blocked.remove(ptr),
            TaskState::Exited => scheduler.exited.remove(ptr),
            TaskState::Active => unreachable!("handled above"),
        }
    });

    unsafe { reap(ptr) };
}

/// Marks the active task READY (tail of its own priority's queue) and pends
/// a context switch. Returns only once this task is dispatched again.
pub fn task_yield() {
    critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        if let Some(mut active) = scheduler.active {
            active.as_mut().state = TaskState::Ready;
        }
    });
    pend_context_switch();
}

/// Marks the active task BLOCKED with `cause` and pends a context switch.
/// Driver code calls this to sleep pending an I/O event it will later
/// signal with a matching `unblock_task`.
pub fn block_active_task(cause: BlockCause) {
    critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        if let Some(mut active) = scheduler.active {
            active.as_mut().state = TaskState::Blocked;
            active.as_mut().block_cause = cause;
        }
    });
    pend_context_switch();
}

/// No-op unless `handle` is currently BLOCKED with `block_cause == cause`:
/// this predicate stops one driver from racing to unblock a task a
/// different driver already rerouted to a new cause. On success, moves the
/// task to its priority's ready queue and clears `block_cause`; does not
/// itself preempt the caller. Safe to call from ISR context.
///
/// Returns whether the unblock actually happened, so callers that care can
/// tell a genuine wakeup from a silently ignored stale one — "silent" means
/// no logging or error path, not withholding this from the caller.
pub fn unblock_task(handle: TaskHandle, cause: BlockCause) -> bool {
    let mut ptr = handle.as_ptr();
    critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        let tcb = ptr.as_ref();
        if tcb.state != TaskState::Blocked || tcb.block_cause != cause {
            return false;
        }
        scheduler.blocked.remove(ptr);
        ptr.as_mut().state = TaskState::Ready;
        ptr.as_mut().block_cause = BLOCK_CAUSE_NONE;
        scheduler.ready_append(ptr);
        true
    })
}

/// Returns the currently active task, if any. Safe to call from ISR
/// context as a single pointer read under a critical section; the blocking
/// half itself (`block_active_task`) is thread-mode only.
pub fn get_active_task() -> Option<TaskHandle> {
    critical::free(|| unsafe {
        (*core::ptr::addr_of!(SCHEDULER))
            .active
            .map(|ptr| TaskHandle::from_raw(ptr))
    })
}

/// Creates the idle task at the lowest priority, then issues the
/// supervisor call that transfers control to the scheduler for the first
/// time. Does not return on success; if the idle task cannot be created, or
/// the supervisor call itself returns, both are fatal.
#[cfg(target_arch = "arm")]
pub fn rtos_start() -> ! {
    if crate::idle::spawn().is_none() {
        fatal(SchedulerError::IdleTaskCreationFailed);
    }
    crate::glue::trigger_start()
}

#[cfg(not(target_arch = "arm"))]
pub fn rtos_start() -> ! {
    unreachable!(
        "rtos_start requires real exception hardware; host tests drive \
         sched::select_active_task directly instead"
    )
}

/// Runs in thread mode on the exiting task's own stack when its entry
/// function returns normally instead of calling `task_destroy` on itself.
unsafe extern "C" fn exit_trampoline() -> ! {
    if let Some(active) = get_active_task() {
        task_destroy(active);
    }
    // `task_destroy` on the active task pends a context switch that fires
    // at the next exception-safe point; this is reached only in the
    // instant before that happens.
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(target_arch = "arm")]
fn pend_context_switch() {
    crate::glue::pend_context_switch();
}

/// Host test builds have no exception hardware to pend a switch on; tests
/// exercise `sched::select_active_task` directly instead of relying on an
/// exception firing.
#[cfg(not(target_arch = "arm"))]
fn pend_context_switch() {}

fn try_alloc_tcb(tcb: Tcb) -> Option<NonNull<Tcb>> {
    let layout = Layout::new::<Tcb>();
    let raw = unsafe { alloc::alloc::alloc(layout) } as *mut Tcb;
    if raw.is_null() {
        return None;
    }
    unsafe { raw.write(tcb) };
    NonNull::new(raw)
}

/// Frees a TCB and, if owned, its stack. Caller must have already unlinked
/// `ptr` from every list and ensured nothing is running on its stack.
pub(crate) unsafe fn reap(ptr: NonNull<Tcb>) {
    let tcb = unsafe { ptr.as_ref() };
    if tcb.stack_owned {
        let layout = Layout::from_size_align(
            (tcb.stack_limit - tcb.stack_base) as usize,
            8,
        )
        .expect("stack layout was valid at allocation");
        unsafe { alloc::alloc::dealloc(tcb.stack_base as *mut u8, layout) };
    }
    let layout = Layout::new::<Tcb>();
    unsafe {
        core::ptr::drop_in_place(ptr.as_ptr());
        alloc::alloc::dealloc(ptr.as_ptr() as *mut u8, layout);
    }
}

/// Pops one TCB off the exited list, if any.
pub(crate) fn pop_exited() -> Option<NonNull<Tcb>> {
    critical::free(|| unsafe { (*core::ptr::addr_of_mut!(SCHEDULER)).exited.pop_front() })
}
