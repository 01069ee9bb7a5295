//! Task Control Block.
//!
//! A `Tcb` is opaque to callers; the public handle (`TaskHandle`) is a tagged
//! pointer to one. No operation on a TCB is safe with respect to itself
//! except through the scheduler APIs in [`crate::api`].

use core::ptr::NonNull;

use crate::config::MAX_TASK_NAME_LEN;
use crate::list::ListLink;

/// Opaque cause tag for why a task is blocked. Drivers define their own
/// causes; `0` is reserved to mean "not blocked."
pub type BlockCause = u32;

pub const BLOCK_CAUSE_NONE: BlockCause = 0;

/// Run state of a task. Each state corresponds to exactly one list the TCB
/// can live on: `Ready` on a ready queue, `Blocked` on the blocked list,
/// `Exited` on the exited list; `Active` is the one TCB pointed to directly
/// by the scheduler and lives on no list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Exited,
    Blocked,
    Ready,
    Active,
}

/// The opaque argument handed to a task's entry function.
pub type TaskArg = usize;

pub type TaskEntry = extern "C" fn(TaskArg) -> !;

/// Fixed-capacity, non-allocating task name. Longer names are silently
/// truncated rather than rejected.
#[derive(Clone, Copy)]
pub struct TaskName {
    bytes: [u8; MAX_TASK_NAME_LEN],
    len: u8,
}

impl TaskName {
    pub const EMPTY: Self = Self {
        bytes: [0; MAX_TASK_NAME_LEN],
        len: 0,
    };

    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; MAX_TASK_NAME_LEN];
        let src = name.as_bytes();
        let n = src.len().min(MAX_TASK_NAME_LEN);
        bytes[..n].copy_from_slice(&src[..n]);
        Self {
            bytes,
            len: n as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        // Construction only ever copies from a valid `&str`, so the stored
        // prefix is valid UTF-8.
        core::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

pub struct Tcb {
    /// Current top-of-stack for this task. Must remain the first field:
    /// the context-switch handler dereferences the TCB pointer to load it
    /// in a single instruction.
    pub stack_top: u32,

    /// Lowest address owned by the task's stack.
    pub stack_base: u32,
    /// Initial (highest) address the task's stack starts from.
    pub stack_limit: u32,
    /// Whether `stack_base..stack_limit` was allocated by the OS (freed on
    /// reap) or supplied by the caller (never freed by us).
    pub stack_owned: bool,

    pub entry: TaskEntry,
    pub arg: TaskArg,
    pub name: TaskName,
    pub priority: u8,

    pub state: TaskState,
    pub block_cause: BlockCause,

    pub(crate) list_link: ListLink,
}

/// A handle to a task, returned by `task_create` and consumed by the rest of
/// the public API. Internally a tagged (non-null) pointer to the TCB.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TaskHandle(pub(crate) NonNull<Tcb>);

impl TaskHandle {
    /// # Safety
    /// `ptr` must point to a live `Tcb` for as long as the returned handle
    /// is used.
    pub(crate) unsafe fn from_raw(ptr: NonNull<Tcb>) -> Self {
        Self(ptr)
    }

    pub(crate) fn as_ptr(self) -> NonNull<Tcb> {
        self.0
    }

    /// Static name given at creation (empty if none was supplied).
    pub fn name(self) -> TaskName {
        unsafe { self.0.as_ref().name }
    }

    /// Static priority given at creation. Non-goals exclude *changing*
    /// priority at runtime, not reading it.
    pub fn priority(self) -> u8 {
        unsafe { self.0.as_ref().priority }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use alloc::boxed::Box;

    extern "C" fn noop_entry(_arg: TaskArg) -> ! {
        loop {}
    }

    /// Leaks a minimal TCB for list/scheduler unit tests. Never reaped;
    /// host test processes exit and reclaim the leak anyway.
    pub(crate) fn leak_test_tcb(name: &str) -> NonNull<Tcb> {
        let tcb = Box::new(Tcb {
            stack_top: 0,
            stack_base: 0,
            stack_limit: 0,
            stack_owned: false,
            entry: noop_entry,
            arg: 0,
            name: TaskName::new(name),
            priority: 1,
            state: TaskState::Ready,
            block_cause: BLOCK_CAUSE_NONE,
            list_link: ListLink::new(),
        });
        NonNull::from(Box::leak(tcb))
    }
}
