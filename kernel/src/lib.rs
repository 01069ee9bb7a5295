#![cfg_attr(not(test), no_std)]

//! The task subsystem: creation, destruction, scheduling, blocking and
//! unblocking, context switching, and reaping of finished tasks, plus the
//! exception glue that drives cooperative and preemptive multitasking on a
//! single Cortex-M core. See `api` for the public surface.

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod api;
pub mod config;
pub mod error;
mod idle;
mod list;
mod queue;
mod sched;
mod stack;
pub mod tcb;

mod critical;

#[cfg(target_arch = "arm")]
mod glue;
#[cfg(target_arch = "arm")]
mod systick;

pub use api::{
    block_active_task, get_active_task, rtos_start, task_create, task_destroy, task_yield,
    unblock_task, CallerStack, TaskConfig,
};
pub use tcb::{BlockCause, TaskArg, TaskEntry, TaskHandle, TaskName, BLOCK_CAUSE_NONE};
