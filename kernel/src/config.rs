//! Compile-time configuration surface for the scheduler.
//!
//! Tasks are created at runtime through [`crate::api::task_create`]; no
//! fixed task table is declared at compile time, only a priority *count*
//! plus per-class defaults.
//!
//! Adjust these constants for the target MCU: check SRAM size and starting
//! address in the STM32L4 reference manual before changing `SRAM_START`/
//! `SRAM_SIZE`, and make sure idle/default stack sizes times the expected
//! number of live tasks fits within it.

/// Number of priority levels. Priority 0 is reserved for the idle task by
/// convention; valid task priorities for `task_create` are
/// `1..NUM_PRIORITIES`.
pub const NUM_PRIORITIES: usize = 8;

/// Priority assigned to the idle task. Must stay at 0: `task_create`'s
/// priority bound is `NUM_PRIORITIES`, and `sched::select_active_task`
/// falls back to `ready[IDLE_PRIORITY]` once every other priority's queue
/// is empty.
pub const IDLE_PRIORITY: u8 = 0;

pub const IDLE_TASK_NAME: &str = "idle";
pub const IDLE_STACK_SIZE: usize = 512;

/// Priority and stack size handed to `task_create` when `config` is absent.
pub const DEFAULT_TASK_PRIORITY: u8 = 3;
pub const DEFAULT_STACK_SIZE: usize = 1024;

/// Longest task name stored inline in a TCB (truncated, not an error).
pub const MAX_TASK_NAME_LEN: usize = 16;

/// Compile-time switch: whether a higher-priority task becoming ready during
/// a tick preempts the currently active task, or merely waits until the
/// active task next yields/blocks.
pub const PREEMPTION_ENABLED: bool = true;

/// Target frequency of the system tick exception, in Hz.
pub const SYSTICK_FREQ_HZ: u32 = 1000;

// SRAM base and size, STM32L4 memory map (adjust per exact part number).
pub const SRAM_START: u32 = 0x2000_0000;
pub const SRAM_SIZE: u32 = 96 * 1024;
pub const SRAM_END: u32 = SRAM_START + SRAM_SIZE;
