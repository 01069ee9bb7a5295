//! Rust-side half of the exception glue.
//!
//! The naked assembly in `src/arch/cortex_m4.s` owns every instruction that
//! touches the stacked frame directly; everything else — picking the next
//! task, programming the tick, setting exception priorities — is ordinary
//! Rust called out to from there. Only built for the real target: host
//! tests exercise `sched::select_active_task` directly instead.

use crate::config::SYSTICK_FREQ_HZ;
use crate::critical;
use crate::error::{fatal, SchedulerError};
use crate::queue::SCHEDULER;
use crate::sched::select_active_task;
use crate::systick::SysTick;

const SCB_ICSR: *mut u32 = 0xE000_ED04 as *mut u32;
const ICSR_PENDSVSET_BIT: u32 = 1 << 28;

const SHPR3: *mut u32 = 0xE000_ED20 as *mut u32;
/// PendSV at the lowest possible exception priority: a context switch never
/// preempts any other handler, only thread-mode code.
const PENDSV_PRIORITY: u32 = 0xFF;
/// SysTick one notch above PendSV so the tick can always pend a switch.
const SYSTICK_PRIORITY: u32 = 0xF0;

const FPCCR: *mut u32 = 0xE000_EF34 as *mut u32;

/// Sets the pendable-service-pending bit, requesting a context switch at the
/// next exception-safe point. Used by `task_yield`/`block_active_task` and
/// the tick handler's preemption path.
pub(crate) fn pend_context_switch() {
    unsafe {
        core::ptr::write_volatile(SCB_ICSR, ICSR_PENDSVSET_BIT);
    }
}

/// Sets PendSV/SysTick exception priorities (lowest and next-to-lowest) and
/// disables FPU lazy stacking. There is no FPU on this target, so lazy
/// stacking would never trigger anyway; cleared defensively since it costs
/// nothing.
fn configure_exception_priorities() {
    unsafe {
        let mut shpr3 = core::ptr::read_volatile(SHPR3);
        shpr3 &= !((0xFFu32 << 16) | (0xFFu32 << 24));
        shpr3 |= (PENDSV_PRIORITY << 16) | (SYSTICK_PRIORITY << 24);
        core::ptr::write_volatile(SHPR3, shpr3);

        let fpccr = core::ptr::read_volatile(FPCCR);
        core::ptr::write_volatile(FPCCR, (fpccr | (1 << 31)) & !(1 << 30));
    }
}

/// Programs the tick reload from `drivers::clock::hclk_freq()` and enables
/// the tick interrupt. Fatal if the reload value overflows 24 bits, which
/// happens only if the configured clock is absurdly fast relative to
/// `SYSTICK_FREQ_HZ`.
fn enable_systick() {
    let mut systick = SysTick::take().unwrap_or_else(|| fatal(SchedulerError::TickReloadOverflow));
    let hclk_hz = drivers::clock::hclk_freq();
    if systick.enable_tick(SYSTICK_FREQ_HZ, hclk_hz).is_err() {
        fatal(SchedulerError::TickReloadOverflow);
    }
}

/// Issues the supervisor call that hands control to the scheduler for the
/// very first time. Never returns on success; if the instruction itself
/// somehow returns, that is the `StartReturned` fatal condition.
pub(crate) fn trigger_start() -> ! {
    unsafe {
        core::arch::asm!("svc 0");
    }
    fatal(SchedulerError::StartReturned)
}

/// Called from `SVCall` (asm) on the main stack, before it has touched the
/// process stack pointer at all. Picks the first active task and brings up
/// the tick, then hands back its stack pointer for the asm to restore.
#[unsafe(no_mangle)]
extern "C" fn rtos_first_task_sp() -> u32 {
    configure_exception_priorities();
    critical::free(|| unsafe {
        select_active_task(&mut *core::ptr::addr_of_mut!(SCHEDULER));
    });
    enable_systick();
    critical::free(|| unsafe {
        (*core::ptr::addr_of!(SCHEDULER))
            .active
            .expect("select_active_task must set active")
            .as_ref()
            .stack_top
    })
}

/// Called from `PendSV` (asm) with `old_sp` already holding the
/// just-preempted task's saved stack pointer. Stores it into the
/// (still-active, about-to-be-reparented) TCB, runs the scheduler core, and
/// returns the new active task's stack pointer for the asm to restore.
#[unsafe(no_mangle)]
extern "C" fn rtos_switch_context(old_sp: u32) -> u32 {
    critical::free(|| unsafe {
        let scheduler = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        if let Some(mut active) = scheduler.active {
            active.as_mut().stack_top = old_sp;
        }
        select_active_task(scheduler);
        scheduler
            .active
            .expect("select_active_task must set active")
            .as_ref()
            .stack_top
    })
}

/// System tick handler: if preemption is enabled and the highest-priority
/// ready task outranks the active one, pend a context switch so the switch
/// happens at this exception's return instead of waiting for a voluntary
/// yield.
#[cortex_m_rt::exception]
fn SysTick() {
    use crate::config::PREEMPTION_ENABLED;

    if !PREEMPTION_ENABLED {
        return;
    }

    let should_switch = critical::free(|| unsafe {
        let scheduler = &*core::ptr::addr_of!(SCHEDULER);
        match (scheduler.active, scheduler.highest_nonempty_priority()) {
            (Some(active), Some(highest)) => highest as u8 > active.as_ref().priority,
            _ => false,
        }
    });

    if should_switch {
        pend_context_switch();
    }
}
