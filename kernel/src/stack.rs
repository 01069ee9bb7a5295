//! Stack initializer.
//!
//! Builds the synthetic exception-return frame a freshly created task must
//! unwind the first time it is dispatched. To the CPU, the first dispatch of
//! a new task looks exactly like returning from an interrupt that had
//! preempted it mid-flight; this module lays out the bytes that make that
//! illusion hold.

use core::ptr::NonNull;

use crate::tcb::{TaskArg, TaskEntry};

/// Thumb bit (bit 24) of xPSR. ARM instructions are not supported on
/// Cortex-M; every return must land in Thumb state.
const XPSR_THUMB_BIT: u32 = 1 << 24;

/// EXC_RETURN: return to Thread mode, use the Process Stack Pointer, no
/// floating-point state. Loaded into LR by the context-switch/start handlers
/// just before `bx lr`.
pub const EXC_RETURN_THREAD_PSP: u32 = 0xFFFF_FFFD;

const SCRATCH_SENTINEL: u32 = 0xCCCC_CC00;
const CALLEE_SENTINEL: u32 = 0xEEEE_EE00;

/// Writes the initial stack frame for a task about to run `entry(arg)` for
/// the first time, topping out at `stack_limit` (the highest address owned
/// by the stack; the stack grows down from there).
///
/// `exit_trampoline` is the address landed on if `entry` ever returns
/// normally instead of calling `task_destroy` on itself — it runs the
/// cleanup that reclaims the task's resources.
///
/// Returns the new top-of-stack (process stack pointer) to store into the
/// TCB. The pointer is rounded down to a 4-byte boundary before
/// construction; any bytes below that boundary are forfeited.
///
/// # Safety
/// `stack_limit` must be a valid, writable address with at least
/// `FRAME_WORDS * 4` bytes below it that belong exclusively to this task.
pub unsafe fn init_stack(
    stack_limit: u32,
    entry: TaskEntry,
    arg: TaskArg,
    exit_trampoline: unsafe extern "C" fn() -> !,
) -> u32 {
    let aligned = stack_limit & !0b11;
    let mut p = aligned as *mut u32;

    macro_rules! push {
        ($value:expr) => {{
            p = unsafe { p.offset(-1) };
            unsafe { p.write_volatile($value) };
        }};
    }

    // Hardware-stacked exception frame, highest address first: xPSR, PC, LR,
    // R12, R3, R2, R1, R0. This is exactly what the CPU itself pushes on a
    // real exception entry, so `bx lr` with EXC_RETURN unwinds it without
    // the handler knowing the task had never actually run before.
    push!(XPSR_THUMB_BIT);
    push!(entry as usize as u32);
    push!(exit_trampoline as usize as u32);
    push!(SCRATCH_SENTINEL | 12); // r12
    push!(SCRATCH_SENTINEL | 3); // r3
    push!(SCRATCH_SENTINEL | 2); // r2
    push!(SCRATCH_SENTINEL | 1); // r1
    push!(arg as u32); // r0 = opaque argument

    // Software-saved portion, restored by the context-switch handler:
    // the EXC_RETURN value, then the callee-saved registers R11..R4.
    push!(EXC_RETURN_THREAD_PSP);
    for r in (4..=11).rev() {
        push!(CALLEE_SENTINEL | r);
    }

    p as u32
}

/// Reads back the hardware-stacked program counter and R0 from a frame built
/// by [`init_stack`], given the process stack pointer the context-switch
/// handler would restore (i.e. the pointer right past the software-saved
/// portion). Used by host tests to check the frame without involving real
/// exception hardware.
#[cfg(test)]
pub(crate) fn debug_unwind(psp_after_software_restore: NonNull<u32>) -> (u32, u32, u32) {
    unsafe {
        let base = psp_after_software_restore.as_ptr();
        let r0 = *base;
        let pc = *base.add(6);
        let xpsr = *base.add(7);
        (pc, r0, xpsr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::alloc::{alloc, Layout};

    extern "C" fn dummy_entry(_arg: TaskArg) -> ! {
        loop {}
    }

    unsafe extern "C" fn dummy_trampoline() -> ! {
        loop {}
    }

    #[test]
    fn frame_unwinds_to_entry_and_arg() {
        const STACK_WORDS: usize = 64;
        let layout = Layout::from_size_align(STACK_WORDS * 4, 8).unwrap();
        let base = unsafe { alloc(layout) } as *mut u32;
        assert!(!base.is_null());
        let top = unsafe { base.add(STACK_WORDS) } as u32;

        let sp = unsafe { init_stack(top, dummy_entry, 0x4242, dummy_trampoline) };
        assert_eq!(sp % 4, 0, "stack pointer must stay 4-byte aligned");

        let after_software_restore = (sp as usize + 9 * 4) as *mut u32; // skip exc_return + r4..r11
        let (pc, r0, xpsr) =
            debug_unwind(NonNull::new(after_software_restore).unwrap());
        assert_eq!(pc, dummy_entry as usize as u32);
        assert_eq!(r0, 0x4242);
        assert_eq!(xpsr & XPSR_THUMB_BIT, XPSR_THUMB_BIT);
    }
}
