#![allow(dead_code)]

/// # Newlib-Style POSIX Stubs
///
/// These exist only so that a `no_std` binary linked against `newlib`-
/// flavored startup code (or a panic handler that expects `_exit` to be
/// reachable) has something to call. None of this participates in
/// scheduling; it is pure bring-up plumbing.
use core::sync::atomic::{AtomicBool, Ordering};

static HALTED: AtomicBool = AtomicBool::new(false);

/// Terminates execution. There is no process to return to on bare metal, so
/// this parks the core in a breakpoint/wait-for-interrupt loop forever.
///
/// `code` is accepted for signature compatibility with newlib's `_exit` and
/// is otherwise unused — there is no host to report it to.
pub fn sys_exit(_code: i32) -> ! {
    HALTED.store(true, Ordering::SeqCst);
    loop {
        #[cfg(target_arch = "arm")]
        unsafe {
            core::arch::asm!("bkpt #0xAB");
        }
        #[cfg(not(target_arch = "arm"))]
        core::hint::spin_loop();
    }
}

/// `_sbrk` stub for a toolchain that still expects newlib's heap hook to
/// exist even though the actual heap is managed by `embedded-alloc`
/// (see `app`'s allocator setup). Always reports out of memory: nothing in
/// this codebase should ever actually call into newlib's allocator.
///
/// # Safety
/// Must only be called by libc/runtime startup code, never application code.
#[no_mangle]
pub unsafe extern "C" fn _sbrk(_incr: isize) -> *mut u8 {
    core::ptr::null_mut()
}

/// `_write` stub: if libc/runtime startup code ever writes to a file
/// descriptor directly (bypassing the `log` facade), report success without
/// doing anything so callers don't stall on a blocking retry loop.
///
/// # Safety
/// Must only be called by libc/runtime startup code.
#[no_mangle]
pub unsafe extern "C" fn _write(_fd: i32, _buf: *const u8, len: usize) -> isize {
    len as isize
}
