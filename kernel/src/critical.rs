//! Critical-section helper.
//!
//! Every API function that touches [`crate::queue::SCHEDULER`] runs its
//! mutation inside `free`: the scheduler state is mutated only by
//! `select_active_task` and the API functions, with interrupts masked for
//! the duration.
//!
//! On the real target this is `cortex_m::interrupt::free`. Host unit tests
//! run single-threaded with no real interrupt controller to mask, so the
//! fallback just runs the closure.

#[cfg(all(not(test), target_arch = "arm"))]
#[inline(always)]
pub fn free<R>(f: impl FnOnce() -> R) -> R {
    cortex_m::interrupt::free(|_| f())
}

#[cfg(any(test, not(target_arch = "arm")))]
#[inline(always)]
pub fn free<R>(f: impl FnOnce() -> R) -> R {
    f()
}
