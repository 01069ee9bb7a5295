//! Fatal-error path.
//!
//! Everything else in the public API fails by returning `None`/`false` or
//! silently no-op'ing — never by panicking or unwinding. A handful of
//! conditions are genuinely unrecoverable (idle task cannot be created,
//! `rtos_start` returns from the start exception, tick reload overflows 24
//! bits): those log at error level and then hand off to the newlib-style
//! `_exit` stub rather than panicking, so a release build without a panic
//! handler that prints still gets a diagnosable log line first.

/// Reasons the scheduler gives up rather than limping on with a corrupted
/// invariant.
#[derive(Debug, Clone, Copy)]
pub enum SchedulerError {
    IdleTaskCreationFailed,
    StartReturned,
    TickReloadOverflow,
}

impl SchedulerError {
    fn message(self) -> &'static str {
        match self {
            SchedulerError::IdleTaskCreationFailed => "failed to create idle task",
            SchedulerError::StartReturned => "rtos_start: supervisor call returned",
            SchedulerError::TickReloadOverflow => "systick reload value overflows 24 bits",
        }
    }
}

/// Logs `err` at error level and aborts. Never returns.
pub fn fatal(err: SchedulerError) -> ! {
    log::error!("rtos: {}", err.message());
    drivers::posix_stubs::sys_exit(1)
}
