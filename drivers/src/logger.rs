#![allow(dead_code)]

/// # UART-Backed Logger
///
/// Implements the [`log`] facade over [`crate::uart`], giving the kernel a
/// place to send `log::error!`/`log::warn!`/... calls without depending on
/// any concrete diagnostic transport itself. Installed once at startup via
/// [`init`]; after that the kernel only ever touches `log::*` macros.
use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, Ordering};
use log::{LevelFilter, Metadata, Record};

/// Small stack buffer used to format a record before writing it out byte by
/// byte; records longer than this are truncated rather than blocking
/// further to grow it.
const LINE_BUF_LEN: usize = 128;

struct LineBuf {
    buf: [u8; LINE_BUF_LEN],
    len: usize,
}

impl LineBuf {
    const fn new() -> Self {
        Self {
            buf: [0; LINE_BUF_LEN],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl core::fmt::Write for LineBuf {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let remaining = LINE_BUF_LEN - self.len;
        let n = s.len().min(remaining);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

struct UartLogger;

impl log::Log for UartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LevelFilter::Trace
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = LineBuf::new();
        let _ = write!(line, "[{}] {}\r\n", record.level(), record.args());
        unsafe { crate::uart::write_str(line.as_str()) };
    }

    fn flush(&self) {}
}

static LOGGER: UartLogger = UartLogger;
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the UART-backed logger as the global `log` sink.
///
/// Idempotent: calling this more than once (e.g. from both `app` and a
/// test harness) is a no-op after the first call.
pub fn init(level: LevelFilter) {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    log::set_max_level(level);
    // SAFETY: set_logger is only ever called once, guarded by INITIALIZED.
    let _ = log::set_logger(&LOGGER);
}
