//! SysTick peripheral wrapper.
//!
//! Hz-based interface: a reload value derived from
//! `drivers::clock::hclk_freq()` and `config::SYSTICK_FREQ_HZ`, programmed
//! once at boot. Nothing here needs a busy-wait delay loop.

use core::ptr::{read_volatile, write_volatile};

pub const SYSTICK_BASE: u32 = 0xE000_E010;

#[repr(C)]
struct SysTickRegisters {
    st_csr: u32,
    st_rvr: u32,
    st_cvr: u32,
    calib: u32,
}

pub struct SysTick {
    _private: (),
}

static mut TAKEN: bool = false;

const SYSTICK_RVR_MAX: u32 = 0x00FF_FFFF;
const SYSTICK_CSR_ENABLE_BIT: u32 = 0;
const SYSTICK_CSR_TICKINT_BIT: u32 = 1;
const SYSTICK_CSR_CLKSOURCE_BIT: u32 = 2;
const SYSTICK_CSR_COUNTFLAG_BIT: u32 = 16;

/// Reload value would not fit the 24-bit `SYST_RVR` field.
#[derive(Debug, Clone, Copy)]
pub struct ReloadOverflow;

impl SysTick {
    pub fn take() -> Option<Self> {
        unsafe {
            if TAKEN {
                None
            } else {
                TAKEN = true;
                Some(SysTick { _private: () })
            }
        }
    }

    #[inline(always)]
    fn regs() -> *mut SysTickRegisters {
        SYSTICK_BASE as *mut SysTickRegisters
    }

    /// Programs the reload value so the tick interrupt fires at `freq_hz`,
    /// given the current core clock `hclk_hz`, and enables it.
    ///
    /// Returns `Err(ReloadOverflow)` if the derived reload value does not
    /// fit in `SYST_RVR`'s 24 bits; the caller decides how to handle that.
    pub fn enable_tick(&mut self, freq_hz: u32, hclk_hz: u32) -> Result<(), ReloadOverflow> {
        let reload = hclk_hz / freq_hz;
        if reload == 0 || reload > SYSTICK_RVR_MAX {
            return Err(ReloadOverflow);
        }
        unsafe {
            let regs = Self::regs();
            write_volatile(&mut (*regs).st_csr, 0);
            write_volatile(&mut (*regs).st_rvr, reload - 1);
            write_volatile(&mut (*regs).st_cvr, 0);
            let control = (1 << SYSTICK_CSR_ENABLE_BIT)
                | (1 << SYSTICK_CSR_CLKSOURCE_BIT)
                | (1 << SYSTICK_CSR_TICKINT_BIT);
            write_volatile(&mut (*regs).st_csr, control);
        }
        Ok(())
    }

    pub fn current(&self) -> u32 {
        unsafe { read_volatile(&(*Self::regs()).st_cvr) }
    }

    pub fn has_wrapped(&self) -> bool {
        unsafe { (read_volatile(&(*Self::regs()).st_csr) & (1 << SYSTICK_CSR_COUNTFLAG_BIT)) != 0 }
    }
}
