#![allow(dead_code)]

/// # System Clock Driver (stub)
///
/// The real driver would configure the PLL, flash wait states, and bus
/// prescalers for the target STM32L4 part and report the resulting AHB
/// clock back to the kernel. That configuration is board-specific and not
/// part of this crate; this module only exposes the query interface the
/// kernel actually depends on.
///
/// Replace `hclk_freq` with a real read of `RCC` + the configured PLL/
/// prescaler state once a clock tree driver exists for this board.

/// Default core clock assumed when running directly off the internal MSI
/// oscillator at reset, before any PLL configuration.
const DEFAULT_HCLK_HZ: u32 = 4_000_000;

/// Returns the current AHB clock frequency in Hz.
///
/// # Parameters
/// - None
///
/// # Return
/// - The AHB clock frequency, in Hz, used by the kernel to derive the
///   SysTick reload value for `SYSTICK_FREQ_HZ`.
pub fn hclk_freq() -> u32 {
    DEFAULT_HCLK_HZ
}
