#![allow(dead_code)]

/// # LPUART Driver (stub)
///
/// A real LPUART driver would configure baud rate, parity, and
/// interrupt-driven RX/TX queues backed by [`crate::ring_buffer::RingBuffer`].
/// This module implements just enough of a polling transmit path to give
/// [`crate::logger`] a concrete sink; the task subsystem never calls into
/// it directly.
use crate::read_write::{read_register, write_register};
use crate::stm32l4_registers::LPUART1_BASE;

const ISR_OFFSET: u32 = 0x1C;
const TDR_OFFSET: u32 = 0x28;
const ISR_TXE_BIT: u32 = 7;

/// Blocks until the transmit data register is empty, then writes one byte.
///
/// # Safety
/// Caller must ensure LPUART1 has been clocked and configured; otherwise
/// this spins forever waiting for a TXE flag that will never set.
pub unsafe fn write_byte(byte: u8) {
    let isr_addr = (LPUART1_BASE + ISR_OFFSET) as *mut u32;
    let tdr_addr = (LPUART1_BASE + TDR_OFFSET) as *mut u32;
    unsafe {
        while read_register(isr_addr) & (1 << ISR_TXE_BIT) == 0 {}
        write_register(tdr_addr, byte as u32);
    }
}

/// Writes each byte of `s` out LPUART1, polling.
///
/// # Safety
/// Same contract as [`write_byte`].
pub unsafe fn write_str(s: &str) {
    for byte in s.as_bytes() {
        unsafe { write_byte(*byte) };
    }
}
