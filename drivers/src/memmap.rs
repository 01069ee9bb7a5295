//! SRAM memory map constants shared by the kernel's stack/heap sizing and
//! by `app`'s global allocator setup.
//!
//! Check the SRAM size and starting address in the STM32L4 reference manual
//! for the exact part before changing these.

pub const SRAM_START: u32 = 0x2000_0000;
pub const SRAM_SIZE: u32 = 96 * 1024;
pub const SRAM_END: u32 = SRAM_START + SRAM_SIZE;

/// Bytes reserved for the global heap (task TCBs and owned stacks are
/// allocated out of this).
pub const HEAP_SIZE: usize = 24 * 1024;
