#![no_std]
#![no_main]
#![allow(clippy::empty_loop)]

mod button;
mod led;

use core::panic::PanicInfo;
use cortex_m_rt::entry;
use embedded_alloc::LlffHeap as Heap;

use kernel::{BlockCause, TaskArg, TaskConfig};

use crate::led::*;

#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Block cause used by `button_task`/`EXTI0_Handler` to demonstrate
/// `block_active_task`/`unblock_task` being driven from an ISR.
const BUTTON_PRESS: BlockCause = 1;

static mut BUTTON_TASK: Option<kernel::TaskHandle> = None;

#[entry]
fn main() -> ! {
    unsafe {
        let heap_start = drivers::memmap::SRAM_END as usize - drivers::memmap::HEAP_SIZE;
        HEAP.init(heap_start, drivers::memmap::HEAP_SIZE);
    }

    drivers::logger::init(log::LevelFilter::Info);

    init_led();
    button::init_user_button();

    kernel::task_create(
        led1_task,
        0,
        Some(TaskConfig {
            priority: Some(5),
            name: Some("led1"),
            ..Default::default()
        }),
    )
    .expect("failed to create led1 task");

    kernel::task_create(
        led2_task,
        0,
        Some(TaskConfig {
            priority: Some(3),
            name: Some("led2"),
            ..Default::default()
        }),
    )
    .expect("failed to create led2 task");

    let button_handle = kernel::task_create(
        button_task,
        0,
        Some(TaskConfig {
            priority: Some(4),
            name: Some("button"),
            ..Default::default()
        }),
    )
    .expect("failed to create button task");
    unsafe {
        *core::ptr::addr_of_mut!(BUTTON_TASK) = Some(button_handle);
    }

    kernel::rtos_start();
}

extern "C" fn led1_task(_arg: TaskArg) -> ! {
    loop {
        led1_toggle();
        kernel::task_yield();
    }
}

extern "C" fn led2_task(_arg: TaskArg) -> ! {
    loop {
        led2_toggle();
        kernel::task_yield();
    }
}

/// Blocks until the user button ISR wakes it, toggles LED3 once, and blocks
/// again — demonstrating the `block_active_task`/`unblock_task` round trip
/// driven from interrupt context.
extern "C" fn button_task(_arg: TaskArg) -> ! {
    loop {
        kernel::block_active_task(BUTTON_PRESS);
        led3_toggle();
    }
}

#[allow(non_snake_case)]
#[unsafe(no_mangle)]
fn EXTI0_Handler() {
    drivers::exti::clear_exti_pending(0);
    if let Some(handle) = unsafe { *core::ptr::addr_of!(BUTTON_TASK) } {
        kernel::unblock_task(handle, BUTTON_PRESS);
    }
}

#[panic_handler]
fn panic_handler(_info: &PanicInfo) -> ! {
    loop {}
}
