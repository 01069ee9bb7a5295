

#![allow(dead_code)]
use drivers::exti::configure_gpio_interrupt;
use drivers::gpio::*;

pub const GPIO_MODE_INPUT: u32 = 0;

pub const PORTA: u32 = 0;
pub const BUTTON_PIN: u32 = 0;
pub const BUTTON_PORT: u32 = PORTA;

const TRIGGER_RISING: u32 = 0;

/// Configures the user button as an EXTI source so its ISR can demonstrate
/// `unblock_task` being called from interrupt context.
pub fn init_user_button() {
    gpio_configure_mode(BUTTON_PORT, BUTTON_PIN, GPIO_MODE_INPUT);
    configure_gpio_interrupt(BUTTON_PORT, BUTTON_PIN, TRIGGER_RISING);
}
