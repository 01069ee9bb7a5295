
//declaring the registers for the STM32L4 family (e.g. STM32L476)

//RCC register
pub const RCC_BASE: u32 = 0x4002_1000;

// RCC_AHB2ENR: GPIO port clock enable register (offset from RCC_BASE).
pub const RCC_AHB2ENR_OFFSET: u32 = 0x4C;
// RCC_APB2ENR: SYSCFG clock enable lives here on L4 (offset from RCC_BASE).
pub const RCC_APB2ENR_OFFSET: u32 = 0x60;

//system config register
pub const SYSCFG_BASE: u32 = 0x4001_0000;

//GPIO Registers (AHB2 domain on L4, not AHB1 as on F4)
pub const GPIO_A_BASE: u32 = 0x4800_0000;
pub const GPIO_B_BASE: u32 = 0x4800_0400;
pub const GPIO_C_BASE: u32 = 0x4800_0800;
pub const GPIO_D_BASE: u32 = 0x4800_0C00;
pub const GPIO_E_BASE: u32 = 0x4800_1000;
pub const GPIO_F_BASE: u32 = 0x4800_1400;
pub const GPIO_G_BASE: u32 = 0x4800_1800;
pub const GPIO_H_BASE: u32 = 0x4800_1C00;


//exti register
pub const EXTI_BASE : u32 = 0x4001_0400;

//NVIC:
pub const NVIC_BASE : u32 = 0xE000_E100;
pub const NVIC_ISER: u32 = NVIC_BASE;
pub const NVIC_ICER: u32 = NVIC_BASE+ 0x80;
pub const NVIC_IPR: u32 = 0xE000_E400;


//SCB
pub const SCB_AIRCR_BASE: u32 = 0xE000_ED0C;

//Systic
pub const SYSTICK_BASE : u32 = 0xE000_E010;

// LPUART1 (used by drivers::uart as the diagnostic logging sink)
pub const LPUART1_BASE: u32 = 0x4000_8000;
