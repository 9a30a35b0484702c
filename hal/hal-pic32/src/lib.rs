//! PIC32 HAL implementation
//!
//! UART bring-up for the PIC32 family on top of the vendor peripheral
//! library. The library itself is reached through the traits in [`plib`],
//! which a board implements; [`sim`] provides a recording implementation for
//! host-side use.
//!
//! ## Features
//! - `std` - `std::error::Error` impls
//! - `defmt` - `defmt::Format` impls
//! - `sim` - recording peripheral library simulation
//!
//! ## Example
//! ```
//! # #[cfg(feature = "sim")] {
//! use hal_pic32::{Pic32Uart, UartInstance};
//! use hal_pic32::sim::SimPlib;
//!
//! let mut uart = Pic32Uart::new(SimPlib::new(), UartInstance::default());
//! uart.initialize().unwrap();
//! assert!(uart.is_initialized());
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod baud;
pub mod config;
pub mod plib;
pub mod slot;
pub mod stdio;
pub mod uart;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{ManualConfig, UartInstance, UsartId};
pub use plib::{DriverHandle, Plib};
pub use slot::UartSlot;
pub use uart::Pic32Uart;
