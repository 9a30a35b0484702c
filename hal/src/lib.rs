//! Hardware Abstraction Layer (HAL) for embedded systems
//!
//! This crate provides vendor-agnostic traits for the peripherals a UART
//! bring-up touches: GPIO ports with output remapping, UART line settings and
//! the interrupt controller. Vendor crates such as `hal-pic32` implement them.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod gpio;
pub mod uart;
pub mod interrupt;

// Re-export commonly used types
pub use error::{HalError, HalResult};
