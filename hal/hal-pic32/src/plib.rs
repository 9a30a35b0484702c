//! Vendor peripheral library surface
//!
//! The USART register primitives and the USART driver are PIC32-specific and
//! are modelled here. Ports and the interrupt controller use the generic
//! traits from `hal`.

use hal::error::HalResult;
use hal::gpio::PortControl;
use hal::interrupt::InterruptController;
use hal::uart::{IdleLevel, IoIntent, Line};

use crate::config::{
    GeneralMode, LineControl, LineUsage, RxFifoThreshold, TxFifoThreshold, UsartId,
};

/// Open session with the vendor USART driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverHandle(pub u32);

#[cfg(feature = "defmt")]
impl defmt::Format for DriverHandle {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DriverHandle({=u32:#x})", self.0);
    }
}

/// Register-level USART primitives
pub trait UsartRegisters {
    /// Route the toolchain's console output to this USART
    fn select_console(&mut self, id: UsartId) -> HalResult<()>;

    /// Set the idle level of one line
    fn set_idle_level(&mut self, id: UsartId, line: Line, level: IdleLevel) -> HalResult<()>;

    /// General mode initialization
    fn initialize_mode(&mut self, id: UsartId, mode: GeneralMode) -> HalResult<()>;

    /// FIFO thresholds and pin usage
    fn initialize_operation(
        &mut self,
        id: UsartId,
        rx_threshold: RxFifoThreshold,
        tx_threshold: TxFifoThreshold,
        usage: LineUsage,
    ) -> HalResult<()>;

    /// Data bits, parity and stop bits
    fn set_line_control(&mut self, id: UsartId, control: LineControl) -> HalResult<()>;

    fn transmitter_enable(&mut self, id: UsartId) -> HalResult<()>;

    fn receiver_enable(&mut self, id: UsartId) -> HalResult<()>;

    /// Select the baud generator speed (4x clock when `high`, 16x otherwise)
    fn set_baud_high_speed(&mut self, id: UsartId, high: bool) -> HalResult<()>;

    /// Program the baud rate generator divisor register
    fn set_baud_divisor(&mut self, id: UsartId, divisor: u16) -> HalResult<()>;

    /// Enable the peripheral
    fn enable(&mut self, id: UsartId) -> HalResult<()>;

    /// Push one byte into the transmit FIFO
    fn transmit_byte(&mut self, id: UsartId, byte: u8) -> nb::Result<(), hal::HalError>;

    /// Completes once the transmit shift register is empty
    fn transmit_idle(&mut self, id: UsartId) -> nb::Result<(), hal::HalError>;
}

/// Vendor USART driver
pub trait UsartDriver {
    /// Open a driver session; the invalid-handle sentinel maps to an error
    fn open(&mut self, id: UsartId, intent: IoIntent) -> HalResult<DriverHandle>;

    fn write_byte(&mut self, handle: DriverHandle, byte: u8) -> nb::Result<(), hal::HalError>;

    /// Completes once every queued byte has left the shift register
    fn write_complete(&mut self, handle: DriverHandle) -> nb::Result<(), hal::HalError>;

    fn baud_set(&mut self, handle: DriverHandle, baud: u32) -> HalResult<()>;

    fn line_control_set(&mut self, handle: DriverHandle, control: LineControl) -> HalResult<()>;
}

/// Everything a UART bring-up needs from the peripheral library
pub trait Plib: PortControl + InterruptController + UsartRegisters + UsartDriver {}

impl<T> Plib for T where T: PortControl + InterruptController + UsartRegisters + UsartDriver {}
